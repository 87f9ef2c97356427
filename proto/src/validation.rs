use crate::enums::EnumKind;
use crate::task_def::TaskDef;
use conductor_base::config::ValidationConfig;
use conductor_base::error::TaskDefError;

impl TaskDef {
    /// Registration-time checks. Decoding never calls this: a payload with
    /// an invalid definition still decodes.
    pub fn violations(&self, config: &ValidationConfig) -> Vec<String> {
        let mut violations = Vec::new();
        if self.name.trim().is_empty() {
            violations.push("TaskDef name cannot be null or empty".to_string());
        } else if self.name.chars().count() > config.max_name_length {
            violations.push(format!(
                "TaskDef name: {} is longer than {} characters",
                self.name, config.max_name_length
            ));
        }
        for (field, value) in [
            ("retryCount", self.retry_count as i64),
            ("timeoutSeconds", self.timeout_seconds),
            ("retryDelaySeconds", self.retry_delay_seconds as i64),
            ("responseTimeoutSeconds", self.response_timeout_seconds as i64),
            ("concurrentExecLimit", self.concurrent_exec_limit as i64),
        ] {
            if value < 0 {
                violations.push(format!(
                    "TaskDef {}: {} must be >= 0",
                    field, value
                ));
            }
        }
        if self.response_timeout_seconds >= 0
            && self.response_timeout_seconds < config.min_response_timeout_seconds
        {
            violations.push(format!(
                "TaskDef responseTimeoutSeconds: {} should be minimum {} second",
                self.response_timeout_seconds, config.min_response_timeout_seconds
            ));
        }
        if config.enforce_response_timeout_bound
            && self.timeout_seconds > 0
            && i64::from(self.response_timeout_seconds) > self.timeout_seconds
        {
            violations.push(format!(
                "TaskDef: {} responseTimeoutSeconds: {} must be less than timeoutSeconds: {}",
                self.name, self.response_timeout_seconds, self.timeout_seconds
            ));
        }
        if !EnumKind::TimeoutPolicy.is_known(self.timeout_policy) {
            violations.push(format!(
                "TaskDef timeoutPolicy: {} is not a known value",
                self.timeout_policy
            ));
        }
        if !EnumKind::RetryLogic.is_known(self.retry_logic) {
            violations.push(format!(
                "TaskDef retryLogic: {} is not a known value",
                self.retry_logic
            ));
        }
        violations
    }

    pub fn validate(&self, config: &ValidationConfig) -> Result<(), TaskDefError> {
        let violations = self.violations(config);
        if violations.is_empty() {
            Ok(())
        } else {
            tracing::debug!("invalid TaskDef '{}': {:?}", self.name, violations);
            Err(TaskDefError::ValidationError(violations))
        }
    }

    pub fn is_valid(&self, config: &ValidationConfig) -> bool {
        self.violations(config).is_empty()
    }
}
