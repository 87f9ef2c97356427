//! How a task definition's retry and timeout settings are interpreted by
//! the orchestration engine.

use crate::enums::{RetryLogic, TimeoutPolicy};
use crate::task_def::TaskDef;
use std::time::Duration;

impl TimeoutPolicy {
    /// The task is marked TIMED_OUT (and then retried or failed).
    pub fn marks_timed_out(&self) -> bool {
        matches!(self, TimeoutPolicy::Retry | TimeoutPolicy::TimeOutWf)
    }
    pub fn terminates_workflow(&self) -> bool {
        matches!(self, TimeoutPolicy::TimeOutWf)
    }
}

impl TaskDef {
    /// `attempt` is the number of retries already made (0 for the first retry).
    ///
    /// EXPONENTIAL_BACKOFF grows linearly: `retry_delay_seconds * (1 + attempt)`.
    pub fn retry_delay_seconds_for(&self, attempt: i32) -> i32 {
        let delay = self.retry_delay_seconds.max(0);
        match self.retry_logic() {
            RetryLogic::Fixed => delay,
            RetryLogic::ExponentialBackoff => {
                delay.saturating_mul(attempt.max(0).saturating_add(1))
            }
        }
    }
    pub fn retry_delay_for(&self, attempt: i32) -> Duration {
        Duration::from_secs(self.retry_delay_seconds_for(attempt) as u64)
    }

    pub fn can_retry(&self, attempts: i32) -> bool {
        self.retry_count > attempts
    }

    pub fn has_timeout(&self) -> bool {
        self.timeout_seconds > 0
    }
    pub fn timeout(&self) -> Option<Duration> {
        self.has_timeout()
            .then(|| Duration::from_secs(self.timeout_seconds as u64))
    }
    /// `elapsed`: time since the task started (start delay excluded)
    pub fn is_timed_out(&self, elapsed: Duration) -> bool {
        self.timeout().is_some_and(|t| elapsed >= t)
    }

    pub fn response_timeout(&self) -> Option<Duration> {
        (self.response_timeout_seconds > 0)
            .then(|| Duration::from_secs(self.response_timeout_seconds as u64))
    }
    /// `since_update`: time since the worker last reported on the task
    pub fn is_response_timed_out(&self, since_update: Duration) -> bool {
        self.response_timeout().is_some_and(|t| since_update >= t)
    }

    /// None: no limit
    pub fn concurrency_limit(&self) -> Option<u32> {
        (self.concurrent_exec_limit > 0).then_some(self.concurrent_exec_limit as u32)
    }
}
