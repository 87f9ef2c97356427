use crate::error::TaskDefError;
use crate::limits;
use serde::Deserialize;

/// Wire codec settings
///
/// # Environment Variables
/// - `TASK_DEF_CODEC_MAX_MESSAGE_BYTES`: reject payloads larger than this (default: 4MiB)
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct CodecConfig {
    pub max_message_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: limits::DEFAULT_MAX_MESSAGE_BYTES,
        }
    }
}

/// Task definition validation settings
///
/// Validation is only performed on request (registration-time checks);
/// decoding never validates.
///
/// # Environment Variables
/// - `TASK_DEF_VALIDATION_MIN_RESPONSE_TIMEOUT_SECONDS`: (default: 1)
/// - `TASK_DEF_VALIDATION_ENFORCE_RESPONSE_TIMEOUT_BOUND`: require
///   responseTimeoutSeconds <= timeoutSeconds when a timeout is set (default: true)
/// - `TASK_DEF_VALIDATION_MAX_NAME_LENGTH`: (default: 255)
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ValidationConfig {
    pub min_response_timeout_seconds: i32,
    pub enforce_response_timeout_bound: bool,
    pub max_name_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_response_timeout_seconds: limits::DEFAULT_MIN_RESPONSE_TIMEOUT_SECONDS,
            enforce_response_timeout_bound: true,
            max_name_length: limits::DEFAULT_MAX_NAME_LENGTH,
        }
    }
}

impl ValidationConfig {
    /// Only structural checks (name, non-negative numbers, known enums).
    pub fn lenient() -> Self {
        Self {
            min_response_timeout_seconds: 0,
            enforce_response_timeout_bound: false,
            ..Default::default()
        }
    }
}

pub fn load_codec_config_from_env() -> Result<CodecConfig, TaskDefError> {
    envy::prefixed("TASK_DEF_CODEC_")
        .from_env::<CodecConfig>()
        .map_err(|e| {
            TaskDefError::ConfigError(format!("cannot read codec config from env: {:?}", e))
        })
}

pub fn load_validation_config_from_env() -> Result<ValidationConfig, TaskDefError> {
    envy::prefixed("TASK_DEF_VALIDATION_")
        .from_env::<ValidationConfig>()
        .map_err(|e| {
            TaskDefError::ConfigError(format!(
                "cannot read validation config from env: {:?}",
                e
            ))
        })
}
