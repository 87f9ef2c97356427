use config::{CodecConfig, ValidationConfig};
use once_cell::sync::Lazy;

pub mod codec;
pub mod config;
pub mod error;
pub mod limits;
pub mod logging;

pub static APP_NAME: &str = "conductor-taskdef";

pub static CODEC_CONFIG: Lazy<CodecConfig> = Lazy::new(|| {
    config::load_codec_config_from_env().unwrap_or_else(|e| {
        tracing::info!("Use default CodecConfig ({}).", e);
        CodecConfig::default()
    })
});

pub static VALIDATION_CONFIG: Lazy<ValidationConfig> = Lazy::new(|| {
    config::load_validation_config_from_env().unwrap_or_else(|e| {
        tracing::info!("Use default ValidationConfig ({}).", e);
        ValidationConfig::default()
    })
});
