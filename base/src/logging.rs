use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Subscriber settings (`LOG_LEVEL`, `LOG_FORMAT`)
///
/// `level` accepts any `EnvFilter` directive, e.g. `info,proto=debug`.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

pub fn load_logging_config_from_env() -> Result<LoggingConfig> {
    envy::prefixed("LOG_")
        .from_env::<LoggingConfig>()
        .map_err(|e| anyhow!("cannot read logging config from env: {:?}", e))
}

/// Install the global subscriber. Logs go to stderr so that command output
/// on stdout stays machine readable.
pub fn tracing_init(conf: LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&conf.level)
        .map_err(|e| anyhow!("invalid log level '{}': {:?}", conf.level, e))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match conf.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
    .map_err(|e| anyhow!("failed to init tracing: {:?}", e))
}
