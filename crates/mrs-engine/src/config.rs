use std::time::Duration;

use thiserror::Error;

use crate::logging::{LogConfig, LogFormat};

pub const ENV_LOG: &str = "MRS_LOG";
pub const ENV_LOG_FORMAT: &str = "MRS_LOG_FORMAT";
pub const ENV_MAX_TOKENS: &str = "MRS_MAX_TOKENS";
pub const ENV_TOKEN_DELAY_MS: &str = "MRS_TOKEN_DELAY_MS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown log format: {0:?}")]
    UnknownLogFormat(String),
    #[error("invalid log filter: {0}")]
    InvalidFilter(String),
}

/// Parameters controlling a single generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateParams {
    /// Upper bound on fragments delivered to the sink.
    pub max_tokens: u32,
    /// Pause before each fragment is delivered.
    pub token_delay: Duration,
}

impl Default for GenerateParams {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            token_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub generate: GenerateParams,
    pub log: LogConfig,
}

impl EngineConfig {
    /// Read configuration from the `MRS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Unset keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EngineConfig::default();

        if let Some(level) = lookup(ENV_LOG) {
            config.log.level = level;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log.format = format.parse()?;
        }
        if let Some(raw) = lookup(ENV_MAX_TOKENS) {
            config.generate.max_tokens = match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_MAX_TOKENS,
                        value: raw,
                    })
                }
            };
        }
        if let Some(raw) = lookup(ENV_TOKEN_DELAY_MS) {
            let ms = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_TOKEN_DELAY_MS,
                    value: raw.clone(),
                })?;
            config.generate.token_delay = Duration::from_millis(ms);
        }

        Ok(config)
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::UnknownLogFormat(s.to_string())),
        }
    }
}
