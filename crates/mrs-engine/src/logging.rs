//! Tracing subscriber setup for the bridge.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ConfigError;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable multi-line output (default for development builds).
    #[default]
    Pretty,
    /// Single-line human-readable output.
    Compact,
    /// JSON structured logging.
    Json,
}

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub format: LogFormat,
    /// `EnvFilter` directive, e.g. "info" or "mrs_engine=debug".
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            level: "info".to_string(),
        }
    }
}

/// Install a global subscriber writing to stderr.
///
/// Returns `Ok(false)` when the host already installed a global subscriber;
/// that subscriber is left in place.
pub fn init_logging(config: &LogConfig) -> Result<bool, ConfigError> {
    let filter = EnvFilter::try_new(&config.level)
        .map_err(|e| ConfigError::InvalidFilter(e.to_string()))?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    Ok(installed.is_ok())
}
