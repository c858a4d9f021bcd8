//! Observability subsystem
//!
//! Structured logging through `tracing`. Output goes to stderr so command
//! output on stdout stays machine-readable.
//!
//! # Usage
//!
//! ```ignore
//! use teamreg::observability::{init_logging, LoggingConfig};
//!
//! init_logging(&LoggingConfig::default())?;
//! tracing::info!(port = 5000, "listening");
//! ```

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt as fmt_layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per event
    #[default]
    Json,
    /// Human-readable output for development
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Json,
        }
    }
}

/// Observability error
///
/// Logging failures are never fatal to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservabilityError {
    message: String,
}

impl ObservabilityError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ObservabilityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "logging setup failed: {}", self.message)
    }
}

impl std::error::Error for ObservabilityError {}

/// Result type for observability operations
pub type ObservabilityResult<T> = Result<T, ObservabilityError>;

fn env_filter(level: &str) -> ObservabilityResult<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| ObservabilityError::new(format!("invalid log filter '{}': {}", level, e)))
}

/// Install the global subscriber.
///
/// Fails if the filter does not parse or a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> ObservabilityResult<()> {
    let filter = env_filter(&config.level)?;

    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt_layer::layer()
                    .json()
                    .flatten_event(true)
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer::layer().with_target(false).with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| ObservabilityError::new(e.to_string()))
}
