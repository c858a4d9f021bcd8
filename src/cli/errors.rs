//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::notify::NotifyError;
use crate::observability::ObservabilityError;
use crate::store::StoreError;

/// CLI error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Invalid configuration
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// Record store could not be opened or read
    StoreFailed,
    /// Record file is damaged and must be repaired by hand
    StoreCorrupted,
    /// Runtime or HTTP server failure
    ServeFailed,
    /// Lookup found no registration
    NotFound,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "TEAMREG_CLI_CONFIG_ERROR",
            Self::IoError => "TEAMREG_CLI_IO_ERROR",
            Self::StoreFailed => "TEAMREG_CLI_STORE_FAILED",
            Self::StoreCorrupted => "TEAMREG_CLI_STORE_CORRUPTED",
            Self::ServeFailed => "TEAMREG_CLI_SERVE_FAILED",
            Self::NotFound => "TEAMREG_CLI_NOT_FOUND",
        }
    }
}

impl fmt::Display for CliErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// CLI error
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Serve failed
    pub fn serve_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServeFailed, msg)
    }

    /// No registration with this identifier
    pub fn not_found(identifier: &str) -> Self {
        Self::new(
            CliErrorCode::NotFound,
            format!("No registration found for ID '{}'.", identifier),
        )
    }

    /// Get the error code
    pub fn code(&self) -> CliErrorCode {
        self.code
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        if e.is_fatal() {
            Self::new(
                CliErrorCode::StoreCorrupted,
                format!("{}. Repair or restore the file before retrying.", e),
            )
        } else {
            Self::new(CliErrorCode::StoreFailed, e.to_string())
        }
    }
}

impl From<NotifyError> for CliError {
    fn from(e: NotifyError) -> Self {
        Self::config_error(format!("email transport: {}", e))
    }
}

impl From<ObservabilityError> for CliError {
    fn from(e: ObservabilityError) -> Self {
        Self::config_error(e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::not_found("HACK-00000000");
        assert_eq!(
            err.to_string(),
            "TEAMREG_CLI_NOT_FOUND: No registration found for ID 'HACK-00000000'."
        );
    }

    #[test]
    fn test_store_error_maps_to_store_failed() {
        let err = CliError::from(StoreError::LockPoisoned);
        assert_eq!(err.code(), CliErrorCode::StoreFailed);
    }

    #[test]
    fn test_corruption_maps_to_store_corrupted() {
        let err = CliError::from(StoreError::corrupted("r.jsonl", 4, "bad row"));
        assert_eq!(err.code(), CliErrorCode::StoreCorrupted);
        assert!(err.message().contains("line 4"));
        assert!(err.message().contains("Repair"));
    }
}
