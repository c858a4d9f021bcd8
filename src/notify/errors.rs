//! Notification error types
//!
//! These never leave the notifier; they exist so failures can be logged with
//! a meaningful category.

use thiserror::Error;

/// Result type for notification operations
pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// Sender or recipient address does not parse
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Message could not be assembled
    #[error("Failed to build email: {0}")]
    Build(String),

    /// SMTP server rejected the credentials
    #[error("SMTP authentication failed: {0}")]
    Authentication(String),

    /// Connection, TLS, or protocol failure
    #[error("SMTP transport error: {0}")]
    Transport(String),
}

impl NotifyError {
    /// Short category for structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            NotifyError::InvalidAddress(_) => "invalid_address",
            NotifyError::Build(_) => "build",
            NotifyError::Authentication(_) => "authentication",
            NotifyError::Transport(_) => "transport",
        }
    }
}
