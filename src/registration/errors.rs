//! # Registration Errors
//!
//! Error types for validation and admission.

use std::fmt;

use thiserror::Error;

use crate::store::StoreError;

/// Result type for admission operations
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// Accumulated field-level validation messages, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    messages: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages.join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Reasons an admission ends without a persisted record
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// One or more field rules failed
    #[error("Validation failed: {0}")]
    Invalid(ValidationErrors),

    /// Lead email already registered
    #[error("A team with lead email '{lead_email}' is already registered.")]
    Duplicate { lead_email: String },

    /// Record store read or write failed
    #[error("Storage error: {0}")]
    Storage(#[source] StoreError),
}

impl AdmissionError {
    /// Returns the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            AdmissionError::Invalid(_) => 400,
            AdmissionError::Duplicate { .. } => 409,
            AdmissionError::Storage(_) => 500,
        }
    }

    /// Returns whether the caller can fix this by resubmitting
    pub fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<ValidationErrors> for AdmissionError {
    fn from(errors: ValidationErrors) -> Self {
        AdmissionError::Invalid(errors)
    }
}

impl From<StoreError> for AdmissionError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateLeadEmail(lead_email) => AdmissionError::Duplicate { lead_email },
            other => AdmissionError::Storage(other),
        }
    }
}
