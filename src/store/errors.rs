//! Record store error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for record store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Record store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening, creating, or scanning the backing file failed
    #[error("failed to read record store {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Appending or syncing a record failed
    #[error("failed to write record {identifier}: {source}")]
    WriteFailed {
        identifier: String,
        #[source]
        source: io::Error,
    },

    /// The file does not start with the expected header, or an interior line
    /// is not a valid record
    #[error("record store {path} is corrupted at line {line}: {reason}")]
    Corrupted {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A record with this lead email is already stored
    #[error("lead email already stored: {0}")]
    DuplicateLeadEmail(String),

    /// A record with this identifier is already stored
    #[error("identifier already stored: {0}")]
    DuplicateIdentifier(String),

    /// Record could not be encoded
    #[error("failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),

    /// A holder of the store lock panicked
    #[error("record store lock poisoned")]
    LockPoisoned,
}

impl StoreError {
    pub fn read_failed(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub fn write_failed(identifier: impl Into<String>, source: io::Error) -> Self {
        StoreError::WriteFailed {
            identifier: identifier.into(),
            source,
        }
    }

    pub fn corrupted(path: impl Into<PathBuf>, line: usize, reason: impl Into<String>) -> Self {
        StoreError::Corrupted {
            path: path.into(),
            line,
            reason: reason.into(),
        }
    }

    /// Corruption means the file needs operator attention before serving.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Corrupted { .. })
    }
}
