//! Registration record store
//!
//! The durable, append-only collection of admitted registrations.
//!
//! # Design Principles
//!
//! - Append-only (no updates, no deletes)
//! - One writer process owns the backing file
//! - A record is synced to disk before `append` returns
//! - Lead email and identifier are unique across all records
//!
//! The flat row encoding lives in [`record`]; callers only see
//! [`Registration`] values.

mod errors;
mod file;
mod memory;
mod record;

pub use errors::{StoreError, StoreResult};
pub use file::FileRecordStore;
pub use memory::InMemoryRecordStore;
pub use record::{header_line, StoredMember, StoredRecord, COLUMNS};

use crate::registration::Registration;

/// Storage seam used by the admission pipeline.
pub trait RecordStore: Send + Sync {
    /// Whether any stored record has this lead email (compared lower-cased).
    fn exists(&self, lead_email: &str) -> StoreResult<bool>;

    /// Durably append one record.
    ///
    /// Fails with [`StoreError::DuplicateLeadEmail`] or
    /// [`StoreError::DuplicateIdentifier`] instead of writing a second record
    /// with the same key.
    fn append(&self, registration: &Registration) -> StoreResult<()>;

    /// Find a record by identifier, ignoring case and surrounding whitespace.
    fn find_by_identifier(&self, identifier: &str) -> StoreResult<Option<Registration>>;

    /// Number of stored records.
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
