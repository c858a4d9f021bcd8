//! In-memory record store for testing

use std::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::RecordStore;
use crate::registration::Registration;

/// Volatile store with the same uniqueness rules as the file store.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<Registration>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all records in append order.
    pub fn records(&self) -> StoreResult<Vec<Registration>> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.clone())
    }
}

impl RecordStore for InMemoryRecordStore {
    fn exists(&self, lead_email: &str) -> StoreResult<bool> {
        let needle = lead_email.trim().to_lowercase();
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.iter().any(|r| r.lead_email.to_lowercase() == needle))
    }

    fn append(&self, registration: &Registration) -> StoreResult<()> {
        let mut records = self.records.write().map_err(|_| StoreError::LockPoisoned)?;

        let email = registration.lead_email.to_lowercase();
        if records.iter().any(|r| r.lead_email.to_lowercase() == email) {
            return Err(StoreError::DuplicateLeadEmail(registration.lead_email.clone()));
        }
        if records
            .iter()
            .any(|r| r.identifier.eq_ignore_ascii_case(&registration.identifier))
        {
            return Err(StoreError::DuplicateIdentifier(registration.identifier.clone()));
        }

        records.push(registration.clone());
        Ok(())
    }

    fn find_by_identifier(&self, identifier: &str) -> StoreResult<Option<Registration>> {
        let query = identifier.trim();
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records
            .iter()
            .find(|r| r.identifier.eq_ignore_ascii_case(query))
            .cloned())
    }

    fn len(&self) -> StoreResult<usize> {
        let records = self.records.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn registration(id: &str, email: &str) -> Registration {
        Registration {
            identifier: id.to_string(),
            submitted_at: Utc::now(),
            team_name: "Solo".to_string(),
            problem_track: "Health".to_string(),
            team_size: 1,
            lead_name: "Kiran".to_string(),
            lead_email: email.to_string(),
            lead_phone: "9123456780".to_string(),
            additional_members: vec![],
        }
    }

    #[test]
    fn test_memory_store_contract() {
        let store = InMemoryRecordStore::new();
        assert!(store.is_empty().unwrap());

        store
            .append(&registration("HACK-AAAA1111", "kiran@example.com"))
            .unwrap();

        assert!(store.exists("Kiran@Example.com").unwrap());
        assert!(store.find_by_identifier(" hack-aaaa1111").unwrap().is_some());
        assert!(matches!(
            store.append(&registration("HACK-BBBB2222", "kiran@example.com")),
            Err(StoreError::DuplicateLeadEmail(_))
        ));
        assert!(matches!(
            store.append(&registration("hack-aaaa1111", "other@example.com")),
            Err(StoreError::DuplicateIdentifier(_))
        ));
        assert_eq!(store.records().unwrap().len(), 1);
    }
}
