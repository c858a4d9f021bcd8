//! Admission pipeline
//!
//! ```text
//! Received -> Validated -> UniquenessChecked -> Persisted -> NotificationEnqueued
//!     |            |
//!     v            v
//! RejectedInvalid  RejectedDuplicate
//! ```
//!
//! Validation and duplicate rejection happen before any write. The
//! uniqueness check and the append run under one admission lock so two
//! concurrent submissions with the same lead email cannot both pass.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::{Map, Value};
use tracing::{debug, error, info};

use super::errors::{AdmissionError, AdmissionResult};
use super::identifier;
use super::model::Registration;
use super::validator;
use crate::notify::NotificationQueue;
use crate::store::{RecordStore, StoreError};

/// Turns raw submissions into persisted registrations.
pub struct AdmissionPipeline {
    store: Arc<dyn RecordStore>,
    notifications: NotificationQueue,
    /// Serializes check-then-append
    admission_lock: Mutex<()>,
}

impl AdmissionPipeline {
    pub fn new(store: Arc<dyn RecordStore>, notifications: NotificationQueue) -> Self {
        Self {
            store,
            notifications,
            admission_lock: Mutex::new(()),
        }
    }

    /// Admit one submission.
    ///
    /// On success the registration is durable and its confirmation has been
    /// queued (not sent). Persistence is attempted exactly once.
    ///
    /// # Errors
    ///
    /// - `Invalid` with every field message when validation fails
    /// - `Duplicate` when the lead email is already registered
    /// - `Storage` when the record store cannot be read or written
    pub fn admit(&self, raw: &Map<String, Value>) -> AdmissionResult<Registration> {
        let normalized = validator::validate(raw).map_err(|errors| {
            debug!(errors = errors.len(), "registration rejected: invalid");
            AdmissionError::Invalid(errors)
        })?;

        let registration = {
            let _guard = self
                .admission_lock
                .lock()
                .map_err(|_| AdmissionError::Storage(StoreError::LockPoisoned))?;

            if self.store.exists(&normalized.lead_email)? {
                info!(
                    lead_email = %normalized.lead_email,
                    "registration rejected: duplicate lead email"
                );
                return Err(AdmissionError::Duplicate {
                    lead_email: normalized.lead_email,
                });
            }

            let registration =
                Registration::admit(identifier::generate(), Utc::now(), normalized);

            self.store.append(&registration).map_err(|e| {
                error!(
                    hackathon_id = %registration.identifier,
                    error = %e,
                    "failed to persist registration"
                );
                AdmissionError::from(e)
            })?;

            registration
        };

        info!(
            hackathon_id = %registration.identifier,
            team_name = %registration.team_name,
            team_size = registration.team_size,
            "registration admitted"
        );

        self.notifications.enqueue(registration.clone());
        Ok(registration)
    }

    /// Look up a registration by identifier (case-insensitive, trimmed).
    ///
    /// A query that cannot be an identifier is answered without touching the
    /// store.
    pub fn lookup(&self, query: &str) -> AdmissionResult<Option<Registration>> {
        let normalized = identifier::normalize(query);
        if !identifier::is_well_formed(&normalized) {
            debug!(query = %normalized, "lookup of malformed identifier");
            return Ok(None);
        }
        Ok(self.store.find_by_identifier(&normalized)?)
    }

    /// Number of persisted registrations.
    pub fn registration_count(&self) -> AdmissionResult<usize> {
        Ok(self.store.len()?)
    }
}
