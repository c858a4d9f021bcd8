//! File-backed record store with fsync enforcement
//!
//! Layout: newline-delimited JSON. Line 1 is the header (the column names as a
//! JSON array); every following line is one [`StoredRecord`].
//!
//! On open the whole file is scanned once to rebuild the lead-email and
//! identifier sets. Because this process is the only writer, the sets stay
//! authoritative for the lifetime of the store.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, error, info, warn};

use super::errors::{StoreError, StoreResult};
use super::record::{header_line, StoredRecord, COLUMNS};
use super::RecordStore;
use crate::registration::Registration;

/// Append-only registration file.
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    state: Mutex<FileState>,
}

#[derive(Debug)]
struct FileState {
    /// Append handle
    file: File,
    /// Current file length in bytes
    len: u64,
    lead_emails: HashSet<String>,
    identifiers: HashSet<String>,
}

/// Outcome of scanning an existing file.
struct ScanResult {
    lead_emails: HashSet<String>,
    identifiers: HashSet<String>,
    /// Byte length of the valid prefix; 0 when even the header is torn
    valid_len: u64,
    /// Valid prefix lacks its final newline
    missing_newline: bool,
}

impl FileRecordStore {
    /// Opens the store at `path`, creating it (and parent directories) with
    /// its header line if absent.
    ///
    /// A torn final record, left by a crash mid-write, is cut off; a torn
    /// header on an otherwise empty file is rewritten. Any other malformed
    /// line is reported as corruption.
    ///
    /// Only the owning writer may call this. Read-only callers use
    /// [`FileRecordStore::read_records`].
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::read_failed(parent, e))?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::read_failed(&path, e))?;

        let current_len = file
            .metadata()
            .map_err(|e| StoreError::read_failed(&path, e))?
            .len();

        let scan = if current_len == 0 {
            None
        } else {
            Some(Self::scan(&path, |_| {})?)
        };

        let (lead_emails, identifiers, len) = match scan {
            Some(scan) if scan.valid_len > 0 => {
                if scan.valid_len < current_len {
                    warn!(
                        path = %path.display(),
                        discarded_bytes = current_len - scan.valid_len,
                        "discarding torn trailing record"
                    );
                    file.set_len(scan.valid_len)
                        .map_err(|e| StoreError::read_failed(&path, e))?;
                }

                let mut len = scan.valid_len;
                if scan.missing_newline {
                    file.write_all(b"\n")
                        .map_err(|e| StoreError::read_failed(&path, e))?;
                    len += 1;
                }
                file.sync_all().map_err(|e| StoreError::read_failed(&path, e))?;

                (scan.lead_emails, scan.identifiers, len)
            }
            torn => {
                if torn.is_some() {
                    warn!(path = %path.display(), "rewriting torn header");
                    file.set_len(0)
                        .map_err(|e| StoreError::read_failed(&path, e))?;
                }
                let len = Self::write_header(&mut file, &path)?;
                info!(path = %path.display(), "created record store");
                (HashSet::new(), HashSet::new(), len)
            }
        };

        info!(
            path = %path.display(),
            records = identifiers.len(),
            "opened record store"
        );

        Ok(Self {
            path,
            state: Mutex::new(FileState {
                file,
                len,
                lead_emails,
                identifiers,
            }),
        })
    }

    /// Reads every complete record without modifying the file.
    ///
    /// Safe to call while another process owns the store: a torn or
    /// in-flight final line is skipped, never repaired.
    pub fn read_records(path: impl AsRef<Path>) -> StoreResult<Vec<Registration>> {
        let mut records = Vec::new();
        Self::scan(path.as_ref(), |registration| records.push(registration))?;
        Ok(records)
    }

    /// Returns the path to the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, FileState>> {
        self.state.lock().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_header(file: &mut File, path: &Path) -> StoreResult<u64> {
        let header = format!("{}\n", header_line());
        file.write_all(header.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| StoreError::read_failed(path, e))?;
        Ok(header.len() as u64)
    }

    /// Validates the header and every record, collecting the key sets and
    /// handing each decoded record to `visit`.
    ///
    /// Works on raw bytes so a tail cut inside a multi-byte character counts
    /// as torn.
    fn scan(path: &Path, mut visit: impl FnMut(Registration)) -> StoreResult<ScanResult> {
        let bytes = fs::read(path).map_err(|e| StoreError::read_failed(path, e))?;

        let mut lead_emails = HashSet::new();
        let mut identifiers = HashSet::new();
        let mut offset: u64 = 0;
        let mut missing_newline = false;

        for (idx, chunk) in bytes.split_inclusive(|b| *b == b'\n').enumerate() {
            let line_no = idx + 1;
            let terminated = chunk.last() == Some(&b'\n');

            let mut raw = chunk;
            while let Some((last, rest)) = raw.split_last() {
                if *last == b'\n' || *last == b'\r' {
                    raw = rest;
                } else {
                    break;
                }
            }

            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(e) if !terminated => {
                    debug!(line = line_no, error = %e, "unterminated final line");
                    break;
                }
                Err(e) => {
                    return Err(StoreError::corrupted(
                        path,
                        line_no,
                        format!("invalid UTF-8: {}", e),
                    ))
                }
            };

            if line_no == 1 {
                let reason = match serde_json::from_str::<Vec<String>>(line) {
                    Ok(header) if header == COLUMNS => None,
                    Ok(header) => Some(format!("unexpected header {:?}", header)),
                    Err(e) => Some(format!("unreadable header: {}", e)),
                };
                match reason {
                    None => {}
                    Some(reason) if !terminated => {
                        debug!(%reason, "unterminated header");
                        break;
                    }
                    Some(reason) => return Err(StoreError::corrupted(path, line_no, reason)),
                }
            } else if !line.trim().is_empty() {
                let parsed = serde_json::from_str::<StoredRecord>(line)
                    .map_err(|e| e.to_string())
                    .and_then(StoredRecord::decode);

                let registration = match parsed {
                    Ok(registration) => registration,
                    Err(reason) if !terminated => {
                        debug!(line = line_no, %reason, "unterminated final line");
                        break;
                    }
                    Err(reason) => return Err(StoreError::corrupted(path, line_no, reason)),
                };

                if !lead_emails.insert(registration.lead_email.to_lowercase()) {
                    return Err(StoreError::corrupted(
                        path,
                        line_no,
                        format!("duplicate lead email {}", registration.lead_email),
                    ));
                }
                if !identifiers.insert(registration.identifier.to_ascii_uppercase()) {
                    return Err(StoreError::corrupted(
                        path,
                        line_no,
                        format!("duplicate identifier {}", registration.identifier),
                    ));
                }
                visit(registration);
            }

            offset += chunk.len() as u64;
            missing_newline = !terminated;
        }

        Ok(ScanResult {
            lead_emails,
            identifiers,
            valid_len: offset,
            missing_newline,
        })
    }
}

impl RecordStore for FileRecordStore {
    fn exists(&self, lead_email: &str) -> StoreResult<bool> {
        let state = self.lock()?;
        Ok(state.lead_emails.contains(&lead_email.trim().to_lowercase()))
    }

    fn append(&self, registration: &Registration) -> StoreResult<()> {
        let mut state = self.lock()?;

        let email_key = registration.lead_email.to_lowercase();
        if state.lead_emails.contains(&email_key) {
            return Err(StoreError::DuplicateLeadEmail(registration.lead_email.clone()));
        }
        let id_key = registration.identifier.to_ascii_uppercase();
        if state.identifiers.contains(&id_key) {
            return Err(StoreError::DuplicateIdentifier(registration.identifier.clone()));
        }

        let mut line = serde_json::to_string(&StoredRecord::encode(registration)?)?;
        line.push('\n');

        let before = state.len;
        let written = state
            .file
            .write_all(line.as_bytes())
            .and_then(|_| state.file.sync_all());

        if let Err(e) = written {
            // Cut back to the last complete record so a partial line never survives.
            if let Err(truncate_err) = state.file.set_len(before) {
                error!(
                    path = %self.path.display(),
                    error = %truncate_err,
                    "failed to truncate after write failure"
                );
            }
            return Err(StoreError::write_failed(&registration.identifier, e));
        }

        state.len = before + line.len() as u64;
        state.lead_emails.insert(email_key);
        state.identifiers.insert(id_key);
        Ok(())
    }

    fn find_by_identifier(&self, identifier: &str) -> StoreResult<Option<Registration>> {
        let query = identifier.trim();
        if query.is_empty() {
            return Ok(None);
        }

        // Held so a concurrent append is never observed half-written.
        let state = self.lock()?;
        if !state.identifiers.contains(&query.to_ascii_uppercase()) {
            return Ok(None);
        }

        let file = File::open(&self.path).map_err(|e| StoreError::read_failed(&self.path, e))?;
        for (idx, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| StoreError::read_failed(&self.path, e))?;
            if idx == 0 || line.trim().is_empty() {
                continue;
            }

            let stored: StoredRecord = serde_json::from_str(&line)
                .map_err(|e| StoreError::corrupted(&self.path, idx + 1, e.to_string()))?;
            if stored.hackathon_id.trim().eq_ignore_ascii_case(query) {
                return stored
                    .decode()
                    .map(Some)
                    .map_err(|reason| StoreError::corrupted(&self.path, idx + 1, reason));
            }
        }

        Ok(None)
    }

    fn len(&self) -> StoreResult<usize> {
        Ok(self.lock()?.identifiers.len())
    }
}
