//! Record store durability tests
//!
//! Every acknowledged append must survive a reopen, and a crash mid-write
//! must cost at most the record being written.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use teamreg::registration::{Member, Registration};
use teamreg::store::{header_line, FileRecordStore, RecordStore, StoreError};

fn registration(n: u32) -> Registration {
    Registration {
        identifier: format!("HACK-{:08}", n),
        submitted_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, n % 60).unwrap(),
        team_name: format!("Team {}", n),
        problem_track: "Open Innovation".to_string(),
        team_size: 2,
        lead_name: format!("Lead {}", n),
        lead_email: format!("lead{}@example.com", n),
        lead_phone: "9876543210".to_string(),
        additional_members: vec![Member::new(
            format!("Member {}", n),
            Some(format!("member{}@example.com", n)),
        )],
    }
}

fn append_raw(path: &Path, bytes: &[u8]) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(bytes).unwrap();
}

#[test]
fn test_records_survive_reopen_cycles() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registrations.jsonl");

    for cycle in 0..3u32 {
        let store = FileRecordStore::open(&path).unwrap();
        assert_eq!(store.len().unwrap(), (cycle * 2) as usize);

        store.append(&registration(cycle * 2)).unwrap();
        store.append(&registration(cycle * 2 + 1)).unwrap();
    }

    let store = FileRecordStore::open(&path).unwrap();
    assert_eq!(store.len().unwrap(), 6);
    for n in 0..6 {
        let found = store
            .find_by_identifier(&format!("hack-{:08}", n))
            .unwrap()
            .unwrap();
        assert_eq!(found, registration(n));
        assert!(store.exists(&format!("LEAD{}@EXAMPLE.COM", n)).unwrap());
    }

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.lines().next().unwrap(), header_line());
    assert_eq!(contents.lines().count(), 7);
}

#[test]
fn test_uniqueness_enforced_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registrations.jsonl");

    FileRecordStore::open(&path)
        .unwrap()
        .append(&registration(1))
        .unwrap();

    let store = FileRecordStore::open(&path).unwrap();

    let mut same_email = registration(2);
    same_email.lead_email = "lead1@example.com".to_string();
    assert!(matches!(
        store.append(&same_email),
        Err(StoreError::DuplicateLeadEmail(_))
    ));

    let mut same_id = registration(3);
    same_id.identifier = "HACK-00000001".to_string();
    assert!(matches!(
        store.append(&same_id),
        Err(StoreError::DuplicateIdentifier(_))
    ));

    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn test_torn_tail_discarded_on_open() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registrations.jsonl");

    {
        let store = FileRecordStore::open(&path).unwrap();
        store.append(&registration(1)).unwrap();
    }
    append_raw(&path, b"{\"hackathon_id\":\"HACK-0000");

    let store = FileRecordStore::open(&path).unwrap();
    assert_eq!(store.len().unwrap(), 1);

    store.append(&registration(2)).unwrap();
    drop(store);

    let store = FileRecordStore::open(&path).unwrap();
    assert_eq!(store.len().unwrap(), 2);
    assert!(store.find_by_identifier("HACK-00000002").unwrap().is_some());
}

#[test]
fn test_unparseable_complete_line_is_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registrations.jsonl");

    {
        let store = FileRecordStore::open(&path).unwrap();
        store.append(&registration(1)).unwrap();
    }
    // Terminated, so not a torn write.
    append_raw(&path, b"not a record\n");

    let err = FileRecordStore::open(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupted { line: 3, .. }), "{:?}", err);
    assert!(err.is_fatal());
}

#[test]
fn test_torn_multibyte_tail_discarded_on_open() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registrations.jsonl");

    {
        let store = FileRecordStore::open(&path).unwrap();
        store.append(&registration(1)).unwrap();
    }
    // Cut inside the two-byte encoding of 'é'.
    append_raw(
        &path,
        b"{\"hackathon_id\":\"HACK-00000002\",\"team_name\":\"Caf\xc3",
    );

    let store = FileRecordStore::open(&path).unwrap();
    assert_eq!(store.len().unwrap(), 1);

    let mut cafe = registration(2);
    cafe.team_name = "Café".to_string();
    store.append(&cafe).unwrap();
    drop(store);

    let store = FileRecordStore::open(&path).unwrap();
    assert_eq!(store.find_by_identifier("HACK-00000002").unwrap(), Some(cafe));
}

#[test]
fn test_read_records_tolerates_live_writer() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("registrations.jsonl");

    let store = FileRecordStore::open(&path).unwrap();
    store.append(&registration(1)).unwrap();
    store.append(&registration(2)).unwrap();
    // A record the writer has not finished yet.
    append_raw(&path, b"{\"hackathon_id\":\"HACK-00000003\",\"team_na");
    let len_before = fs::metadata(&path).unwrap().len();

    let records = FileRecordStore::read_records(&path).unwrap();

    assert_eq!(records, vec![registration(1), registration(2)]);
    assert_eq!(fs::metadata(&path).unwrap().len(), len_before);
    assert!(store.exists("lead2@example.com").unwrap());
}
