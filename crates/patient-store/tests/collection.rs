//! Integration tests for the patient file collection.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use patient_model::{AuditChannel, MemoryAuditTrail, PatientError, PatientField, PatientRecord};
use patient_store::{PatientFileCollection, PersistRecord, StoreError};
use tempfile::TempDir;

const PATIENTS: [[&str; 6]; 5] = [
    ["Ivan", "Petrov", "1990-01-01", "9001234567", "паспорт", "4506123456"],
    ["Anna", "Smirnova", "14.05.1985", "89007654321", "Заграничный паспорт", "123456789"],
    ["Oleg", "Sidorov", "2000-12-31", "+7 912 000 11 22", "водительское удостоверение", "7700123456"],
    ["Maria", "Ivanova", "1975-07-07", "9110002233", "паспорт", "4000111222"],
    ["Pavel", "Orlov", "01 02 1960", "9220003344", "паспорт", "4111222333"],
];

fn empty_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("patients.csv");
    fs::write(&path, "").expect("create backing file");
    path
}

fn persist_all(path: &Path, trail: &Arc<MemoryAuditTrail>, rows: &[[&str; 6]]) {
    for [first, last, birth, phone, doc_type, doc_id] in rows {
        PatientRecord::new(trail.clone(), first, last, birth, phone, doc_type, doc_id)
            .expect("valid record")
            .persist(path)
            .expect("persist record");
    }
}

#[test]
fn open_missing_file_is_not_found() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.csv");
    let result = PatientFileCollection::open(&path, Arc::new(MemoryAuditTrail::new()));
    assert!(matches!(result, Err(StoreError::NotFound { path: p }) if p == path));
}

#[test]
fn open_directory_is_not_found() {
    let dir = TempDir::new().unwrap();
    let result = PatientFileCollection::open(dir.path(), Arc::new(MemoryAuditTrail::new()));
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[test]
fn empty_file_yields_nothing() {
    let dir = TempDir::new().unwrap();
    let path = empty_file(&dir);
    let collection = PatientFileCollection::open(&path, Arc::new(MemoryAuditTrail::new())).unwrap();

    assert_eq!(collection.iter().count(), 0);
    assert_eq!(collection.limit(3).count(), 0);
    assert_eq!(collection.row_count().unwrap(), 0);
}

#[test]
fn persist_then_iterate_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = empty_file(&dir);
    let trail = Arc::new(MemoryAuditTrail::new());
    let patient = PatientRecord::new(
        trail.clone(),
        "anna",
        "smirnova",
        "14.05.1985",
        "+7 (900) 765-43-21",
        "ЗАГРАНИЧНЫЙ ПАСПОРТ",
        "12 3456789",
    )
    .unwrap();

    let collection = PatientFileCollection::open(&path, trail.clone()).unwrap();
    collection.persist(&patient).unwrap();

    let stored: Vec<PatientRecord> = collection.iter().map(Result::unwrap).collect();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], patient);
    assert_eq!(stored[0].to_row(), patient.to_row());

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(
        content,
        "Anna,Smirnova,1985-05-14,9007654321,заграничный паспорт,123456789\n"
    );
    assert!(
        trail
            .messages(AuditChannel::Info)
            .contains(&"saved to csv: User Anna Smirnova".to_string())
    );
}

#[test]
fn persist_creates_missing_file_and_appends_duplicates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new.csv");
    let trail = Arc::new(MemoryAuditTrail::new());
    persist_all(&path, &trail, &PATIENTS[..1]);
    persist_all(&path, &trail, &PATIENTS[..1]);

    let collection = PatientFileCollection::open(&path, trail).unwrap();
    assert_eq!(collection.row_count().unwrap(), 2);
    let stored: Vec<_> = collection.iter().map(Result::unwrap).collect();
    assert_eq!(stored[0], stored[1]);
}

#[test]
fn iteration_follows_file_order() {
    let dir = TempDir::new().unwrap();
    let path = empty_file(&dir);
    let trail = Arc::new(MemoryAuditTrail::new());
    persist_all(&path, &trail, &PATIENTS);

    let collection = PatientFileCollection::open(&path, trail).unwrap();
    let names: Vec<String> = collection
        .iter()
        .map(|record| record.unwrap().first_name().to_string())
        .collect();
    assert_eq!(names, vec!["Ivan", "Anna", "Oleg", "Maria", "Pavel"]);
}

#[test]
fn limit_bounds_iteration() {
    let dir = TempDir::new().unwrap();
    let path = empty_file(&dir);
    let trail = Arc::new(MemoryAuditTrail::new());
    persist_all(&path, &trail, &PATIENTS);
    let collection = PatientFileCollection::open(&path, trail).unwrap();

    let first_two: Vec<String> = collection
        .limit(2)
        .map(|record| record.unwrap().last_name().to_string())
        .collect();
    assert_eq!(first_two, vec!["Petrov", "Smirnova"]);

    assert_eq!(collection.limit(10).count(), 5);
    assert_eq!(collection.limit(0).count(), 0);
}

#[test]
fn each_iteration_starts_over() {
    let dir = TempDir::new().unwrap();
    let path = empty_file(&dir);
    let trail = Arc::new(MemoryAuditTrail::new());
    persist_all(&path, &trail, &PATIENTS[..3]);
    let collection = PatientFileCollection::open(&path, trail).unwrap();

    let mut iter = collection.iter();
    assert_eq!(iter.by_ref().count(), 3);
    assert_eq!(iter.position(), 3);
    assert!(iter.next().is_none());

    assert_eq!((&collection).into_iter().count(), 3);
}

#[test]
fn rows_appended_during_iteration_are_seen() {
    let dir = TempDir::new().unwrap();
    let path = empty_file(&dir);
    let trail = Arc::new(MemoryAuditTrail::new());
    persist_all(&path, &trail, &PATIENTS[..1]);
    let collection = PatientFileCollection::open(&path, trail.clone()).unwrap();

    let mut iter = collection.iter();
    assert!(iter.next().is_some());
    persist_all(&path, &trail, &PATIENTS[1..2]);
    let second = iter.next().expect("appended row").unwrap();
    assert_eq!(second.first_name(), "Anna");
    assert!(iter.next().is_none());
}

#[test]
fn invalid_rows_are_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patients.csv");
    fs::write(
        &path,
        "Ivan,Petrov,1990-01-01,9001234567,паспорт,4506123456\n\
         Ivan,Petrov,1990-01-01,,паспорт,4506123456\n\
         Anna,Sm1rnova,1985-05-14,9007654321,паспорт,4506123456\n\
         Maria,Ivanova,1975-07-07,9110002233,паспорт,4000111222\n",
    )
    .unwrap();
    let trail = Arc::new(MemoryAuditTrail::new());
    let collection = PatientFileCollection::open(&path, trail.clone()).unwrap();

    let results: Vec<_> = collection.iter().collect();
    assert_eq!(results.len(), 4);
    assert!(results[0].is_ok());
    assert!(matches!(
        &results[1],
        Err(StoreError::Record {
            row: 1,
            source: PatientError::WrongType {
                field: PatientField::Phone
            },
            ..
        })
    ));
    assert!(matches!(
        &results[2],
        Err(StoreError::Record {
            row: 2,
            source: PatientError::Validation {
                field: PatientField::LastName,
                ..
            },
            ..
        })
    ));
    assert_eq!(results[3].as_ref().unwrap().first_name(), "Maria");
    assert_eq!(trail.messages(AuditChannel::Error).len(), 2);
}

#[test]
fn leading_zeros_in_ids_survive_storage() {
    let dir = TempDir::new().unwrap();
    let path = empty_file(&dir);
    let trail = Arc::new(MemoryAuditTrail::new());
    persist_all(
        &path,
        &trail,
        &[["Ivan", "Petrov", "1990-01-01", "0001234567", "паспорт", "0006123456"]],
    );
    let collection = PatientFileCollection::open(&path, trail).unwrap();
    let stored = collection.iter().next().unwrap().unwrap();
    assert_eq!(stored.phone(), "0001234567");
    assert_eq!(stored.document_id(), "0006123456");
}

#[test]
fn rows_with_extra_cells_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("patients.csv");
    fs::write(
        &path,
        "Ivan,Petrov,1990-01-01,9001234567,паспорт,4506123456,EXTRA,junk\n\
         Maria,Ivanova,1975-07-07,9110002233,паспорт,4000111222\n",
    )
    .unwrap();
    let collection = PatientFileCollection::open(&path, Arc::new(MemoryAuditTrail::new())).unwrap();

    let results: Vec<_> = collection.iter().collect();
    assert_eq!(results.len(), 2);
    assert!(matches!(
        &results[0],
        Err(StoreError::Record {
            row: 0,
            source: PatientError::RowLength {
                expected: 6,
                actual: 8
            },
            ..
        })
    ));
    assert_eq!(results[1].as_ref().unwrap().first_name(), "Maria");
}

#[test]
fn empty_name_is_stored_but_not_read_back() {
    let dir = TempDir::new().unwrap();
    let path = empty_file(&dir);
    let trail = Arc::new(MemoryAuditTrail::new());
    persist_all(
        &path,
        &trail,
        &[["", "Petrov", "1990-01-01", "9001234567", "паспорт", "4506123456"]],
    );
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        ",Petrov,1990-01-01,9001234567,паспорт,4506123456\n"
    );

    let collection = PatientFileCollection::open(&path, trail).unwrap();
    let results: Vec<_> = collection.iter().collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(
        &results[0],
        Err(StoreError::Record {
            source: PatientError::WrongType {
                field: PatientField::FirstName
            },
            ..
        })
    ));
}
