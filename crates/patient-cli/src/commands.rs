use anyhow::{Context, Result};
use tracing::{debug, info, info_span, warn};

use patient_model::{PatientRecord, SharedAuditTrail};
use patient_store::{PatientFileCollection, PersistRecord, StoreError};

use crate::config::PatientsConfig;
use crate::logging::redact_value;

/// Raw fields of a patient to register.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: String,
    pub phone: String,
    pub document_type: String,
    pub document_id: String,
}

/// Records read by `list`, plus the rows that failed validation.
#[derive(Debug)]
pub struct ListOutcome {
    pub records: Vec<PatientRecord>,
    pub invalid: Vec<StoreError>,
}

impl ListOutcome {
    pub fn has_errors(&self) -> bool {
        !self.invalid.is_empty()
    }
}

/// Validate a new patient and append it to the configured data file.
pub fn add_patient(
    config: &PatientsConfig,
    audit: SharedAuditTrail,
    patient: &NewPatient,
) -> Result<PatientRecord> {
    let _span = info_span!("add", data_file = %config.data_file.display()).entered();
    let record = PatientRecord::new(
        audit,
        &patient.first_name,
        &patient.last_name,
        &patient.birth_date,
        &patient.phone,
        &patient.document_type,
        &patient.document_id,
    )
    .context("invalid patient")?;
    record
        .persist(&config.data_file)
        .with_context(|| format!("save patient to {}", config.data_file.display()))?;
    info!(patient = redact_value(&record.username()), "patient added");
    Ok(record)
}

/// Read up to `limit` records from the configured data file.
///
/// Rows that fail validation are collected rather than aborting the listing.
pub fn list_patients(
    config: &PatientsConfig,
    audit: SharedAuditTrail,
    limit: Option<usize>,
) -> Result<ListOutcome> {
    let _span = info_span!("list", data_file = %config.data_file.display()).entered();
    let collection = PatientFileCollection::open(&config.data_file, audit)
        .context("open patient collection")?;
    let iter = match limit {
        Some(n) => collection.limit(n),
        None => collection.iter(),
    };

    let mut outcome = ListOutcome {
        records: Vec::new(),
        invalid: Vec::new(),
    };
    for item in iter {
        match item {
            Ok(record) => {
                debug!(patient = redact_value(&record.username()), "patient read");
                outcome.records.push(record);
            }
            Err(error @ StoreError::Record { .. }) => {
                warn!(%error, "invalid patient row");
                outcome.invalid.push(error);
            }
            Err(error) => return Err(error).context("read patient collection"),
        }
    }
    info!(
        records = outcome.records.len(),
        invalid = outcome.invalid.len(),
        "patients listed"
    );
    Ok(outcome)
}
