//! Patient record model.
//!
//! This crate validates and normalizes the raw fields of a patient record
//! and keeps an audit trail of every change.
//!
//! # Features
//!
//! - **Normalizers**: names, birth dates, phone numbers, document types and ids
//! - **Records**: [`PatientRecord`] with write-once names and validated setters
//! - **Audit trail**: file-backed or in-memory info/error channels
//!
//! # Example
//!
//! ```ignore
//! use patient_model::{FileAuditTrail, PatientRecord};
//!
//! let audit = FileAuditTrail::default().shared();
//! let mut patient = PatientRecord::new(
//!     audit, "ivan", "petrov", "14.05.1990", "+7 900 123-45-67", "Паспорт", "4506 123456",
//! )?;
//! patient.set_phone("8 (912) 000-11-22")?;
//! ```

mod audit;
mod document;
mod error;
mod normalize;
mod record;

// === Error Types ===
pub use error::{PatientError, Result, UnknownFieldError, ValidationError};

// === Audit Trail ===
pub use audit::{
    AuditChannel, AuditEntry, AuditTrail, DEFAULT_ERROR_LOG, DEFAULT_INFO_LOG, FileAuditTrail,
    MemoryAuditTrail, NullAuditTrail, SharedAuditTrail,
};

// === Normalization ===
pub use normalize::{
    MIN_BIRTH_YEAR, PHONE_DIGITS, normalize_birth_date, normalize_birth_date_on,
    normalize_document_id, normalize_document_type, normalize_name, normalize_phone,
};

// === Records ===
pub use document::DocumentType;
pub use record::{FIELD_COUNT, NEW_USER, PatientField, PatientRecord};
