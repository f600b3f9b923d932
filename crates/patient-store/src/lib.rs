//! Flat-file storage for patient records.
//!
//! Records are appended as CSV rows to a single backing file and read back
//! through a forward iterator that re-validates every row.
//!
//! # Example
//!
//! ```ignore
//! use patient_model::{FileAuditTrail, PatientRecord};
//! use patient_store::{PatientFileCollection, PersistRecord};
//!
//! let audit = FileAuditTrail::default().shared();
//! let patient = PatientRecord::new(audit.clone(), "Ivan", "Petrov", "1990-01-01",
//!     "9001234567", "паспорт", "4506123456")?;
//! patient.persist("patients.csv".as_ref())?;
//!
//! let collection = PatientFileCollection::open("patients.csv", audit)?;
//! for record in collection.limit(10) {
//!     println!("{}", record?);
//! }
//! ```

mod collection;
mod error;
mod persist;
mod row;

// === Error Types ===
pub use error::{Result, StoreError};

// === Collection ===
pub use collection::{DEFAULT_DATA_FILE, PatientFileCollection, PatientIter};

// === Persistence ===
pub use persist::PersistRecord;
