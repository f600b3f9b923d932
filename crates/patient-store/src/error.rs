//! Error types for patient file storage.

use std::path::PathBuf;

use patient_model::PatientError;
use thiserror::Error;

/// Errors that can occur while reading or writing the backing file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing file does not exist.
    #[error("patient file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to open, read or write the backing file.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content.
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A stored row failed record validation.
    #[error("invalid record at row {row} of {path}")]
    Record {
        path: PathBuf,
        row: usize,
        #[source]
        source: PatientError,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
