//! Patient collection over a backing CSV file.

use std::path::{Path, PathBuf};

use patient_model::{PatientRecord, SharedAuditTrail};

use crate::error::{Result, StoreError};
use crate::persist::PersistRecord;
use crate::row::{cells, count_rows, read_row};

/// Default backing file name.
pub const DEFAULT_DATA_FILE: &str = "patients.csv";

/// Handle to an existing backing file.
///
/// The collection keeps no records in memory; every iterator reads the file
/// on demand.
#[derive(Clone)]
pub struct PatientFileCollection {
    path: PathBuf,
    audit: SharedAuditTrail,
}

impl PatientFileCollection {
    /// Open a collection over `path`, which must be an existing file.
    pub fn open(path: impl Into<PathBuf>, audit: SharedAuditTrail) -> Result<Self> {
        let path = path.into();
        if !path.is_file() {
            return Err(StoreError::NotFound { path });
        }
        tracing::debug!(path = %path.display(), "opened patient collection");
        Ok(Self { path, audit })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Iterate over every stored record in file order.
    pub fn iter(&self) -> PatientIter {
        PatientIter::new(self.path.clone(), self.audit.clone(), None)
    }

    /// Iterate over at most the first `n` stored records.
    pub fn limit(&self, n: usize) -> PatientIter {
        PatientIter::new(self.path.clone(), self.audit.clone(), Some(n))
    }

    /// Number of rows currently stored.
    pub fn row_count(&self) -> Result<usize> {
        count_rows(&self.path)
    }

    /// Append a record to this collection's file.
    pub fn persist(&self, record: &PatientRecord) -> Result<()> {
        record.persist(&self.path)
    }
}

impl IntoIterator for &PatientFileCollection {
    type Item = Result<PatientRecord>;
    type IntoIter = PatientIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Forward iterator over stored records.
///
/// Each step re-reads the file length and row count, then rebuilds the record
/// at the current position with full validation. A row that fails
/// validation yields an error and iteration moves on to the next row. Read
/// failures end the iteration after being reported once.
pub struct PatientIter {
    path: PathBuf,
    audit: SharedAuditTrail,
    limit: Option<usize>,
    index: usize,
    done: bool,
}

impl PatientIter {
    fn new(path: PathBuf, audit: SharedAuditTrail, limit: Option<usize>) -> Self {
        Self {
            path,
            audit,
            limit,
            index: 0,
            done: false,
        }
    }

    /// Rows handed out so far.
    pub fn position(&self) -> usize {
        self.index
    }

    fn end(&self) -> Result<usize> {
        let len = std::fs::metadata(&self.path)
            .map_err(|e| StoreError::io(&self.path, e))?
            .len();
        if len == 0 {
            return Ok(0);
        }
        let total = count_rows(&self.path)?;
        Ok(self.limit.map_or(total, |limit| limit.min(total)))
    }

    fn read_at(&self, index: usize) -> Result<Option<PatientRecord>> {
        let Some(row) = read_row(&self.path, index)? else {
            return Ok(None);
        };
        PatientRecord::from_row(self.audit.clone(), &cells(&row))
            .map(Some)
            .map_err(|source| StoreError::Record {
                path: self.path.clone(),
                row: index,
                source,
            })
    }
}

impl Iterator for PatientIter {
    type Item = Result<PatientRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let end = match self.end() {
            Ok(end) => end,
            Err(error) => {
                self.done = true;
                return Some(Err(error));
            }
        };
        if self.index >= end {
            self.done = true;
            return None;
        }

        let index = self.index;
        self.index += 1;
        match self.read_at(index) {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(error @ StoreError::Record { .. }) => {
                tracing::warn!(row = index, "skipping invalid stored record");
                Some(Err(error))
            }
            Err(error) => {
                self.done = true;
                Some(Err(error))
            }
        }
    }
}
