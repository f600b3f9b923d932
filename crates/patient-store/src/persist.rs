//! Appending records to a backing file.

use std::path::Path;

use patient_model::PatientRecord;

use crate::error::Result;
use crate::row::append_row;

/// Persist a record as one CSV row.
pub trait PersistRecord {
    /// Append one row to `path`, creating the file when missing.
    ///
    /// Repeated calls append duplicate rows. There is no transactional
    /// guarantee: an interrupted write can leave a partial row.
    fn persist(&self, path: &Path) -> Result<()>;
}

impl PersistRecord for PatientRecord {
    fn persist(&self, path: &Path) -> Result<()> {
        append_row(path, self.to_row())?;
        self.audit()
            .info(&format!("saved to csv: {}", self.username()));
        tracing::info!(path = %path.display(), "patient record saved");
        Ok(())
    }
}
