//! CSV row codec for the backing file.
//!
//! Rows have no header, are `\n` terminated and hold the six record fields
//! in [`PatientField::ALL`](patient_model::PatientField::ALL) order. An empty
//! cell is read as a missing value.

use std::fs::{File, OpenOptions};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::error::{Result, StoreError};

fn reader(path: &Path) -> Result<csv::Reader<File>> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| StoreError::csv(path, e))
}

/// Number of rows in the file.
pub fn count_rows(path: &Path) -> Result<usize> {
    let mut reader = reader(path)?;
    let mut count = 0;
    for row in reader.byte_records() {
        row.map_err(|e| StoreError::csv(path, e))?;
        count += 1;
    }
    Ok(count)
}

/// Read the row at `index`, or `None` when the file has fewer rows.
pub fn read_row(path: &Path, index: usize) -> Result<Option<StringRecord>> {
    let mut reader = reader(path)?;
    reader
        .records()
        .nth(index)
        .transpose()
        .map_err(|e| StoreError::csv(path, e))
}

/// Cells of a row with empty values mapped to `None`.
pub fn cells(row: &StringRecord) -> Vec<Option<&str>> {
    row.iter()
        .map(|cell| (!cell.is_empty()).then_some(cell))
        .collect()
}

/// Append one row, creating the file when missing.
pub fn append_row<I, T>(path: &Path, values: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: AsRef<[u8]>,
{
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(path, e))?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(file);
    writer
        .write_record(values)
        .map_err(|e| StoreError::csv(path, e))?;
    writer.flush().map_err(|e| StoreError::io(path, e))
}
