use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::schema::{BookRow, FIELDS};
use super::RecordStore;
use crate::error::StorageError;
use crate::models::BookRecord;

/// Stores the catalog as a CSV file with a fixed header.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn malformed_row(&self, line: u64, reason: impl Into<String>) -> StorageError {
        StorageError::MalformedRow {
            path: self.path.clone(),
            line,
            reason: reason.into(),
        }
    }
}

impl RecordStore for CsvStore {
    fn load(&self) -> Result<Vec<BookRecord>, StorageError> {
        if !self.path.exists() {
            tracing::info!("No data file at {}, creating an empty one", self.path.display());
            self.save(&[])?;
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| StorageError::csv(&self.path, e))?;

        let headers = reader
            .headers()
            .map_err(|e| StorageError::csv(&self.path, e))?
            .clone();
        if headers.iter().ne(FIELDS.iter().copied()) {
            return Err(StorageError::MalformedHeader {
                path: self.path.clone(),
                expected: FIELDS.iter().map(|f| f.to_string()).collect(),
                found: headers.iter().map(String::from).collect(),
            });
        }

        let mut records = Vec::new();
        let mut seen = HashSet::new();
        for result in reader.records() {
            let row = result.map_err(|e| match e.position().map(|pos| pos.line()) {
                Some(line) => self.malformed_row(line, e.to_string()),
                None => StorageError::csv(&self.path, e),
            })?;
            let line = row.position().map_or(0, |pos| pos.line());

            let book_row: BookRow = row
                .deserialize(Some(&headers))
                .map_err(|e| self.malformed_row(line, e.to_string()))?;
            let record = book_row
                .into_record()
                .map_err(|reason| self.malformed_row(line, reason))?;

            if !seen.insert(record.isbn.clone()) {
                return Err(self.malformed_row(line, format!("duplicate ISBN {}", record.isbn)));
            }
            records.push(record);
        }

        tracing::debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    fn save(&self, records: &[BookRecord]) -> Result<(), StorageError> {
        write_csv_atomically(&self.path, &FIELDS, records.iter().map(BookRow::from))?;
        tracing::debug!("Saved {} records to {}", records.len(), self.path.display());
        Ok(())
    }
}

/// Write `header` and `rows` to a sibling temp file, sync it, then rename it
/// over `path` so readers never observe a half-written file.
pub(crate) fn write_csv_atomically<T, I>(
    path: &Path,
    header: &[&str],
    rows: I,
) -> Result<(), StorageError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    if let Err(e) = write_rows(&temp_path, header, rows) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        StorageError::io(path, e)
    })
}

fn write_rows<T, I>(temp_path: &Path, header: &[&str], rows: I) -> Result<(), StorageError>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(temp_path).map_err(|e| StorageError::io(temp_path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    writer
        .write_record(header)
        .map_err(|e| StorageError::csv(temp_path, e))?;
    for row in rows {
        writer
            .serialize(row)
            .map_err(|e| StorageError::csv(temp_path, e))?;
    }

    let file = writer
        .into_inner()
        .map_err(|e| StorageError::io(temp_path, e.into_error()))?;
    file.sync_all().map_err(|e| StorageError::io(temp_path, e))
}
