//! Snapshot exports of the catalog.
//!
//! Report columns are fixed, so an empty catalog exports a header-only file
//! instead of failing. Each export writes a new file whose name carries the
//! generation time; existing reports are never overwritten.

use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::config::LendingPolicy;
use crate::error::{Result, StorageError};
use crate::lending::overdue_in;
use crate::models::{BookRecord, OverdueEntry};
use crate::store::schema::{BookRow, FIELDS};
use crate::store::write_csv_atomically;

pub const OVERDUE_FIELDS: [&str; 8] = [
    "title",
    "author",
    "isbn",
    "status",
    "due_date",
    "borrower",
    "days_overdue",
    "fine",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Inventory,
    Overdue,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Overdue => "overdue",
        }
    }

    /// e.g. `inventory_report_20240120_093000.csv`
    pub fn file_name(&self, generated_at: NaiveDateTime) -> String {
        format!(
            "{}_report_{}.csv",
            self.as_str(),
            generated_at.format("%Y%m%d_%H%M%S")
        )
    }
}

#[derive(Debug, Serialize)]
struct OverdueRow {
    title: String,
    author: String,
    isbn: String,
    status: String,
    due_date: String,
    borrower: String,
    days_overdue: u64,
    fine: String,
}

impl From<&OverdueEntry> for OverdueRow {
    fn from(entry: &OverdueEntry) -> Self {
        let row = BookRow::from(&entry.record);
        Self {
            title: row.title,
            author: row.author,
            isbn: row.isbn,
            status: row.status,
            due_date: row.due_date,
            borrower: row.borrower,
            days_overdue: entry.days_overdue,
            fine: entry.fine.to_string(),
        }
    }
}

/// Write every record to a new inventory report in `destination`.
pub fn export_inventory(
    records: &[BookRecord],
    destination: &Path,
    generated_at: NaiveDateTime,
) -> Result<PathBuf> {
    let path = report_path(ReportKind::Inventory, destination, generated_at)?;
    write_csv_atomically(&path, &FIELDS, records.iter().map(BookRow::from))?;

    tracing::info!("Exported {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Write the books overdue as of `as_of`, with days overdue and fine, to a
/// new overdue report in `destination`.
pub fn export_overdue(
    records: &[BookRecord],
    as_of: NaiveDate,
    policy: &LendingPolicy,
    destination: &Path,
    generated_at: NaiveDateTime,
) -> Result<PathBuf> {
    let report = overdue_in(records, as_of, policy);
    let path = report_path(ReportKind::Overdue, destination, generated_at)?;
    write_csv_atomically(&path, &OVERDUE_FIELDS, report.entries.iter().map(OverdueRow::from))?;

    tracing::info!(
        "Exported {} overdue records (total fine {}) to {}",
        report.entries.len(),
        report.total_fine,
        path.display()
    );
    Ok(path)
}

fn report_path(
    kind: ReportKind,
    destination: &Path,
    generated_at: NaiveDateTime,
) -> std::result::Result<PathBuf, StorageError> {
    let path = destination.join(kind.file_name(generated_at));
    if path.exists() {
        return Err(StorageError::ReportExists(path));
    }
    Ok(path)
}
