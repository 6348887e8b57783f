//! Flat file layout: one header row, one row per book.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BookRecord, BookStatus, Isbn, Loan};

/// Column order of the persisted file.
pub const FIELDS: [&str; 6] = ["title", "author", "isbn", "status", "due_date", "borrower"];

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const STATUS_AVAILABLE: &str = "available";
const STATUS_CHECKED_OUT: &str = "checked out";

/// A row exactly as it appears on disk. Absent values are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRow {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub status: String,
    pub due_date: String,
    pub borrower: String,
}

impl From<&BookRecord> for BookRow {
    fn from(record: &BookRecord) -> Self {
        let (due_date, borrower) = match &record.status {
            BookStatus::Available => (String::new(), String::new()),
            BookStatus::CheckedOut(loan) => (
                loan.due_date.format(DATE_FORMAT).to_string(),
                loan.borrower.clone(),
            ),
        };
        Self {
            title: record.title.clone(),
            author: record.author.clone(),
            isbn: record.isbn.to_string(),
            status: record.status.as_str().to_string(),
            due_date,
            borrower,
        }
    }
}

impl BookRow {
    /// Validate the row and build a record from it. Values are taken
    /// verbatim so that saving a loaded file reproduces it exactly; anything
    /// that would need normalising is rejected instead.
    pub fn into_record(self) -> Result<BookRecord, String> {
        if self.title.trim().is_empty() {
            return Err("title is empty".into());
        }
        if self.author.trim().is_empty() {
            return Err("author is empty".into());
        }

        let isbn = Isbn::parse(&self.isbn).map_err(|e| e.to_string())?;
        if isbn.as_str() != self.isbn {
            return Err(format!("ISBN {:?} has surrounding whitespace", self.isbn));
        }

        let status = match self.status.as_str() {
            STATUS_AVAILABLE => {
                if !self.due_date.is_empty() || !self.borrower.is_empty() {
                    return Err("available book has a due date or borrower".into());
                }
                BookStatus::Available
            }
            STATUS_CHECKED_OUT => {
                if self.borrower.trim().is_empty() {
                    return Err("checked-out book has no borrower".into());
                }
                let due_date = NaiveDate::parse_from_str(&self.due_date, DATE_FORMAT)
                    .map_err(|e| format!("invalid due date {:?}: {e}", self.due_date))?;
                if due_date.format(DATE_FORMAT).to_string() != self.due_date {
                    return Err(format!("due date {:?} is not YYYY-MM-DD", self.due_date));
                }
                BookStatus::CheckedOut(Loan {
                    borrower: self.borrower,
                    due_date,
                })
            }
            other => return Err(format!("unknown status {other:?}")),
        };

        Ok(BookRecord {
            title: self.title,
            author: self.author,
            isbn,
            status,
        })
    }
}
