//! Error taxonomy for catalog, lending and storage operations.
//!
//! Every core operation returns [`Result`]; nothing in this crate panics on
//! bad input or bad data. The presentation layer decides how to show each
//! variant and whether to re-prompt.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by every catalog and lending operation.
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The caller supplied input of the wrong shape.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No record carries the given ISBN, or, for returns, the book is not
    /// on loan.
    #[error("{}", .missing.describe(.isbn))]
    NotFound { isbn: String, missing: Missing },

    /// The operation is not valid for the record's current state.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Reading or writing durable state failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// What a [`LibraryError::NotFound`] lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Book,
    Loan,
}

impl Missing {
    fn describe(&self, isbn: &str) -> String {
        match self {
            Self::Book => format!("No book with ISBN {isbn} found"),
            Self::Loan => format!("Book with ISBN {isbn} is not checked out"),
        }
    }
}

/// Bad input shape: empty fields, malformed or duplicate ISBNs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title cannot be empty")]
    EmptyTitle,

    #[error("Author cannot be empty")]
    EmptyAuthor,

    #[error("Borrower name cannot be empty")]
    EmptyBorrower,

    #[error("Invalid ISBN {0:?}: must be exactly 13 digits")]
    MalformedIsbn(String),

    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    #[error("Invalid amount {0:?}: expected a value like 0.50")]
    MalformedAmount(String),

    #[error("Due date out of range: {days} days after {from}")]
    DueDateOutOfRange { from: chrono::NaiveDate, days: u32 },
}

/// The requested transition is invalid given the record's current status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("Book with ISBN {isbn} is already checked out to {borrower}")]
    AlreadyCheckedOut { isbn: String, borrower: String },

    #[error("Cannot delete ISBN {0}: book is currently checked out")]
    DeleteWhileCheckedOut(String),
}

/// I/O failures and malformed persisted data.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Malformed header in {path}: expected {expected:?}, found {found:?}")]
    MalformedHeader {
        path: PathBuf,
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Malformed record at line {line} of {path}: {reason}")]
    MalformedRow {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("Report {0} already exists")]
    ReportExists(PathBuf),
}

impl StorageError {
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

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LibraryError>;
