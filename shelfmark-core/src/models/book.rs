use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use super::Isbn;
use crate::error::ValidationError;

/// One physical book in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub isbn: Isbn,
    #[serde(flatten)]
    pub status: BookStatus,
}

/// Lending state. A checked-out book always carries its loan, so the
/// borrower and due date can only be set or cleared together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum BookStatus {
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "checked out")]
    CheckedOut(Loan),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    pub borrower: String,
    pub due_date: NaiveDate,
}

impl BookStatus {
    /// Literal used in the persisted file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::CheckedOut(_) => "checked out",
        }
    }
}

impl BookRecord {
    /// A freshly added book: available, no loan.
    pub fn new(title: String, author: String, isbn: Isbn) -> Self {
        Self {
            title,
            author,
            isbn,
            status: BookStatus::Available,
        }
    }

    pub fn is_checked_out(&self) -> bool {
        matches!(self.status, BookStatus::CheckedOut(_))
    }

    pub fn loan(&self) -> Option<&Loan> {
        match &self.status {
            BookStatus::CheckedOut(loan) => Some(loan),
            BookStatus::Available => None,
        }
    }

    pub fn borrower(&self) -> Option<&str> {
        self.loan().map(|loan| loan.borrower.as_str())
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.loan().map(|loan| loan.due_date)
    }

    /// Whole days past due as of `as_of`, or `None` when the book is not
    /// checked out or not yet overdue. A book due on `as_of` is not overdue.
    pub fn days_overdue(&self, as_of: NaiveDate) -> Option<u64> {
        let due = self.due_date()?;
        let days = (as_of - due).num_days();
        u64::try_from(days).ok().filter(|days| *days > 0)
    }
}

/// Field targeted by a catalog search.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Title,
    Author,
    Isbn,
}

impl SearchField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Isbn => "isbn",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "isbn" => Some(Self::Isbn),
            _ => None,
        }
    }

    pub(crate) fn value_of<'a>(&self, record: &'a BookRecord) -> &'a str {
        match self {
            Self::Title => &record.title,
            Self::Author => &record.author,
            Self::Isbn => record.isbn.as_str(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookInput {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

/// Changes requested by an edit. `None` or blank fields keep their value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookInput {
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

/// What an edit actually applied.
///
/// A rejected ISBN does not fail the edit: the other fields still apply and
/// the rejection is reported here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    pub record: BookRecord,
    pub title_changed: bool,
    pub author_changed: bool,
    pub isbn_changed: bool,
    #[serde(serialize_with = "rejection_message")]
    pub isbn_rejected: Option<ValidationError>,
}

fn rejection_message<S>(reason: &Option<ValidationError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match reason {
        Some(reason) => serializer.collect_str(reason),
        None => serializer.serialize_none(),
    }
}

impl EditOutcome {
    pub fn changed_anything(&self) -> bool {
        self.title_changed || self.author_changed || self.isbn_changed
    }
}
