//! Checkout and return transitions, due dates, and late fines.
//!
//! ```text
//! Available --check_out(borrower)--> CheckedOut { borrower, due_date }
//! CheckedOut --return_book--> Available
//! ```
//!
//! These are the only transitions between the two states.

use chrono::{Days, Local, NaiveDate};

use crate::catalog::{not_found, Catalog};
use crate::config::LendingPolicy;
use crate::error::{ConflictError, LibraryError, Missing, Result, ValidationError};
use crate::models::{BookRecord, BookStatus, Loan, OverdueEntry, OverdueReport};
use crate::store::RecordStore;

/// Applies a [`LendingPolicy`] to the records of a [`Catalog`].
#[derive(Debug, Clone, Copy, Default)]
pub struct LendingEngine {
    policy: LendingPolicy,
}

impl LendingEngine {
    pub fn new(policy: LendingPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LendingPolicy {
        &self.policy
    }

    /// Check a book out today. See [`LendingEngine::check_out_on`].
    pub fn check_out<S: RecordStore>(
        &self,
        catalog: &mut Catalog<S>,
        isbn: &str,
        borrower: &str,
    ) -> Result<NaiveDate> {
        self.check_out_on(catalog, isbn, borrower, today())
    }

    /// Lend the book with `isbn` to `borrower`, due one loan period after
    /// `today`. Returns the due date.
    pub fn check_out_on<S: RecordStore>(
        &self,
        catalog: &mut Catalog<S>,
        isbn: &str,
        borrower: &str,
        today: NaiveDate,
    ) -> Result<NaiveDate> {
        let idx = catalog.position(isbn).ok_or_else(|| not_found(isbn))?;
        if let Some(loan) = catalog.list().get(idx).and_then(BookRecord::loan) {
            return Err(ConflictError::AlreadyCheckedOut {
                isbn: isbn.trim().to_string(),
                borrower: loan.borrower.clone(),
            }
            .into());
        }

        let borrower = borrower.trim();
        if borrower.is_empty() {
            return Err(ValidationError::EmptyBorrower.into());
        }
        let due_date = self.due_date_from(today)?;

        let loan = Loan {
            borrower: borrower.to_string(),
            due_date,
        };
        catalog.commit(|records| {
            if let Some(record) = records.get_mut(idx) {
                record.status = BookStatus::CheckedOut(loan);
            }
            Ok(())
        })?;

        tracing::info!("Checked out {} to {:?}, due {}", isbn.trim(), borrower, due_date);
        Ok(due_date)
    }

    /// Return a checked-out book. Unknown ISBNs and books that are not on
    /// loan are both reported as not found.
    pub fn return_book<S: RecordStore>(
        &self,
        catalog: &mut Catalog<S>,
        isbn: &str,
    ) -> Result<BookRecord> {
        let idx = catalog.position(isbn).ok_or_else(|| not_found(isbn))?;
        if !catalog.list().get(idx).is_some_and(BookRecord::is_checked_out) {
            return Err(LibraryError::NotFound {
                isbn: isbn.trim().to_string(),
                missing: Missing::Loan,
            });
        }

        let returned = catalog.commit(|records| {
            let record = records.get_mut(idx).ok_or_else(|| not_found(isbn))?;
            record.status = BookStatus::Available;
            Ok(record.clone())
        })?;

        tracing::info!("Returned {}", returned.isbn);
        Ok(returned)
    }

    /// Every checked-out book whose due date is before `as_of`, with the
    /// fine owed. Books that are not overdue are left out.
    pub fn overdue<S: RecordStore>(&self, catalog: &Catalog<S>, as_of: NaiveDate) -> OverdueReport {
        overdue_in(catalog.list(), as_of, &self.policy)
    }

    /// Books currently on loan, in catalog order.
    pub fn checked_out<'a, S: RecordStore>(&self, catalog: &'a Catalog<S>) -> Vec<&'a BookRecord> {
        catalog.list().iter().filter(|r| r.is_checked_out()).collect()
    }

    fn due_date_from(&self, today: NaiveDate) -> std::result::Result<NaiveDate, ValidationError> {
        let days = self.policy.loan_period_days;
        today
            .checked_add_days(Days::new(u64::from(days)))
            .ok_or(ValidationError::DueDateOutOfRange { from: today, days })
    }
}

/// Overdue computation over any record slice; shared with reporting.
pub(crate) fn overdue_in(
    records: &[BookRecord],
    as_of: NaiveDate,
    policy: &LendingPolicy,
) -> OverdueReport {
    let entries: Vec<OverdueEntry> = records
        .iter()
        .filter_map(|record| {
            record.days_overdue(as_of).map(|days_overdue| OverdueEntry {
                record: record.clone(),
                days_overdue,
                fine: policy.fine_per_day.times_days(days_overdue),
            })
        })
        .collect();
    let total_fine = entries.iter().map(|entry| entry.fine).sum();

    OverdueReport {
        entries,
        total_fine,
    }
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
