//! The in-memory authoritative collection of book records.
//!
//! [`Catalog`] owns every [`BookRecord`] and the [`RecordStore`] that
//! persists them. Each mutation is applied in memory, then saved; if the save
//! fails the in-memory change is rolled back so memory never runs ahead of
//! disk.

use crate::error::{ConflictError, LibraryError, Missing, Result, ValidationError};
use crate::models::{
    BookRecord, CreateBookInput, EditOutcome, Isbn, SearchField, UpdateBookInput,
};
use crate::store::{CsvStore, RecordStore};

#[derive(Debug)]
pub struct Catalog<S: RecordStore = CsvStore> {
    records: Vec<BookRecord>,
    store: S,
}

impl<S: RecordStore> Catalog<S> {
    /// Load the persisted collection through `store`.
    pub fn open(store: S) -> Result<Self> {
        let records = store.load()?;
        tracing::debug!("Catalog opened with {} records", records.len());
        Ok(Self { records, store })
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[BookRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn add(&mut self, input: CreateBookInput) -> Result<BookRecord> {
        let title = non_empty(&input.title, ValidationError::EmptyTitle)?;
        let author = non_empty(&input.author, ValidationError::EmptyAuthor)?;
        let isbn = Isbn::parse(&input.isbn)?;
        if self.position(isbn.as_str()).is_some() {
            return Err(ValidationError::DuplicateIsbn(isbn.to_string()).into());
        }

        let record = BookRecord::new(title, author, isbn);
        self.commit(|records| {
            records.push(record.clone());
            Ok(())
        })?;

        tracing::info!("Added {:?} ({})", record.title, record.isbn);
        Ok(record)
    }

    pub fn find(&self, isbn: &str) -> Result<&BookRecord> {
        self.position(isbn)
            .and_then(|idx| self.records.get(idx))
            .ok_or_else(|| not_found(isbn))
    }

    /// Case-insensitive substring match on one field. No matches is an empty
    /// result, not an error.
    pub fn search(&self, field: SearchField, term: &str) -> Vec<&BookRecord> {
        let needle = term.trim().to_lowercase();
        self.records
            .iter()
            .filter(|record| field.value_of(record).to_lowercase().contains(&needle))
            .collect()
    }

    /// Apply the non-blank fields of `changes` to the record with `isbn`.
    ///
    /// A new ISBN that is malformed or already used by another record is not
    /// applied, but the title and author changes still are; the rejection is
    /// reported in [`EditOutcome::isbn_rejected`].
    pub fn edit(&mut self, isbn: &str, changes: UpdateBookInput) -> Result<EditOutcome> {
        let idx = self.position(isbn).ok_or_else(|| not_found(isbn))?;
        let current = self.records.get(idx).ok_or_else(|| not_found(isbn))?;

        let new_title = filled(changes.title.as_deref()).filter(|t| *t != current.title);
        let new_author = filled(changes.author.as_deref()).filter(|a| *a != current.author);

        let mut isbn_rejected = None;
        let mut new_isbn = None;
        if let Some(raw) = filled(changes.isbn.as_deref()) {
            match Isbn::parse(raw) {
                Ok(parsed) if parsed == current.isbn => {}
                Ok(parsed) if self.position(parsed.as_str()).is_some() => {
                    isbn_rejected = Some(ValidationError::DuplicateIsbn(parsed.to_string()));
                }
                Ok(parsed) => new_isbn = Some(parsed),
                Err(e) => isbn_rejected = Some(e),
            }
        }
        if let Some(reason) = &isbn_rejected {
            tracing::warn!("Edit of {} kept its ISBN: {}", current.isbn, reason);
        }

        let mut updated = current.clone();
        if let Some(title) = new_title {
            updated.title = title.to_string();
        }
        if let Some(author) = new_author {
            updated.author = author.to_string();
        }
        if let Some(isbn) = &new_isbn {
            updated.isbn = isbn.clone();
        }

        let outcome = EditOutcome {
            title_changed: new_title.is_some(),
            author_changed: new_author.is_some(),
            isbn_changed: new_isbn.is_some(),
            isbn_rejected,
            record: updated,
        };

        if outcome.changed_anything() {
            let replacement = outcome.record.clone();
            self.commit(|records| {
                if let Some(slot) = records.get_mut(idx) {
                    *slot = replacement;
                }
                Ok(())
            })?;
            tracing::info!("Edited {}", outcome.record.isbn);
        }

        Ok(outcome)
    }

    /// Remove an available record. Checked-out books cannot be deleted.
    pub fn delete(&mut self, isbn: &str) -> Result<BookRecord> {
        let idx = self.position(isbn).ok_or_else(|| not_found(isbn))?;
        if let Some(record) = self.records.get(idx).filter(|r| r.is_checked_out()) {
            return Err(ConflictError::DeleteWhileCheckedOut(record.isbn.to_string()).into());
        }

        let removed = self.commit(|records| Ok(records.remove(idx)))?;
        tracing::info!("Deleted {:?} ({})", removed.title, removed.isbn);
        Ok(removed)
    }

    pub(crate) fn position(&self, isbn: &str) -> Option<usize> {
        let isbn = isbn.trim();
        self.records.iter().position(|r| r.isbn.as_str() == isbn)
    }

    /// Run `mutate` against the records and persist the result. On any
    /// failure the records are restored to their previous state.
    pub(crate) fn commit<T>(
        &mut self,
        mutate: impl FnOnce(&mut Vec<BookRecord>) -> Result<T>,
    ) -> Result<T> {
        let snapshot = self.records.clone();
        let value = match mutate(&mut self.records) {
            Ok(value) => value,
            Err(e) => {
                self.records = snapshot;
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(&self.records) {
            tracing::error!("Save failed, rolling back: {}", e);
            self.records = snapshot;
            return Err(e.into());
        }
        Ok(value)
    }
}

pub(crate) fn not_found(isbn: &str) -> LibraryError {
    LibraryError::NotFound {
        isbn: isbn.trim().to_string(),
        missing: Missing::Book,
    }
}

fn non_empty(value: &str, err: ValidationError) -> std::result::Result<String, ValidationError> {
    filled(Some(value)).map(str::to_string).ok_or(err)
}

fn filled(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
