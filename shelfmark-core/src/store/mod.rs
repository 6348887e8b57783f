//! Durable storage for the catalog.
//!
//! A [`RecordStore`] is the only writer of durable state. The catalog hands
//! it the complete record set after every mutation; there is no incremental
//! append.

mod csv_store;
pub mod schema;

pub use csv_store::CsvStore;
pub(crate) use csv_store::write_csv_atomically;

use crate::error::StorageError;
use crate::models::BookRecord;

pub trait RecordStore {
    /// Read every persisted record, in file order. A store with nothing
    /// persisted yet initialises itself and returns an empty collection.
    fn load(&self) -> Result<Vec<BookRecord>, StorageError>;

    /// Replace the persisted collection with `records`.
    fn save(&self, records: &[BookRecord]) -> Result<(), StorageError>;
}
