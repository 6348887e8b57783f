//! Core library for Shelfmark.
//!
//! This crate holds the book records, the lending rules and the CSV record
//! store, independent of any presentation layer.
//!
//! # Usage
//!
//! ```no_run
//! use shelfmark_core::{Catalog, CsvStore, LendingEngine};
//! use shelfmark_core::models::CreateBookInput;
//!
//! let mut catalog = Catalog::open(CsvStore::new("library_books.csv"))?;
//! catalog.add(CreateBookInput {
//!     title: "Dune".into(),
//!     author: "Frank Herbert".into(),
//!     isbn: "9780441172719".into(),
//! })?;
//!
//! let engine = LendingEngine::default();
//! let due = engine.check_out(&mut catalog, "9780441172719", "Alice")?;
//! println!("due back {due}");
//! # Ok::<(), shelfmark_core::LibraryError>(())
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod lending;
pub mod models;
pub mod report;
pub mod store;

// Re-export commonly used types at crate root
pub use catalog::Catalog;
pub use config::{LendingPolicy, LibraryConfig};
pub use error::{ConflictError, LibraryError, Missing, StorageError, ValidationError};
pub use lending::LendingEngine;
pub use store::{CsvStore, RecordStore};
