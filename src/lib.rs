//! Shelfmark: a single-user book inventory and lending tracker.
//!
//! The business rules live in [`shelfmark_core`]; this crate is the
//! command-line presentation layer on top of it.

pub mod cli;
pub mod display;

pub use cli::{run, Cli};
