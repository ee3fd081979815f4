//! # Dashboard Data Source
//!
//! Reads the delimited file backing the dashboard into an immutable
//! `core_types::Table`. This is the only crate that touches the data file.
//!
//! ## Public API
//!
//! - `load_table`: reads a CSV file from disk, typing each column.
//! - `parse_table`: the same, from an in-memory string.
//! - `DataError`: the specific error types that can be returned from this crate.

pub mod error;
pub mod loader;

pub use error::DataError;
pub use loader::{load_table, parse_table};
