//! Inspect and reshape the column layout of `SQLite` tables.
#![warn(missing_docs)]

/// Column metadata lookup and identifier handling (names, quoting, `pragma_table_info`).
pub mod catalog;
/// Crate-wide error type.
pub mod error;
/// Executes assembled statements against a live database.
pub mod executor;
/// Dynamic SQL assembly: non-null probes, column definitions, and rebuild plans.
pub mod generator;
