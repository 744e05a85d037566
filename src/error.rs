use thiserror::Error;

/// Errors surfaced by catalog lookups, plan generation, and execution.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying `SQLite` failure.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// File access failure (database path, spec file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed new-column spec file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The named table does not exist in the target schema.
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// An identifier failed strict validation before SQL interpolation.
    #[error("invalid identifier {ident:?}: {reason}")]
    InvalidIdentifier {
        /// The offending identifier text.
        ident: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A new-column spec names an anchor that is not a column of the table.
    #[error("anchor column '{0}' not found")]
    AnchorNotFound(String),

    /// A new-column spec collides with an existing or earlier-inserted column.
    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    /// The rebuild's temporary table name is already taken.
    #[error("temporary table '{0}' already exists; rerun with a different suffix")]
    TmpTableExists(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
