//! Error types for the database layer.

use thiserror::Error;

/// Database operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite error (open, prepare, execute, etc.)
    #[error("{0}")]
    Sqlite(#[from] rusqlite::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Table does not exist
    #[error("no such table: {0}")]
    NotFound(String),

    /// Identifier cannot be used as a table or column name
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// More than one statement in a single execute call
    #[error("You can only execute one statement at a time")]
    MultipleStatements,

    /// Row shape does not match the table's column set
    #[error("row {row} has {actual} values, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        actual: usize,
    },
}

impl DbError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid identifier error.
    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }
}
