//! SQL error types.

use pallas_core::Absence;
use thiserror::Error;

/// Result type alias using [`SqlError`].
pub type SqlResult<T> = Result<T, SqlError>;

/// Errors raised by SQL extractors and injectors.
#[derive(Error, Debug)]
pub enum SqlError {
    /// The column holds SQL `NULL`.
    #[error("column {column} is NULL")]
    Null {
        /// Column index or name.
        column: String,
    },

    /// The statement has no parameter with this name.
    #[error("statement has no parameter named {name}")]
    UnknownParameter {
        /// The parameter name, including its prefix.
        name: String,
    },

    /// Error reported by SQLite.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Failure from the combinator layer.
    #[error(transparent)]
    Core(#[from] pallas_core::Error),
}

impl SqlError {
    /// Create a new NULL column error.
    pub fn null(column: impl Into<String>) -> Self {
        Self::Null {
            column: column.into(),
        }
    }

    /// Create a new unknown parameter error.
    pub fn unknown_parameter(name: impl Into<String>) -> Self {
        Self::UnknownParameter { name: name.into() }
    }
}

impl Absence for SqlError {
    fn is_absent(&self) -> bool {
        match self {
            Self::Null { .. } => true,
            Self::Core(err) => err.is_absent(),
            _ => false,
        }
    }
}
