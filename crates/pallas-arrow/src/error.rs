//! Columnar error types.

use arrow_schema::{ArrowError, DataType};
use pallas_core::Absence;
use thiserror::Error;

use crate::value::ValueError;

/// Result type alias using [`ColumnError`].
pub type ColumnResult<T> = Result<T, ColumnError>;

/// Errors raised by columnar extractors, injectors and the batch writer.
#[derive(Error, Debug)]
pub enum ColumnError {
    /// The cell is null.
    #[error("column {column} is null")]
    Null {
        /// Column index or name.
        column: String,
    },

    /// The schema has no field with this name.
    #[error("no column named {name}")]
    NoSuchColumn {
        /// The requested name.
        name: String,
    },

    /// Column index past the last field.
    #[error("column index {index} out of bounds for {count} columns")]
    ColumnOutOfBounds {
        /// The requested index.
        index: usize,
        /// Number of columns.
        count: usize,
    },

    /// Row index past the last row.
    #[error("row {row} out of bounds for {count} rows")]
    RowOutOfBounds {
        /// The requested row.
        row: usize,
        /// Number of rows.
        count: usize,
    },

    /// The column's Arrow type does not match the requested Rust type.
    #[error("column {column} has type {actual}, expected {expected}")]
    WrongType {
        /// Column index or name.
        column: String,
        /// Type the Rust value maps to.
        expected: DataType,
        /// Type declared by the schema.
        actual: DataType,
    },

    /// The value has no exact equivalent on the other side (Rust or Arrow).
    #[error("invalid value in column {column}: {reason}")]
    InvalidValue {
        /// Column index or name.
        column: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The schema declares a type the writer cannot build.
    #[error("column {column} has unsupported type {data_type}")]
    UnsupportedType {
        /// Column name.
        column: String,
        /// The declared type.
        data_type: DataType,
    },

    /// Error reported by Arrow.
    #[error(transparent)]
    Arrow(#[from] ArrowError),

    /// Failure from the combinator layer.
    #[error(transparent)]
    Core(#[from] pallas_core::Error),
}

impl ColumnError {
    /// Create a new null cell error.
    pub fn null(column: impl Into<String>) -> Self {
        Self::Null {
            column: column.into(),
        }
    }

    /// Create a new wrong type error.
    pub fn wrong_type(column: impl Into<String>, expected: DataType, actual: DataType) -> Self {
        Self::WrongType {
            column: column.into(),
            expected,
            actual,
        }
    }

    /// Attach column context to a value conversion failure.
    pub fn value(
        column: impl Into<String>,
        expected: DataType,
        actual: DataType,
        err: ValueError,
    ) -> Self {
        match err {
            ValueError::WrongType => Self::wrong_type(column, expected, actual),
            ValueError::Invalid(reason) => Self::InvalidValue {
                column: column.into(),
                reason,
            },
        }
    }
}

impl Absence for ColumnError {
    fn is_absent(&self) -> bool {
        match self {
            Self::Null { .. } => true,
            Self::Core(err) => err.is_absent(),
            _ => false,
        }
    }
}
