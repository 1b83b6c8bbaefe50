//! Extractors over result rows.
//!
//! The context is a [`rusqlite::Row`], the cursor's current row. Columns are
//! addressed by zero-based index (SQLite's native numbering for results) or
//! by name. A column holding SQL `NULL` fails with [`SqlError::Null`], which
//! [`optional`](pallas_core::KeyedExtractor::optional) turns into `None`.

use std::fmt::Display;
use std::marker::PhantomData;

use pallas_core::{Bound, Extractor, KeyedExtractor};
use rusqlite::types::{FromSql, ValueRef};
use rusqlite::{Row, RowIndex, Statement};
use tracing::debug;

use crate::error::SqlError;

/// Reads a column as `T`. `K` is `usize` for positional access and `str`
/// for access by name.
pub struct Column<T, K: ?Sized = usize> {
    _marker: PhantomData<(fn() -> T, fn(&K))>,
}

impl<T, K: ?Sized> Clone for Column<T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K: ?Sized> Copy for Column<T, K> {}

impl<T, K: ?Sized> std::fmt::Debug for Column<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

fn read<T, I>(row: &Row<'_>, column: I) -> Result<T, SqlError>
where
    T: FromSql,
    I: RowIndex + Copy + Display,
{
    if matches!(row.get_ref(column)?, ValueRef::Null) {
        return Err(SqlError::null(column.to_string()));
    }
    Ok(row.get(column)?)
}

impl<'stmt, T: FromSql> KeyedExtractor<Row<'stmt>> for Column<T, usize> {
    type Key = usize;
    type Output = T;
    type Error = SqlError;

    fn extract_key(&self, row: &Row<'stmt>, index: &usize) -> Result<T, SqlError> {
        read(row, *index)
    }
}

impl<'stmt, T: FromSql> KeyedExtractor<Row<'stmt>> for Column<T, str> {
    type Key = str;
    type Output = T;
    type Error = SqlError;

    fn extract_key(&self, row: &Row<'stmt>, name: &str) -> Result<T, SqlError> {
        read(row, name)
    }
}

/// Creates an extractor of `T` by zero-based column index.
pub fn column<T: FromSql>() -> Column<T, usize> {
    Column {
        _marker: PhantomData,
    }
}

/// Creates an extractor of `T` by column name.
pub fn column_named<T: FromSql>() -> Column<T, str> {
    Column {
        _marker: PhantomData,
    }
}

/// Reads column `index` (zero-based) as `T`.
pub fn at<T: FromSql>(index: usize) -> Bound<Column<T, usize>, usize> {
    column::<T>().bind(index)
}

/// Reads the column called `name` as `T`.
pub fn named<T: FromSql>(name: impl Into<String>) -> Bound<Column<T, str>, String> {
    column_named::<T>().bind(name.into())
}

/// Runs a query statement whose parameters are already bound and extracts
/// every result row.
///
/// # Example
///
/// ```
/// use pallas_sql::{at, query_rows, SqlError};
/// use rusqlite::Connection;
///
/// # fn main() -> Result<(), SqlError> {
/// let conn = Connection::open_in_memory()?;
/// let mut stmt = conn.prepare("SELECT 1, 'one' UNION ALL SELECT 2, 'two'")?;
///
/// let pairs = query_rows(&mut stmt, &(at::<i64>(0), at::<String>(1)))?;
/// assert_eq!(pairs, vec![(1, "one".to_string()), (2, "two".to_string())]);
/// # Ok(())
/// # }
/// ```
pub fn query_rows<X, T, E>(stmt: &mut Statement<'_>, extractor: &X) -> Result<Vec<T>, E>
where
    X: for<'s> Extractor<Row<'s>, Output = T, Error = E>,
    E: From<rusqlite::Error>,
{
    let mut rows = stmt.raw_query();
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(extractor.extract(row)?);
    }
    debug!(rows = out.len(), "extracted query rows");
    Ok(out)
}
