//! Injectors that bind prepared-statement parameters.
//!
//! The context is `&mut Statement`, threaded through each injector in turn.
//! Parameters are addressed by one-based index (SQLite's native numbering
//! for parameters) or by name including its prefix (`:id`, `@id`, `$id`).

use std::marker::PhantomData;

use pallas_core::{Bound, Injector, KeyedInjector, OptionalWith};
use rusqlite::types::ToSql;
use rusqlite::Statement;
use tracing::debug;

use crate::error::SqlError;

fn parameter_index(stmt: &Statement<'_>, name: &str) -> Result<usize, SqlError> {
    stmt.parameter_index(name)?
        .ok_or_else(|| SqlError::unknown_parameter(name))
}

/// Binds a `T` parameter. `K` is `usize` for positional access and `str`
/// for access by name.
pub struct Param<T, K: ?Sized = usize> {
    _marker: PhantomData<(fn(T), fn(&K))>,
}

impl<T, K: ?Sized> Clone for Param<T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K: ?Sized> Copy for Param<T, K> {}

impl<T, K: ?Sized> std::fmt::Debug for Param<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Param")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<'a, 'conn, T: ToSql> KeyedInjector<&'a mut Statement<'conn>, T> for Param<T, usize> {
    type Key = usize;
    type Error = SqlError;

    fn inject_key(
        &self,
        stmt: &'a mut Statement<'conn>,
        index: &usize,
        value: T,
    ) -> Result<&'a mut Statement<'conn>, SqlError> {
        stmt.raw_bind_parameter(*index, value)?;
        Ok(stmt)
    }
}

impl<'a, 'conn, T: ToSql> KeyedInjector<&'a mut Statement<'conn>, T> for Param<T, str> {
    type Key = str;
    type Error = SqlError;

    fn inject_key(
        &self,
        stmt: &'a mut Statement<'conn>,
        name: &str,
        value: T,
    ) -> Result<&'a mut Statement<'conn>, SqlError> {
        let index = parameter_index(stmt, name)?;
        stmt.raw_bind_parameter(index, value)?;
        Ok(stmt)
    }
}

/// Creates an injector of `T` by one-based parameter index.
pub fn param<T: ToSql>() -> Param<T, usize> {
    Param {
        _marker: PhantomData,
    }
}

/// Creates an injector of `T` by parameter name.
pub fn param_named<T: ToSql>() -> Param<T, str> {
    Param {
        _marker: PhantomData,
    }
}

/// Binds parameter `index` (one-based).
pub fn bind_at<T: ToSql>(index: usize) -> Bound<Param<T, usize>, usize> {
    param::<T>().bind(index)
}

/// Binds the parameter called `name`.
pub fn bind_named<T: ToSql>(name: impl Into<String>) -> Bound<Param<T, str>, String> {
    param_named::<T>().bind(name.into())
}

/// Binds SQL `NULL`. See [`null`].
pub struct Null<K: ?Sized = usize> {
    _marker: PhantomData<fn(&K)>,
}

impl<K: ?Sized> Clone for Null<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for Null<K> {}

impl<K: ?Sized> std::fmt::Debug for Null<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Null")
    }
}

impl<'a, 'conn> KeyedInjector<&'a mut Statement<'conn>, ()> for Null<usize> {
    type Key = usize;
    type Error = SqlError;

    fn inject_key(
        &self,
        stmt: &'a mut Statement<'conn>,
        index: &usize,
        (): (),
    ) -> Result<&'a mut Statement<'conn>, SqlError> {
        stmt.raw_bind_parameter(*index, rusqlite::types::Null)?;
        Ok(stmt)
    }
}

impl<'a, 'conn> KeyedInjector<&'a mut Statement<'conn>, ()> for Null<str> {
    type Key = str;
    type Error = SqlError;

    fn inject_key(
        &self,
        stmt: &'a mut Statement<'conn>,
        name: &str,
        (): (),
    ) -> Result<&'a mut Statement<'conn>, SqlError> {
        let index = parameter_index(stmt, name)?;
        stmt.raw_bind_parameter(index, rusqlite::types::Null)?;
        Ok(stmt)
    }
}

/// Creates an injector that binds `NULL` by parameter index.
pub fn null() -> Null<usize> {
    Null {
        _marker: PhantomData,
    }
}

/// Creates an injector that binds `NULL` by parameter name.
pub fn null_named() -> Null<str> {
    Null {
        _marker: PhantomData,
    }
}

/// Injector of `Option<T>` by index that binds `NULL` for `None`.
///
/// Unlike `param().optional()`, which leaves the parameter untouched, this
/// always binds something, so a reused statement never keeps a stale value.
pub fn nullable<T: ToSql>() -> OptionalWith<Param<T, usize>, Null<usize>> {
    param::<T>().optional_with(null())
}

/// Injector of `Option<T>` by name that binds `NULL` for `None`.
pub fn nullable_named<T: ToSql>() -> OptionalWith<Param<T, str>, Null<str>> {
    param_named::<T>().optional_with(null_named())
}

/// Binds `value` into `stmt` with `injector` and executes it.
///
/// Returns the number of changed rows.
///
/// # Example
///
/// ```
/// use pallas_sql::{bind_at, execute, SqlError};
/// use rusqlite::Connection;
///
/// # fn main() -> Result<(), SqlError> {
/// let conn = Connection::open_in_memory()?;
/// conn.execute_batch("CREATE TABLE t (id INTEGER, name TEXT)")?;
///
/// let mut insert = conn.prepare("INSERT INTO t VALUES (?1, ?2)")?;
/// let row = (bind_at::<i64>(1), bind_at::<String>(2));
/// assert_eq!(execute(&mut insert, &row, (7, "seven".to_string()))?, 1);
/// # Ok(())
/// # }
/// ```
pub fn execute<'conn, I, T, E>(
    stmt: &mut Statement<'conn>,
    injector: &I,
    value: T,
) -> Result<usize, E>
where
    I: for<'a> Injector<&'a mut Statement<'conn>, T, Error = E>,
    E: From<rusqlite::Error>,
{
    let stmt = injector.inject(stmt, value)?;
    let changed = stmt.raw_execute()?;
    debug!(changed, "executed statement");
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pallas_core::Injector;
    use rusqlite::Connection;

    fn stored(conn: &Connection) -> Vec<(Option<i64>, Option<String>)> {
        let mut stmt = conn.prepare("SELECT a, b FROM t ORDER BY rowid").unwrap();
        stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    fn table() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (a INTEGER, b TEXT)").unwrap();
        conn
    }

    #[test]
    fn test_bind_by_index() {
        let conn = table();
        let mut stmt = conn.prepare("INSERT INTO t VALUES (?1, ?2)").unwrap();
        let row = (bind_at::<i64>(1), bind_at::<&str>(2));

        execute(&mut stmt, &row, (5, "five")).unwrap();
        assert_eq!(stored(&conn), vec![(Some(5), Some("five".to_string()))]);
    }

    #[test]
    fn test_bind_by_name() {
        let conn = table();
        let mut stmt = conn.prepare("INSERT INTO t VALUES (:a, @b)").unwrap();
        let row = (bind_named::<i64>(":a"), bind_named::<String>("@b"));

        execute(&mut stmt, &row, (1, "one".to_string())).unwrap();
        assert_eq!(stored(&conn), vec![(Some(1), Some("one".to_string()))]);
    }

    #[test]
    fn test_unknown_name() {
        let conn = table();
        let mut stmt = conn.prepare("INSERT INTO t VALUES (:a, :b)").unwrap();
        let err = bind_named::<i64>(":c").inject(&mut stmt, 1).unwrap_err();
        assert!(matches!(err, SqlError::UnknownParameter { ref name } if name == ":c"));
    }

    #[test]
    fn test_index_out_of_range() {
        let conn = table();
        let mut stmt = conn.prepare("INSERT INTO t VALUES (?1, ?2)").unwrap();
        let err = bind_at::<i64>(3).inject(&mut stmt, 1).unwrap_err();
        assert!(matches!(err, SqlError::Sqlite(_)));
    }

    #[test]
    fn test_nullable_overwrites_previous_binding() {
        let conn = table();
        let mut stmt = conn.prepare("INSERT INTO t VALUES (?1, ?2)").unwrap();
        let row = (bind_at::<i64>(1), nullable::<String>().bind(2_usize));

        execute(&mut stmt, &row, (1, Some("x".to_string()))).unwrap();
        execute(&mut stmt, &row, (2, None)).unwrap();

        assert_eq!(
            stored(&conn),
            vec![(Some(1), Some("x".to_string())), (Some(2), None)]
        );
    }

    #[test]
    fn test_optional_none_keeps_previous_binding() {
        let conn = table();
        let mut stmt = conn.prepare("INSERT INTO t VALUES (?1, ?2)").unwrap();
        let row = (bind_at::<i64>(1), param::<String>().optional().bind(2_usize));

        execute(&mut stmt, &row, (1, Some("x".to_string()))).unwrap();
        execute(&mut stmt, &row, (2, None)).unwrap();

        assert_eq!(
            stored(&conn),
            vec![(Some(1), Some("x".to_string())), (Some(2), Some("x".to_string()))]
        );
    }

    #[test]
    fn test_optional_none_on_fresh_statement_binds_nothing() {
        let conn = table();
        let mut stmt = conn.prepare("INSERT INTO t VALUES (?1, ?2)").unwrap();
        let row = (
            param::<i64>().optional().bind(1_usize),
            param_named::<String>().optional().bind("?2"),
        );

        execute(&mut stmt, &row, (None, None)).unwrap();
        assert_eq!(stored(&conn), vec![(None, None)]);
    }

    #[test]
    fn test_nullable_named() {
        let conn = table();
        let mut stmt = conn.prepare("INSERT INTO t VALUES (:a, :b)").unwrap();
        let row = (
            nullable_named::<i64>().bind(":a"),
            nullable_named::<String>().bind(":b"),
        );

        execute(&mut stmt, &row, (None, None)).unwrap();
        assert_eq!(stored(&conn), vec![(None, None)]);
    }
}
