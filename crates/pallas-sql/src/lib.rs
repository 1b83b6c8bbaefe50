//! # Pallas SQL
//!
//! SQLite extractors and injectors built on `rusqlite`.
//!
//! - [`Column`] reads result columns from a [`rusqlite::Row`], by zero-based
//!   index ([`at`]) or by name ([`named`])
//! - [`Param`] binds prepared-statement parameters through
//!   `&mut rusqlite::Statement`, by one-based index ([`bind_at`]) or by name
//!   ([`bind_named`])
//! - [`query_rows`] and [`execute`] run a statement with an extractor or an
//!   injector
//!
//! Any type implementing `FromSql` / `ToSql` can be read or bound, including
//! the chrono date and time types.
//!
//! ## Example
//!
//! ```rust
//! use pallas_core::{combine, combine_into};
//! use pallas_sql::{at, bind_at, execute, query_rows, SqlError};
//! use rusqlite::Connection;
//!
//! #[derive(Debug, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! # fn main() -> Result<(), SqlError> {
//! let conn = Connection::open_in_memory()?;
//! conn.execute_batch("CREATE TABLE users (id INTEGER, name TEXT)")?;
//!
//! let write = combine_into((bind_at::<i64>(1), bind_at::<String>(2)), |u: User| (u.id, u.name));
//! let mut insert = conn.prepare("INSERT INTO users VALUES (?1, ?2)")?;
//! execute(&mut insert, &write, User { id: 1, name: "ada".into() })?;
//!
//! let read = combine((at::<i64>(0), at::<String>(1)), |(id, name): (i64, String)| User { id, name });
//! let mut select = conn.prepare("SELECT id, name FROM users")?;
//! let users = query_rows(&mut select, &read)?;
//! assert_eq!(users, vec![User { id: 1, name: "ada".into() }]);
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/pallas-sql/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod row;
mod statement;

pub use error::{SqlError, SqlResult};
pub use row::{at, column, column_named, named, query_rows, Column};
pub use statement::{
    bind_at, bind_named, execute, null, null_named, nullable, nullable_named, param, param_named,
    Null, Param,
};
