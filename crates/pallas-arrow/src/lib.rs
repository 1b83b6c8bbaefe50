//! # Pallas Arrow
//!
//! Columnar extractors and injectors over Apache Arrow record batches.
//!
//! - [`Column`] reads one cell of a [`BatchRow`], by zero-based column index
//!   ([`at`]) or by field name ([`named`])
//! - [`Append`] writes one cell into a [`BatchWriter`], by index
//!   ([`write_at`]) or by name ([`write_named`])
//! - [`read_rows`] and [`write_rows`] convert whole batches
//!
//! Supported value types are listed on [`ArrowValue`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use arrow_schema::{DataType, Field, Schema};
//! use pallas_arrow::{at, nullable, read_rows, write_at, write_rows, ColumnError};
//! use pallas_core::{combine, combine_into, KeyedExtractor, KeyedInjector};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     value: f64,
//!     note: Option<String>,
//! }
//!
//! # fn main() -> Result<(), ColumnError> {
//! let schema = Arc::new(Schema::new(vec![
//!     Field::new("sensor", DataType::Utf8, false),
//!     Field::new("value", DataType::Float64, false),
//!     Field::new("note", DataType::Utf8, true),
//! ]));
//!
//! let write = combine_into(
//!     (write_at::<String>(0), write_at::<f64>(1), nullable::<String>().bind(2_usize)),
//!     |r: Reading| (r.sensor, r.value, r.note),
//! );
//! let readings = vec![
//!     Reading { sensor: "t1".into(), value: 20.5, note: None },
//!     Reading { sensor: "t2".into(), value: -3.0, note: Some("icing".into()) },
//! ];
//! let batch = write_rows(schema, &write, readings.clone())?;
//!
//! let read = combine(
//!     (at::<String>(0), at::<f64>(1), pallas_arrow::column::<String>().optional().bind(2_usize)),
//!     |(sensor, value, note): (String, f64, Option<String>)| Reading { sensor, value, note },
//! );
//! assert_eq!(read_rows(&batch, &read)?, readings);
//! # Ok(())
//! # }
//! ```

#![doc(html_root_url = "https://docs.rs/pallas-arrow/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod reader;
mod value;
mod writer;

pub use error::{ColumnError, ColumnResult};
pub use reader::{at, column, column_named, named, read_rows, rows, BatchRow, Column};
pub use value::{ArrowValue, ValueError};
pub use writer::{
    append, append_named, null, null_named, nullable, nullable_named, write_at, write_named,
    write_rows, Append, BatchWriter, Null,
};
