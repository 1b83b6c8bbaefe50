//! # Pallas
//!
//! Composable extractors and injectors: small typed functions that read a
//! value out of a context (a result row, a record batch, a property map) or
//! write one into it (a prepared statement, a batch writer, a property
//! map), combined with one algebra.
//!
//! ## Quick Start
//!
//! ```rust
//! use pallas::prelude::*;
//! use pallas::props::{get, property, Properties};
//!
//! let settings = combine(
//!     (property::<String>("env"), get::<i32>().optional().bind("numThreads")),
//!     |(env, threads): (String, Option<i32>)| (env, threads.unwrap_or(1)),
//! );
//!
//! let props = Properties::parse("env=DEV\n").unwrap();
//! assert_eq!(settings.extract(&props).unwrap(), ("DEV".to_string(), 1));
//! ```
//!
//! ## Crates
//!
//! | Module | Crate | Context |
//! |---|---|---|
//! | [`core`] | `pallas-core` | the algebra, any context |
//! | `props` | `pallas-props` | `Properties` |
//! | `sql` | `pallas-sql` | `rusqlite::Row`, `&mut rusqlite::Statement` |
//! | `arrow` | `pallas-arrow` | `BatchRow`, `&mut BatchWriter` |
//! | `telemetry` | `pallas-telemetry` | logging setup |
//!
//! Each backend sits behind a cargo feature of the same name, all enabled by
//! default.

#![doc(html_root_url = "https://docs.rs/pallas/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Re-export the combinator algebra
pub use pallas_core as core;
pub use pallas_core::{
    catch_unchecked, combine, combine_into, Absence, Error, Extractor, Injector, KeyedExtractor,
    KeyedInjector, UncheckedError,
};

// Re-export backends
#[cfg(feature = "props")]
pub use pallas_props as props;

#[cfg(feature = "sql")]
pub use pallas_sql as sql;

#[cfg(feature = "arrow")]
pub use pallas_arrow as arrow;

#[cfg(feature = "telemetry")]
pub use pallas_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// Brings the traits and free combinators into scope:
///
/// ```rust
/// use pallas::prelude::*;
/// ```
pub mod prelude {
    pub use pallas_core::{
        catch_unchecked, combine, combine_into, Absence, Extractor, InfallibleExtractor,
        InfallibleInjector, Injector, KeyedExtractor, KeyedInjector,
    };
}
