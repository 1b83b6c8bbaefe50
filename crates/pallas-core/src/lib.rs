//! # Pallas Core
//!
//! Composable extractors and injectors for typed data binding.
//!
//! An extractor reads a typed value out of a context (a result row, a
//! property map, a columnar batch row). An injector writes a typed value into
//! one. Leaf functions come from the backend crates; this crate provides the
//! algebra to build composite ones from them:
//!
//! - [`Extractor`] / [`Injector`] - the two core traits and their combinators
//! - [`KeyedExtractor`] / [`KeyedInjector`] - functions addressed by index or
//!   by name, closed over a key with `bind`
//! - [`combine`] / [`combine_into`] - tuple combinators
//! - [`Absence`] - lets `optional()` tell a missing value from a failure
//! - [`UncheckedError`] - the undeclared failure raised by `unchecked()`
//!
//! ## Example
//!
//! ```rust
//! use pallas_core::{combine, extractor, Error, Extractor};
//! use std::collections::HashMap;
//!
//! type Ctx = HashMap<&'static str, i64>;
//!
//! fn field(name: &'static str) -> impl Extractor<Ctx, Output = i64, Error = Error> {
//!     extractor::from_fn(move |ctx: &Ctx| ctx.get(name).copied().ok_or_else(|| Error::missing(name)))
//! }
//!
//! let area = combine((field("w"), field("h")), |(w, h): (i64, i64)| w * h);
//! let ctx = Ctx::from([("w", 3), ("h", 4)]);
//! assert_eq!(area.extract(&ctx).unwrap(), 12);
//!
//! let depth = field("d").optional();
//! assert_eq!(depth.extract(&ctx).unwrap(), None);
//! ```

#![doc(html_root_url = "https://docs.rs/pallas-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod adapt;
mod combine;
mod error;
pub mod extractor;
pub mod fixtures;
pub mod injector;
pub mod keyed;

pub use adapt::{
    ErrInto, Fallible, FlatMap, Map, MapErr, Optional, OptionalWith, Premap, TryMap, TryPremap,
    Unchecked,
};
pub use combine::{combine, combine_into};
pub use error::{catch_unchecked, raise, Absence, Error, Result, UncheckedError};
pub use extractor::{BoxExtractor, Extractor, InfallibleExtractor};
pub use injector::{BoxInjector, InfallibleInjector, Injector};
pub use keyed::{
    Bound, ExtractorByIndex, ExtractorByName, InjectorByIndex, InjectorByName, KeyedExtractor,
    KeyedInjector,
};
