//! # Pallas Props
//!
//! Extractors and injectors over string property maps.
//!
//! This crate provides:
//!
//! - [`Properties`] - an ordered string map with a `.properties` text codec
//! - [`PropertyValue`] - typed parsing and formatting of stored strings
//! - [`get`] / [`set`] and the bound forms [`property`] / [`assign`] - leaf
//!   extractors and injectors keyed by property name
//! - [`PropertiesLoader`] - layered loading from defaults, files and the
//!   environment
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use pallas_core::{combine, Extractor, KeyedExtractor};
//! use pallas_props::{get, property, Properties};
//!
//! #[derive(Debug, PartialEq)]
//! struct Job {
//!     end_date: NaiveDate,
//!     num_threads: Option<i32>,
//!     env: String,
//! }
//!
//! let job = combine(
//!     (
//!         property::<NaiveDate>("endDate"),
//!         get::<i32>().optional().bind("numThreads"),
//!         property::<String>("env"),
//!     ),
//!     |(end_date, num_threads, env): (NaiveDate, Option<i32>, String)| Job {
//!         end_date,
//!         num_threads,
//!         env,
//!     },
//! );
//!
//! let props = Properties::parse("endDate=2021-04-19\nenv=DEV\n").unwrap();
//! let value = job.extract(&props).unwrap();
//! assert_eq!(value.num_threads, None);
//! assert_eq!(value.env, "DEV");
//! ```

#![doc(html_root_url = "https://docs.rs/pallas-props/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod leaf;
mod loader;
mod properties;
mod value;

pub use error::{PropertyError, PropertyResult};
pub use leaf::{
    assign, displayed, get, parsed, property, set, unset, Displayed, Get, Parsed, Set, Unset,
};
pub use loader::PropertiesLoader;
pub use properties::Properties;
pub use value::PropertyValue;
