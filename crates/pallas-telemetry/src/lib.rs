//! Structured logging for Pallas.
//!
//! The combinator core is silent. The backends (`pallas-props`,
//! `pallas-sql`, `pallas-arrow`) emit `tracing` debug events whenever they
//! touch external state. This crate installs a `tracing-subscriber` to
//! render them:
//!
//! - JSON output for production, pretty output for development
//! - `EnvFilter` directives such as `info,pallas_sql=debug`
//! - configuration read from a property map through the `pallas-props`
//!   extractors ([`LogConfig::from_properties`])
//!
//! # Example
//!
//! ```rust,ignore
//! use pallas_props::PropertiesLoader;
//! use pallas_telemetry::{init_logging, LogConfig};
//!
//! let props = PropertiesLoader::new()
//!     .with_optional_file("app.properties")?
//!     .with_env_prefix("APP")
//!     .load()?;
//! init_logging(&LogConfig::from_properties(&props)?)?;
//! ```

#![doc(html_root_url = "https://docs.rs/pallas-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
