//! Structured logging for Pallas.
//!
//! The backend crates emit `tracing` events when they touch external state
//! (loading property files, executing statements, finishing record batches).
//! This module installs a `tracing-subscriber` that renders those events as
//! JSON or as human-readable text.
//!
//! # Example
//!
//! ```rust,ignore
//! use pallas_telemetry::logging::{init_logging, LogConfig};
//!
//! let config = LogConfig::development();
//! init_logging(&config)?;
//!
//! tracing::debug!(rows = 3, "extracted query rows");
//! ```

use pallas_core::{combine, Extractor, KeyedExtractor};
use pallas_props::{get, Properties, PropertyError};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::TelemetryError;
use crate::TelemetryResult;

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Filter directive (e.g., "info", "pallas_sql=debug").
    pub level: String,

    /// Whether to output JSON format.
    pub json_format: bool,

    /// Whether to include span events (new, close).
    pub span_events: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Whether to include thread IDs.
    pub thread_ids: bool,

    /// Whether to include target (module path).
    pub include_target: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            json_format: false,
            span_events: true,
            file_line_info: true,
            thread_ids: false,
            include_target: true,
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            json_format: true,
            span_events: false,
            file_line_info: false,
            thread_ids: false,
            include_target: true,
        }
    }

    /// Extractor reading the `log.*` keys of a property map.
    ///
    /// | Key | Field |
    /// |---|---|
    /// | `log.enabled` | `enabled` |
    /// | `log.level` | `level` |
    /// | `log.json` | `json_format` |
    /// | `log.span_events` | `span_events` |
    /// | `log.file_line` | `file_line_info` |
    /// | `log.thread_ids` | `thread_ids` |
    /// | `log.target` | `include_target` |
    ///
    /// Keys that are not set keep their [`production`](Self::production)
    /// value. A key that is set but does not parse is an error.
    pub fn extractor() -> impl Extractor<Properties, Output = Self, Error = PropertyError> {
        combine(
            (
                get::<bool>().optional().bind(keys::ENABLED),
                get::<String>().optional().bind(keys::LEVEL),
                get::<bool>().optional().bind(keys::JSON),
                get::<bool>().optional().bind(keys::SPAN_EVENTS),
                get::<bool>().optional().bind(keys::FILE_LINE),
                get::<bool>().optional().bind(keys::THREAD_IDS),
                get::<bool>().optional().bind(keys::TARGET),
            ),
            |(enabled, level, json_format, span_events, file_line_info, thread_ids, include_target): (
                Option<bool>,
                Option<String>,
                Option<bool>,
                Option<bool>,
                Option<bool>,
                Option<bool>,
                Option<bool>,
            )| {
                let base = Self::production();
                Self {
                    enabled: enabled.unwrap_or(base.enabled),
                    level: level.unwrap_or(base.level),
                    json_format: json_format.unwrap_or(base.json_format),
                    span_events: span_events.unwrap_or(base.span_events),
                    file_line_info: file_line_info.unwrap_or(base.file_line_info),
                    thread_ids: thread_ids.unwrap_or(base.thread_ids),
                    include_target: include_target.unwrap_or(base.include_target),
                }
            },
        )
    }

    /// Reads the configuration from a property map. See
    /// [`extractor`](Self::extractor).
    pub fn from_properties(properties: &Properties) -> TelemetryResult<Self> {
        Ok(Self::extractor().extract(properties)?)
    }
}

/// Property keys read by [`LogConfig::extractor`].
pub mod keys {
    /// Enables or disables logging.
    pub const ENABLED: &str = "log.enabled";

    /// Filter directive.
    pub const LEVEL: &str = "log.level";

    /// JSON output.
    pub const JSON: &str = "log.json";

    /// Span events.
    pub const SPAN_EVENTS: &str = "log.span_events";

    /// File and line info.
    pub const FILE_LINE: &str = "log.file_line";

    /// Thread IDs.
    pub const THREAD_IDS: &str = "log.thread_ids";

    /// Target (module path).
    pub const TARGET: &str = "log.target";
}

/// Initializes the logging subsystem.
///
/// # Errors
///
/// Returns `TelemetryError::LoggingInit` if the filter is invalid or a
/// global subscriber is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let span_events = if config.span_events {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    if config.json_format {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_span_events(span_events)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_thread_ids(config.thread_ids)
            .with_target(config.include_target)
            .with_filter(filter);

        tracing_subscriber::registry()
            .with(fmt_layer)
            .try_init()
            .map_err(|e| TelemetryError::LoggingInit(e.to_string()))?;
    }

    Ok(())
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns error if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter)
        .map_err(|e| TelemetryError::LoggingInit(format!("Invalid log level: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert!(config.json_format);
        assert_eq!(config.level, "info");
    }

    #[test]
    fn test_development_config() {
        let config = LogConfig::development();
        assert!(!config.json_format);
        assert!(config.span_events);
        assert!(config.file_line_info);
        assert_eq!(config.level, "debug");
    }

    #[test]
    fn test_empty_properties_give_production() {
        let config = LogConfig::from_properties(&Properties::new()).unwrap();
        assert_eq!(config, LogConfig::production());
    }

    #[test]
    fn test_properties_override_fields() {
        let props = Properties::parse("log.level=pallas_sql=debug\nlog.json=false\n").unwrap();
        let config = LogConfig::from_properties(&props).unwrap();
        assert_eq!(config.level, "pallas_sql=debug");
        assert!(!config.json_format);
        assert!(config.include_target);
    }

    #[test]
    fn test_unparsable_flag_is_an_error() {
        let props = Properties::parse("log.enabled=maybe\n").unwrap();
        let err = LogConfig::from_properties(&props).unwrap_err();
        assert!(matches!(
            err,
            TelemetryError::InvalidConfig(PropertyError::Parse { .. })
        ));
    }

    #[test]
    fn test_create_env_filter() {
        assert!(create_env_filter("info,pallas_props=debug").is_ok());
        assert!(create_env_filter("pallas=loud").is_err());
    }

    #[test]
    fn test_disabled_logging() {
        let config = LogConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(init_logging(&config).is_ok());
    }
}
