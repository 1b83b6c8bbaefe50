//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The logging configuration could not be read.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] pallas_props::PropertyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TelemetryError::LoggingInit("failed".to_string());
        assert_eq!(err.to_string(), "Failed to initialize logging: failed");
    }

    #[test]
    fn test_config_error_keeps_key() {
        let err = TelemetryError::from(pallas_props::PropertyError::missing("log.level"));
        assert!(err.to_string().contains("log.level"));
    }
}
