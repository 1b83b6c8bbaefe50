//! Property error types.

use std::path::PathBuf;

use pallas_core::Absence;
use thiserror::Error;

/// Result type alias using [`PropertyError`].
pub type PropertyResult<T> = Result<T, PropertyError>;

/// Errors raised while reading, writing or loading properties.
#[derive(Error, Debug)]
pub enum PropertyError {
    /// The key is not present.
    #[error("property not set: {key}")]
    Missing {
        /// The property name.
        key: String,
    },

    /// The stored string could not be converted to the requested type.
    #[error("cannot parse property {key}={value:?} as {target}: {reason}")]
    Parse {
        /// The property name.
        key: String,
        /// The stored string.
        value: String,
        /// Name of the requested type.
        target: &'static str,
        /// Explanation from the parser.
        reason: String,
    },

    /// Malformed `.properties` text.
    #[error("invalid properties syntax on line {line}: {reason}")]
    Syntax {
        /// One-based line number where the entry starts.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Properties file not found.
    #[error("properties file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// Failed to read a properties file.
    #[error("failed to read properties file: {path}")]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML properties: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON parsing error.
    #[error("failed to parse JSON properties: {0}")]
    Json(#[from] serde_json::Error),

    /// `.env` file error.
    #[error("failed to load .env file: {0}")]
    Dotenv(#[from] dotenvy::Error),

    /// The file extension or format name is not recognised.
    #[error("unsupported properties format: {0}")]
    UnsupportedFormat(String),

    /// Failure from the combinator layer.
    #[error(transparent)]
    Core(#[from] pallas_core::Error),
}

impl PropertyError {
    /// Create a new missing property error.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// Create a new parse error.
    pub fn parse(
        key: impl Into<String>,
        value: impl Into<String>,
        target: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self::Parse {
            key: key.into(),
            value: value.into(),
            target,
            reason: reason.into(),
        }
    }

    /// Create a new syntax error.
    pub fn syntax(line: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new file not found error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a new read error.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

impl Absence for PropertyError {
    fn is_absent(&self) -> bool {
        match self {
            Self::Missing { .. } => true,
            Self::Core(err) => err.is_absent(),
            _ => false,
        }
    }
}
