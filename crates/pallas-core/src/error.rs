//! Error types shared by every extractor and injector.
//!
//! Extractors and injectors declare their failure type through an associated
//! `Error` type. This module provides:
//!
//! - [`Error`] - the failures the combinator layer itself can produce
//! - [`Absence`] - the convention that lets [`optional`](crate::Extractor::optional)
//!   tell a missing value apart from a real failure
//! - [`UncheckedError`] - the undeclared failure raised by
//!   [`unchecked`](crate::Extractor::unchecked) adapters

use std::convert::Infallible;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Classifies an error as "the value is not there".
///
/// Backends report a missing value (SQL `NULL`, an absent property key, an
/// unset columnar slot) through their declared error type. Implementing this
/// trait lets [`Extractor::optional`](crate::Extractor::optional) turn exactly
/// those errors into `None` while every other failure still propagates.
///
/// # Example
///
/// ```
/// use pallas_core::{Absence, Error};
///
/// assert!(Error::missing("endDate").is_absent());
/// assert!(!Error::arity_mismatch(2, 3).is_absent());
/// ```
pub trait Absence {
    /// Returns `true` if this error only signals a missing value.
    fn is_absent(&self) -> bool;
}

impl Absence for Infallible {
    fn is_absent(&self) -> bool {
        match *self {}
    }
}

impl<E: Absence + ?Sized> Absence for Box<E> {
    fn is_absent(&self) -> bool {
        (**self).is_absent()
    }
}

/// Failures produced by the combinator layer and the test fixtures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// No value is present for the given key.
    #[error("no value present for {key}")]
    Missing {
        /// Key, column or field that was looked up.
        key: String,
    },

    /// A raw value could not be converted to the requested type.
    #[error("cannot parse {key} value {value:?} as {target}: {reason}")]
    Parse {
        /// Key the raw value was read from.
        key: String,
        /// The raw value.
        value: String,
        /// Name of the target type.
        target: &'static str,
        /// Explanation from the parser.
        reason: String,
    },

    /// A list injector received a different number of values than it has parts.
    #[error("arity mismatch: expected {expected} values, got {actual}")]
    ArityMismatch {
        /// Number of sub-injectors.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },
}

impl Error {
    /// Creates an error for a missing value.
    pub fn missing(key: impl Into<String>) -> Self {
        Self::Missing { key: key.into() }
    }

    /// Creates an error for a value that failed to parse.
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

    /// Creates an error for a list injector fed the wrong number of values.
    pub fn arity_mismatch(expected: usize, actual: usize) -> Self {
        Self::ArityMismatch { expected, actual }
    }
}

impl Absence for Error {
    fn is_absent(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }
}

/// The undeclared failure raised by an [`Unchecked`](crate::Unchecked) adapter.
///
/// The adapter unwinds with this value as the panic payload. The original
/// declared error is kept as the [`source`](StdError::source) and can be
/// recovered with [`downcast_ref`](Self::downcast_ref) or
/// [`catch_unchecked`].
#[derive(Error, Debug)]
#[error("unchecked failure: {cause}")]
pub struct UncheckedError {
    #[source]
    cause: Box<dyn StdError + Send + Sync + 'static>,
}

impl UncheckedError {
    /// Wraps a declared error.
    pub fn new<E>(cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            cause: Box::new(cause),
        }
    }

    /// Returns the original declared error.
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.cause
    }

    /// Returns the original error if it has type `E`.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.cause.downcast_ref::<E>()
    }

    /// Consumes the wrapper and returns the original error.
    pub fn into_cause(self) -> Box<dyn StdError + Send + Sync + 'static> {
        self.cause
    }
}

/// Raises `cause` as an undeclared failure.
///
/// This is the single place where a declared error crosses into the
/// unchecked form.
pub fn raise<E>(cause: E) -> !
where
    E: StdError + Send + Sync + 'static,
{
    panic::panic_any(UncheckedError::new(cause))
}

/// Runs `f`, turning an undeclared failure back into a declared one.
///
/// Panics that do not carry an [`UncheckedError`] are resumed untouched.
///
/// # Example
///
/// ```
/// use pallas_core::{catch_unchecked, extractor, Extractor, InfallibleExtractor};
///
/// let failing = extractor::from_fn(|_: &()| -> Result<i32, std::fmt::Error> {
///     Err(std::fmt::Error)
/// })
/// .unchecked();
///
/// let err = catch_unchecked(|| failing.get(&())).unwrap_err();
/// assert!(err.downcast_ref::<std::fmt::Error>().is_some());
/// ```
pub fn catch_unchecked<R>(f: impl FnOnce() -> R) -> Result<R, UncheckedError> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<UncheckedError>() {
            Ok(err) => Err(*err),
            Err(other) => panic::resume_unwind(other),
        },
    }
}
