//! Test fixtures for code built on extractors and injectors.
//!
//! Provides small in-memory contexts that make evaluation order and failure
//! propagation observable.

use std::cell::RefCell;
use std::collections::BTreeMap;

use thiserror::Error;

use crate::{Error, Extractor, Injector};

/// A plain name to integer map, the simplest writable context.
pub type MapContext = BTreeMap<String, i64>;

/// A read-only context that records every field lookup in order.
#[derive(Debug, Default)]
pub struct RecordingContext {
    values: MapContext,
    reads: RefCell<Vec<String>>,
}

impl RecordingContext {
    /// Creates a context holding the given fields.
    pub fn new<'a>(fields: impl IntoIterator<Item = (&'a str, i64)>) -> Self {
        Self {
            values: fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            reads: RefCell::default(),
        }
    }

    /// Looks up a field and records the access.
    pub fn read(&self, name: &str) -> Option<i64> {
        self.reads.borrow_mut().push(name.to_string());
        self.values.get(name).copied()
    }

    /// Returns the field names read so far, oldest first.
    pub fn reads(&self) -> Vec<String> {
        self.reads.borrow().clone()
    }

    /// Forgets the recorded reads.
    pub fn clear(&self) {
        self.reads.borrow_mut().clear();
    }
}

/// Extractor for one named field of a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
}

impl Extractor<RecordingContext> for Field {
    type Output = i64;
    type Error = Error;

    fn extract(&self, ctx: &RecordingContext) -> Result<i64, Error> {
        ctx.read(&self.name)
            .ok_or_else(|| Error::missing(self.name.as_str()))
    }
}

/// Reads field `name`, failing with [`Error::Missing`] if it is not set.
pub fn field(name: impl Into<String>) -> Field {
    Field { name: name.into() }
}

/// Injector that stores a value under one name in a [`MapContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    name: String,
}

impl Injector<MapContext, i64> for Write {
    type Error = Error;

    fn inject(&self, mut ctx: MapContext, value: i64) -> Result<MapContext, Error> {
        ctx.insert(self.name.clone(), value);
        Ok(ctx)
    }
}

/// Writes the value under `name`.
pub fn write(name: impl Into<String>) -> Write {
    Write { name: name.into() }
}

/// A declared error carrying a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct Boom(pub String);

/// Extractor that always fails with [`Boom`].
#[derive(Debug, Clone)]
pub struct Failing {
    message: String,
}

impl Extractor<RecordingContext> for Failing {
    type Output = i64;
    type Error = Boom;

    fn extract(&self, _ctx: &RecordingContext) -> Result<i64, Boom> {
        Err(Boom(self.message.clone()))
    }
}

/// Creates an extractor that fails with `Boom(message)` on every read.
pub fn failing(message: impl Into<String>) -> Failing {
    Failing {
        message: message.into(),
    }
}
