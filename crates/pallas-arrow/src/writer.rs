//! Injectors that append rows to a [`BatchWriter`].
//!
//! The context is `&mut BatchWriter`, threaded through a tuple of injectors.
//! Each injector appends one cell to its column; a row is complete once
//! every column has received a value or a null.
//!
//! Columns are positional, so a writer must never skip a cell. Use
//! [`nullable`] for optional fields: it appends a null for `None`, while
//! [`optional`](pallas_core::KeyedInjector::optional) would leave the column
//! one row short.

use std::marker::PhantomData;

use arrow_array::builder::{make_builder, ArrayBuilder};
use arrow_array::RecordBatch;
use arrow_schema::SchemaRef;
use pallas_core::{Bound, Injector, KeyedInjector, OptionalWith};
use tracing::debug;

use crate::error::{ColumnError, ColumnResult};
use crate::value::{self, ArrowValue};

/// Accumulates rows for one schema and produces a [`RecordBatch`].
pub struct BatchWriter {
    schema: SchemaRef,
    builders: Vec<Box<dyn ArrayBuilder>>,
}

impl std::fmt::Debug for BatchWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchWriter")
            .field("schema", &self.schema)
            .field("rows", &self.num_rows())
            .finish()
    }
}

impl BatchWriter {
    /// Creates an empty writer.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnError::UnsupportedType`] if a field has a type with
    /// no [`ArrowValue`] mapping.
    pub fn new(schema: SchemaRef) -> ColumnResult<Self> {
        Self::with_capacity(schema, 0)
    }

    /// Creates an empty writer with room for `capacity` rows.
    pub fn with_capacity(schema: SchemaRef, capacity: usize) -> ColumnResult<Self> {
        let builders = schema
            .fields()
            .iter()
            .map(|field| {
                if value::is_supported(field.data_type()) {
                    Ok(make_builder(field.data_type(), capacity))
                } else {
                    Err(ColumnError::UnsupportedType {
                        column: field.name().clone(),
                        data_type: field.data_type().clone(),
                    })
                }
            })
            .collect::<ColumnResult<Vec<_>>>()?;
        Ok(Self { schema, builders })
    }

    /// The schema rows are written against.
    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    /// Number of complete rows appended so far.
    pub fn num_rows(&self) -> usize {
        self.builders
            .iter()
            .map(|builder| builder.len())
            .min()
            .unwrap_or(0)
    }

    /// Position of the field called `name`.
    pub fn column_index(&self, name: &str) -> ColumnResult<usize> {
        self.schema
            .index_of(name)
            .map_err(|_| ColumnError::NoSuchColumn {
                name: name.to_string(),
            })
    }

    fn builder(&mut self, index: usize) -> ColumnResult<&mut dyn ArrayBuilder> {
        let count = self.builders.len();
        self.builders
            .get_mut(index)
            .map(|builder| &mut **builder)
            .ok_or(ColumnError::ColumnOutOfBounds { index, count })
    }

    /// Appends `value` to column `index`.
    pub fn append_value<T: ArrowValue>(&mut self, index: usize, value: T) -> ColumnResult<()> {
        let expected = T::data_type();
        let builder = self.builder(index)?;
        if let Err(err) = T::append(builder, value) {
            let field = self.schema.field(index);
            return Err(ColumnError::value(
                field.name().clone(),
                expected,
                field.data_type().clone(),
                err,
            ));
        }
        Ok(())
    }

    /// Appends a null to column `index`.
    pub fn append_null(&mut self, index: usize) -> ColumnResult<()> {
        let builder = self.builder(index)?;
        if let Err(err) = value::append_null(builder) {
            let field = self.schema.field(index);
            return Err(ColumnError::value(
                field.name().clone(),
                field.data_type().clone(),
                field.data_type().clone(),
                err,
            ));
        }
        Ok(())
    }

    /// Builds a batch from the rows appended so far and resets the writer.
    ///
    /// # Errors
    ///
    /// Fails if the columns have different lengths or a non-nullable field
    /// received a null. On failure the writer keeps every appended cell, so
    /// the caller can complete the row and finish again.
    pub fn finish(&mut self) -> ColumnResult<RecordBatch> {
        let columns = self
            .builders
            .iter()
            .map(|builder| builder.finish_cloned())
            .collect();
        let batch = RecordBatch::try_new(self.schema.clone(), columns)?;
        for builder in &mut self.builders {
            builder.finish();
        }
        debug!(rows = batch.num_rows(), columns = batch.num_columns(), "finished record batch");
        Ok(batch)
    }
}

/// Appends every value in `values` with `injector` and returns the batch.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use arrow_schema::{DataType, Field, Schema};
/// use pallas_arrow::{write_at, write_named, write_rows, ColumnError};
///
/// # fn main() -> Result<(), ColumnError> {
/// let schema = Arc::new(Schema::new(vec![
///     Field::new("id", DataType::Int64, false),
///     Field::new("name", DataType::Utf8, false),
/// ]));
///
/// let row = (write_at::<i64>(0), write_named::<String>("name"));
/// let batch = write_rows(schema, &row, vec![(1, "one".to_string()), (2, "two".to_string())])?;
/// assert_eq!(batch.num_rows(), 2);
/// # Ok(())
/// # }
/// ```
pub fn write_rows<I, T, E>(
    schema: SchemaRef,
    injector: &I,
    values: impl IntoIterator<Item = T>,
) -> Result<RecordBatch, E>
where
    I: for<'w> Injector<&'w mut BatchWriter, T, Error = E>,
    E: From<ColumnError>,
{
    let mut writer = BatchWriter::new(schema)?;
    for value in values {
        injector.inject(&mut writer, value)?;
    }
    Ok(writer.finish()?)
}

/// Appends a `T` cell. `K` is `usize` for positional access and `str` for
/// access by name.
pub struct Append<T, K: ?Sized = usize> {
    _marker: PhantomData<(fn(T), fn(&K))>,
}

impl<T, K: ?Sized> Clone for Append<T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K: ?Sized> Copy for Append<T, K> {}

impl<T, K: ?Sized> std::fmt::Debug for Append<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Append")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<'w, T: ArrowValue> KeyedInjector<&'w mut BatchWriter, T> for Append<T, usize> {
    type Key = usize;
    type Error = ColumnError;

    fn inject_key(
        &self,
        writer: &'w mut BatchWriter,
        index: &usize,
        value: T,
    ) -> ColumnResult<&'w mut BatchWriter> {
        writer.append_value(*index, value)?;
        Ok(writer)
    }
}

impl<'w, T: ArrowValue> KeyedInjector<&'w mut BatchWriter, T> for Append<T, str> {
    type Key = str;
    type Error = ColumnError;

    fn inject_key(
        &self,
        writer: &'w mut BatchWriter,
        name: &str,
        value: T,
    ) -> ColumnResult<&'w mut BatchWriter> {
        let index = writer.column_index(name)?;
        writer.append_value(index, value)?;
        Ok(writer)
    }
}

/// Creates an injector of `T` by zero-based column index.
pub fn append<T: ArrowValue>() -> Append<T, usize> {
    Append {
        _marker: PhantomData,
    }
}

/// Creates an injector of `T` by field name.
pub fn append_named<T: ArrowValue>() -> Append<T, str> {
    Append {
        _marker: PhantomData,
    }
}

/// Writes column `index` (zero-based).
pub fn write_at<T: ArrowValue>(index: usize) -> Bound<Append<T, usize>, usize> {
    append::<T>().bind(index)
}

/// Writes the column called `name`.
pub fn write_named<T: ArrowValue>(name: impl Into<String>) -> Bound<Append<T, str>, String> {
    append_named::<T>().bind(name.into())
}

/// Appends a null cell. See [`null`].
pub struct Null<K: ?Sized = usize> {
    _marker: PhantomData<fn(&K)>,
}

impl<K: ?Sized> Clone for Null<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K: ?Sized> Copy for Null<K> {}

impl<K: ?Sized> std::fmt::Debug for Null<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Null")
    }
}

impl<'w> KeyedInjector<&'w mut BatchWriter, ()> for Null<usize> {
    type Key = usize;
    type Error = ColumnError;

    fn inject_key(
        &self,
        writer: &'w mut BatchWriter,
        index: &usize,
        (): (),
    ) -> ColumnResult<&'w mut BatchWriter> {
        writer.append_null(*index)?;
        Ok(writer)
    }
}

impl<'w> KeyedInjector<&'w mut BatchWriter, ()> for Null<str> {
    type Key = str;
    type Error = ColumnError;

    fn inject_key(
        &self,
        writer: &'w mut BatchWriter,
        name: &str,
        (): (),
    ) -> ColumnResult<&'w mut BatchWriter> {
        let index = writer.column_index(name)?;
        writer.append_null(index)?;
        Ok(writer)
    }
}

/// Creates an injector that appends a null by column index.
pub fn null() -> Null<usize> {
    Null {
        _marker: PhantomData,
    }
}

/// Creates an injector that appends a null by field name.
pub fn null_named() -> Null<str> {
    Null {
        _marker: PhantomData,
    }
}

/// Injector of `Option<T>` by index that appends a null for `None`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use arrow_array::Array;
/// use arrow_schema::{DataType, Field, Schema};
/// use pallas_arrow::{nullable, write_rows, ColumnError};
/// use pallas_core::KeyedInjector;
///
/// # fn main() -> Result<(), ColumnError> {
/// let schema = Arc::new(Schema::new(vec![Field::new("n", DataType::Int32, true)]));
/// let batch = write_rows(schema, &nullable::<i32>().bind(0_usize), vec![Some(1), None])?;
/// assert!(batch.column(0).is_null(1));
/// # Ok(())
/// # }
/// ```
pub fn nullable<T: ArrowValue>() -> OptionalWith<Append<T, usize>, Null<usize>> {
    append::<T>().optional_with(null())
}

/// Injector of `Option<T>` by name that appends a null for `None`.
pub fn nullable_named<T: ArrowValue>() -> OptionalWith<Append<T, str>, Null<str>> {
    append_named::<T>().optional_with(null_named())
}
