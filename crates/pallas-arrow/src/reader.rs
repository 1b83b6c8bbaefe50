//! Extractors over the rows of a [`RecordBatch`].
//!
//! The context is a [`BatchRow`], one row of a batch. Columns are addressed
//! by zero-based index or by field name. The column's Arrow type must be
//! exactly the type the Rust value maps to (see [`ArrowValue`]); there are
//! no implicit widening conversions. A null cell fails with
//! [`ColumnError::Null`], which
//! [`optional`](pallas_core::KeyedExtractor::optional) turns into `None`.

use std::marker::PhantomData;

use arrow_array::{Array, ArrayRef, RecordBatch};
use pallas_core::{Bound, Extractor, KeyedExtractor};
use tracing::debug;

use crate::error::{ColumnError, ColumnResult};
use crate::value::ArrowValue;

/// One row of a record batch.
#[derive(Debug, Clone, Copy)]
pub struct BatchRow<'a> {
    batch: &'a RecordBatch,
    row: usize,
}

impl<'a> BatchRow<'a> {
    /// Points at `row` of `batch`.
    ///
    /// # Errors
    ///
    /// Returns [`ColumnError::RowOutOfBounds`] if the batch has no such row.
    pub fn new(batch: &'a RecordBatch, row: usize) -> ColumnResult<Self> {
        if row >= batch.num_rows() {
            return Err(ColumnError::RowOutOfBounds {
                row,
                count: batch.num_rows(),
            });
        }
        Ok(Self { batch, row })
    }

    /// The batch this row belongs to.
    pub fn batch(&self) -> &'a RecordBatch {
        self.batch
    }

    /// The row's position in the batch.
    pub fn row(&self) -> usize {
        self.row
    }

    /// The array holding column `index`.
    pub fn column(&self, index: usize) -> ColumnResult<&'a ArrayRef> {
        let count = self.batch.num_columns();
        if index >= count {
            return Err(ColumnError::ColumnOutOfBounds { index, count });
        }
        Ok(self.batch.column(index))
    }

    /// The array holding the column called `name`.
    pub fn column_by_name(&self, name: &str) -> ColumnResult<&'a ArrayRef> {
        self.batch
            .column_by_name(name)
            .ok_or_else(|| ColumnError::NoSuchColumn {
                name: name.to_string(),
            })
    }

    fn read<T: ArrowValue>(&self, array: &dyn Array, label: &dyn Fn() -> String) -> ColumnResult<T> {
        let expected = T::data_type();
        if array.data_type() != &expected {
            return Err(ColumnError::wrong_type(
                label(),
                expected,
                array.data_type().clone(),
            ));
        }
        if array.is_null(self.row) {
            return Err(ColumnError::null(label()));
        }
        T::read(array, self.row)
            .map_err(|err| ColumnError::value(label(), expected, array.data_type().clone(), err))
    }
}

/// Iterates over every row of `batch`.
pub fn rows(batch: &RecordBatch) -> impl Iterator<Item = BatchRow<'_>> + '_ {
    (0..batch.num_rows()).map(move |row| BatchRow { batch, row })
}

/// Extracts every row of `batch`.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use arrow_array::{ArrayRef, Int64Array, RecordBatch, StringArray};
/// use pallas_arrow::{at, named, read_rows, ColumnError};
///
/// # fn main() -> Result<(), ColumnError> {
/// let batch = RecordBatch::try_from_iter([
///     ("id", Arc::new(Int64Array::from(vec![1, 2])) as ArrayRef),
///     ("name", Arc::new(StringArray::from(vec!["one", "two"])) as ArrayRef),
/// ])?;
///
/// let pairs = read_rows(&batch, &(at::<i64>(0), named::<String>("name")))?;
/// assert_eq!(pairs, vec![(1, "one".to_string()), (2, "two".to_string())]);
/// # Ok(())
/// # }
/// ```
pub fn read_rows<'a, X>(batch: &'a RecordBatch, extractor: &X) -> Result<Vec<X::Output>, X::Error>
where
    X: Extractor<BatchRow<'a>>,
{
    let out = rows(batch)
        .map(|row| extractor.extract(&row))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(rows = out.len(), "extracted batch rows");
    Ok(out)
}

/// Reads a column as `T`. `K` is `usize` for positional access and `str`
/// for access by name.
pub struct Column<T, K: ?Sized = usize> {
    _marker: PhantomData<(fn() -> T, fn(&K))>,
}

impl<T, K: ?Sized> Clone for Column<T, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, K: ?Sized> Copy for Column<T, K> {}

impl<T, K: ?Sized> std::fmt::Debug for Column<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<'a, T: ArrowValue> KeyedExtractor<BatchRow<'a>> for Column<T, usize> {
    type Key = usize;
    type Output = T;
    type Error = ColumnError;

    fn extract_key(&self, row: &BatchRow<'a>, index: &usize) -> ColumnResult<T> {
        let array = row.column(*index)?;
        row.read(array.as_ref(), &|| index.to_string())
    }
}

impl<'a, T: ArrowValue> KeyedExtractor<BatchRow<'a>> for Column<T, str> {
    type Key = str;
    type Output = T;
    type Error = ColumnError;

    fn extract_key(&self, row: &BatchRow<'a>, name: &str) -> ColumnResult<T> {
        let array = row.column_by_name(name)?;
        row.read(array.as_ref(), &|| name.to_string())
    }
}

/// Creates an extractor of `T` by zero-based column index.
pub fn column<T: ArrowValue>() -> Column<T, usize> {
    Column {
        _marker: PhantomData,
    }
}

/// Creates an extractor of `T` by field name.
pub fn column_named<T: ArrowValue>() -> Column<T, str> {
    Column {
        _marker: PhantomData,
    }
}

/// Reads column `index` (zero-based) as `T`.
pub fn at<T: ArrowValue>(index: usize) -> Bound<Column<T, usize>, usize> {
    column::<T>().bind(index)
}

/// Reads the column called `name` as `T`.
pub fn named<T: ArrowValue>(name: impl Into<String>) -> Bound<Column<T, str>, String> {
    column_named::<T>().bind(name.into())
}
