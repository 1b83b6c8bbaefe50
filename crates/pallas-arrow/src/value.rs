//! Mapping between Rust values and Arrow arrays.

use arrow_array::builder::{
    ArrayBuilder, BooleanBuilder, Date32Builder, Float32Builder, Float64Builder, Int16Builder,
    Int32Builder, Int64Builder, Int8Builder, StringBuilder, Time64MicrosecondBuilder,
    TimestampMicrosecondBuilder, UInt16Builder, UInt32Builder, UInt64Builder, UInt8Builder,
};
use arrow_array::{
    Array, BooleanArray, Date32Array, Float32Array, Float64Array, Int16Array, Int32Array,
    Int64Array, Int8Array, StringArray, Time64MicrosecondArray, TimestampMicrosecondArray,
    UInt16Array, UInt32Array, UInt64Array, UInt8Array,
};
use arrow_schema::{DataType, TimeUnit};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

const MICROS_PER_SECOND: i64 = 1_000_000;

/// Why a value could not be moved into or out of an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// The array or builder is not of the expected concrete type.
    WrongType,
    /// The stored value has no Rust equivalent.
    Invalid(String),
}

/// A Rust type stored in one Arrow column.
///
/// | Rust | Arrow |
/// |---|---|
/// | `bool` | `Boolean` |
/// | `i8` .. `i64` | `Int8` .. `Int64` |
/// | `u8` .. `u64` | `UInt8` .. `UInt64` |
/// | `f32`, `f64` | `Float32`, `Float64` |
/// | `char` | `UInt32` (code point) |
/// | `String` | `Utf8` |
/// | `NaiveDate` | `Date32` |
/// | `NaiveDateTime` | `Timestamp(Microsecond, None)` |
/// | `NaiveTime` | `Time64(Microsecond)` |
///
/// Temporal values are stored with microsecond precision.
pub trait ArrowValue: Sized {
    /// The Arrow type of the column.
    fn data_type() -> DataType;

    /// Reads the non-null value at `row`.
    fn read(array: &dyn Array, row: usize) -> Result<Self, ValueError>;

    /// Appends `value` to a builder created for [`data_type`](Self::data_type).
    fn append(builder: &mut dyn ArrayBuilder, value: Self) -> Result<(), ValueError>;
}

fn downcast_array<A: Array + 'static>(array: &dyn Array) -> Result<&A, ValueError> {
    array
        .as_any()
        .downcast_ref::<A>()
        .ok_or(ValueError::WrongType)
}

fn downcast_builder<B: ArrayBuilder>(builder: &mut dyn ArrayBuilder) -> Result<&mut B, ValueError> {
    builder
        .as_any_mut()
        .downcast_mut::<B>()
        .ok_or(ValueError::WrongType)
}

macro_rules! impl_arrow_value {
    ($($ty:ty => $data_type:expr, $array:ty, $builder:ty;)+) => {
        $(
            impl ArrowValue for $ty {
                fn data_type() -> DataType {
                    $data_type
                }

                fn read(array: &dyn Array, row: usize) -> Result<Self, ValueError> {
                    Ok(downcast_array::<$array>(array)?.value(row))
                }

                fn append(builder: &mut dyn ArrayBuilder, value: Self) -> Result<(), ValueError> {
                    downcast_builder::<$builder>(builder)?.append_value(value);
                    Ok(())
                }
            }
        )+
    };
}

impl_arrow_value! {
    bool => DataType::Boolean, BooleanArray, BooleanBuilder;
    i8 => DataType::Int8, Int8Array, Int8Builder;
    i16 => DataType::Int16, Int16Array, Int16Builder;
    i32 => DataType::Int32, Int32Array, Int32Builder;
    i64 => DataType::Int64, Int64Array, Int64Builder;
    u8 => DataType::UInt8, UInt8Array, UInt8Builder;
    u16 => DataType::UInt16, UInt16Array, UInt16Builder;
    u32 => DataType::UInt32, UInt32Array, UInt32Builder;
    u64 => DataType::UInt64, UInt64Array, UInt64Builder;
    f32 => DataType::Float32, Float32Array, Float32Builder;
    f64 => DataType::Float64, Float64Array, Float64Builder;
}

impl ArrowValue for char {
    fn data_type() -> DataType {
        DataType::UInt32
    }

    fn read(array: &dyn Array, row: usize) -> Result<Self, ValueError> {
        let code = downcast_array::<UInt32Array>(array)?.value(row);
        char::from_u32(code)
            .ok_or_else(|| ValueError::Invalid(format!("{code:#x} is not a char")))
    }

    fn append(builder: &mut dyn ArrayBuilder, value: Self) -> Result<(), ValueError> {
        downcast_builder::<UInt32Builder>(builder)?.append_value(u32::from(value));
        Ok(())
    }
}

impl ArrowValue for String {
    fn data_type() -> DataType {
        DataType::Utf8
    }

    fn read(array: &dyn Array, row: usize) -> Result<Self, ValueError> {
        Ok(downcast_array::<StringArray>(array)?.value(row).to_string())
    }

    fn append(builder: &mut dyn ArrayBuilder, value: Self) -> Result<(), ValueError> {
        downcast_builder::<StringBuilder>(builder)?.append_value(value);
        Ok(())
    }
}

impl ArrowValue for NaiveDate {
    fn data_type() -> DataType {
        DataType::Date32
    }

    fn read(array: &dyn Array, row: usize) -> Result<Self, ValueError> {
        let days = downcast_array::<Date32Array>(array)?.value(row);
        days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| ValueError::Invalid(format!("date {days} days from epoch out of range")))
    }

    fn append(builder: &mut dyn ArrayBuilder, value: Self) -> Result<(), ValueError> {
        let days = value.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE;
        downcast_builder::<Date32Builder>(builder)?.append_value(days);
        Ok(())
    }
}

impl ArrowValue for NaiveDateTime {
    fn data_type() -> DataType {
        DataType::Timestamp(TimeUnit::Microsecond, None)
    }

    fn read(array: &dyn Array, row: usize) -> Result<Self, ValueError> {
        let micros = downcast_array::<TimestampMicrosecondArray>(array)?.value(row);
        DateTime::from_timestamp_micros(micros)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| ValueError::Invalid(format!("timestamp {micros}us out of range")))
    }

    fn append(builder: &mut dyn ArrayBuilder, value: Self) -> Result<(), ValueError> {
        let builder = downcast_builder::<TimestampMicrosecondBuilder>(builder)?;
        check_micros(value.nanosecond(), &value)?;
        builder.append_value(value.and_utc().timestamp_micros());
        Ok(())
    }
}

impl ArrowValue for NaiveTime {
    fn data_type() -> DataType {
        DataType::Time64(TimeUnit::Microsecond)
    }

    fn read(array: &dyn Array, row: usize) -> Result<Self, ValueError> {
        let micros = downcast_array::<Time64MicrosecondArray>(array)?.value(row);
        let secs = u32::try_from(micros / MICROS_PER_SECOND).ok();
        let nanos = u32::try_from(micros % MICROS_PER_SECOND * 1_000).ok();
        secs.zip(nanos)
            .and_then(|(secs, nanos)| NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos))
            .ok_or_else(|| ValueError::Invalid(format!("time {micros}us out of range")))
    }

    fn append(builder: &mut dyn ArrayBuilder, value: Self) -> Result<(), ValueError> {
        let builder = downcast_builder::<Time64MicrosecondBuilder>(builder)?;
        check_micros(value.nanosecond(), &value)?;
        let micros = i64::from(value.num_seconds_from_midnight()) * MICROS_PER_SECOND
            + i64::from(value.nanosecond() / 1_000);
        builder.append_value(micros);
        Ok(())
    }
}

/// Rejects sub-microsecond precision and leap seconds, which a microsecond
/// column cannot hold.
fn check_micros(nanos: u32, value: &dyn std::fmt::Display) -> Result<(), ValueError> {
    if nanos >= 1_000_000_000 {
        return Err(ValueError::Invalid(format!("leap second {value} is not representable")));
    }
    if nanos % 1_000 != 0 {
        return Err(ValueError::Invalid(format!("{value} has sub-microsecond precision")));
    }
    Ok(())
}

/// Appends a null to any builder the writer can create.
pub(crate) fn append_null(builder: &mut dyn ArrayBuilder) -> Result<(), ValueError> {
    macro_rules! try_append_null {
        ($($builder:ty),+) => {
            $(
                if let Some(b) = builder.as_any_mut().downcast_mut::<$builder>() {
                    b.append_null();
                    return Ok(());
                }
            )+
        };
    }

    try_append_null!(
        BooleanBuilder,
        Int8Builder,
        Int16Builder,
        Int32Builder,
        Int64Builder,
        UInt8Builder,
        UInt16Builder,
        UInt32Builder,
        UInt64Builder,
        Float32Builder,
        Float64Builder,
        StringBuilder,
        Date32Builder,
        TimestampMicrosecondBuilder,
        Time64MicrosecondBuilder
    );
    Err(ValueError::WrongType)
}

/// Returns `true` if the writer can build a column of this type.
pub(crate) fn is_supported(data_type: &DataType) -> bool {
    matches!(
        data_type,
        DataType::Boolean
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
            | DataType::Utf8
            | DataType::Date32
            | DataType::Timestamp(TimeUnit::Microsecond, None)
            | DataType::Time64(TimeUnit::Microsecond)
    )
}
