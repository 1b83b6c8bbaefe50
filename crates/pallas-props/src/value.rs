//! Conversions between property strings and typed values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// A type that can be stored as a property string.
///
/// Implemented for `bool`, every integer width, `f32`, `f64`, `char`,
/// `String` and the chrono date and time types. Use
/// [`parsed`](crate::parsed) and [`displayed`](crate::displayed) for other
/// `FromStr` and `Display` types.
pub trait PropertyValue: Sized {
    /// Name used in parse errors.
    const TYPE_NAME: &'static str;

    /// Parses the stored string.
    fn parse_property(raw: &str) -> Result<Self, String>;

    /// Renders the value for storage.
    fn format_property(&self) -> String;
}

macro_rules! impl_property_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl PropertyValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn parse_property(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }

                fn format_property(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

impl_property_value!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_property_value!(f32, f64, char, String);

/// Accepts `true` and `false` in any ASCII case.
impl PropertyValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn parse_property(raw: &str) -> Result<Self, String> {
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err("expected true or false".to_string())
        }
    }

    fn format_property(&self) -> String {
        self.to_string()
    }
}

/// ISO 8601 calendar date, `2021-04-19`.
impl PropertyValue for NaiveDate {
    const TYPE_NAME: &'static str = "NaiveDate";

    fn parse_property(raw: &str) -> Result<Self, String> {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| e.to_string())
    }

    fn format_property(&self) -> String {
        self.format("%Y-%m-%d").to_string()
    }
}

/// `HH:MM:SS` with optional fractional seconds.
impl PropertyValue for NaiveTime {
    const TYPE_NAME: &'static str = "NaiveTime";

    fn parse_property(raw: &str) -> Result<Self, String> {
        raw.parse::<NaiveTime>().map_err(|e| e.to_string())
    }

    fn format_property(&self) -> String {
        self.format("%H:%M:%S%.f").to_string()
    }
}

/// ISO 8601 local date-time, `2021-04-19T10:15:30`.
impl PropertyValue for NaiveDateTime {
    const TYPE_NAME: &'static str = "NaiveDateTime";

    fn parse_property(raw: &str) -> Result<Self, String> {
        raw.parse::<NaiveDateTime>().map_err(|e| e.to_string())
    }

    fn format_property(&self) -> String {
        self.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
    }
}

/// RFC 3339 timestamp, normalised to UTC.
impl PropertyValue for DateTime<Utc> {
    const TYPE_NAME: &'static str = "DateTime<Utc>";

    fn parse_property(raw: &str) -> Result<Self, String> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| e.to_string())
    }

    fn format_property(&self) -> String {
        self.to_rfc3339()
    }
}
