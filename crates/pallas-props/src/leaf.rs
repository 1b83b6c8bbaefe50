//! Leaf extractors and injectors over [`Properties`].
//!
//! Every leaf is keyed by property name (`Key = str`). Reading a key that is
//! not present fails with [`PropertyError::Missing`], which
//! [`optional`](pallas_core::KeyedExtractor::optional) turns into `None`.
//! Injectors take the map by value and return it updated.

use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;

use pallas_core::{Bound, KeyedExtractor, KeyedInjector};

use crate::error::PropertyError;
use crate::properties::Properties;
use crate::value::PropertyValue;

/// Reads a typed value by name. See [`get`].
pub struct Get<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Get<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Get<T> {}

impl<T> std::fmt::Debug for Get<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Get")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: PropertyValue> KeyedExtractor<Properties> for Get<T> {
    type Key = str;
    type Output = T;
    type Error = PropertyError;

    fn extract_key(&self, ctx: &Properties, key: &str) -> Result<T, PropertyError> {
        let raw = ctx.get(key).ok_or_else(|| PropertyError::missing(key))?;
        T::parse_property(raw).map_err(|reason| PropertyError::parse(key, raw, T::TYPE_NAME, reason))
    }
}

/// Creates an extractor of `T` by property name.
pub fn get<T: PropertyValue>() -> Get<T> {
    Get {
        _marker: PhantomData,
    }
}

/// Reads property `name` as `T`.
///
/// # Example
///
/// ```
/// use pallas_core::Extractor;
/// use pallas_props::{property, Properties};
///
/// let props: Properties = [("port", "8080")].into_iter().collect();
/// assert_eq!(property::<u16>("port").extract(&props).unwrap(), 8080);
/// ```
pub fn property<T: PropertyValue>(name: impl Into<String>) -> Bound<Get<T>, String> {
    get::<T>().bind(name.into())
}

/// Writes a typed value by name. See [`set`].
pub struct Set<T> {
    _marker: PhantomData<fn(T)>,
}

impl<T> Clone for Set<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Set<T> {}

impl<T> std::fmt::Debug for Set<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Set")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: PropertyValue> KeyedInjector<Properties, T> for Set<T> {
    type Key = str;
    type Error = PropertyError;

    fn inject_key(
        &self,
        mut ctx: Properties,
        key: &str,
        value: T,
    ) -> Result<Properties, PropertyError> {
        ctx.set(key, value.format_property());
        Ok(ctx)
    }
}

/// Creates an injector of `T` by property name.
///
/// # Example
///
/// ```
/// use pallas_core::{Injector, KeyedInjector};
/// use pallas_props::{set, Properties};
///
/// let threads = set::<i32>().optional().bind("numThreads");
/// let props = threads.inject(Properties::new(), None).unwrap();
/// assert!(props.is_empty());
///
/// let props = threads.inject(props, Some(4)).unwrap();
/// assert_eq!(props.get("numThreads"), Some("4"));
/// ```
pub fn set<T: PropertyValue>() -> Set<T> {
    Set {
        _marker: PhantomData,
    }
}

/// Writes `T` to property `name`.
pub fn assign<T: PropertyValue>(name: impl Into<String>) -> Bound<Set<T>, String> {
    set::<T>().bind(name.into())
}

/// Reads any [`FromStr`] type by name. See [`parsed`].
pub struct Parsed<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> KeyedExtractor<Properties> for Parsed<T>
where
    T: FromStr,
    T::Err: Display,
{
    type Key = str;
    type Output = T;
    type Error = PropertyError;

    fn extract_key(&self, ctx: &Properties, key: &str) -> Result<T, PropertyError> {
        let raw = ctx.get(key).ok_or_else(|| PropertyError::missing(key))?;
        raw.parse::<T>().map_err(|e| {
            PropertyError::parse(key, raw, std::any::type_name::<T>(), e.to_string())
        })
    }
}

/// Creates an extractor for a type parsed with [`FromStr`].
pub fn parsed<T: FromStr>() -> Parsed<T> {
    Parsed {
        _marker: PhantomData,
    }
}

/// Writes any [`Display`] type by name. See [`displayed`].
pub struct Displayed<T> {
    _marker: PhantomData<fn(T)>,
}

impl<T: Display> KeyedInjector<Properties, T> for Displayed<T> {
    type Key = str;
    type Error = PropertyError;

    fn inject_key(
        &self,
        mut ctx: Properties,
        key: &str,
        value: T,
    ) -> Result<Properties, PropertyError> {
        ctx.set(key, value.to_string());
        Ok(ctx)
    }
}

/// Creates an injector for a type rendered with [`Display`].
pub fn displayed<T: Display>() -> Displayed<T> {
    Displayed {
        _marker: PhantomData,
    }
}

/// Removes a key. Use with `optional_with` to clear stale values on `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unset;

impl KeyedInjector<Properties, ()> for Unset {
    type Key = str;
    type Error = PropertyError;

    fn inject_key(
        &self,
        mut ctx: Properties,
        key: &str,
        (): (),
    ) -> Result<Properties, PropertyError> {
        ctx.remove(key);
        Ok(ctx)
    }
}

/// Creates an injector that removes the key.
pub fn unset() -> Unset {
    Unset
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pallas_core::{Absence, Extractor, Injector};
    use std::net::Ipv4Addr;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_get_parses() {
        let ctx = props(&[("endDate", "2021-04-19")]);
        assert_eq!(
            property::<NaiveDate>("endDate").extract(&ctx).unwrap(),
            NaiveDate::from_ymd_opt(2021, 4, 19).unwrap()
        );
    }

    #[test]
    fn test_missing_and_parse_failures_differ() {
        let ctx = props(&[("numThreads", "four")]);

        let missing = property::<i32>("workers").extract(&ctx).unwrap_err();
        assert!(missing.is_absent());

        let bad = property::<i32>("numThreads").extract(&ctx).unwrap_err();
        assert!(matches!(bad, PropertyError::Parse { target: "i32", .. }));
    }

    #[test]
    fn test_optional_keeps_zero() {
        let threads = get::<i32>().optional().bind("numThreads");
        assert_eq!(threads.extract(&props(&[("numThreads", "0")])).unwrap(), Some(0));
        assert_eq!(threads.extract(&props(&[])).unwrap(), None);
        assert!(threads.extract(&props(&[("numThreads", "x")])).is_err());
    }

    #[test]
    fn test_set_returns_updated_map() {
        let ctx = assign::<i64>("count").inject(Properties::new(), 3).unwrap();
        let ctx = assign::<bool>("debug").inject(ctx, true).unwrap();
        assert_eq!(ctx.get("count"), Some("3"));
        assert_eq!(ctx.get("debug"), Some("true"));
    }

    #[test]
    fn test_optional_set_skips_none() {
        let threads = set::<i32>().optional().bind("numThreads");
        let ctx = threads.inject(props(&[("env", "DEV")]), None).unwrap();
        assert_eq!(ctx.len(), 1);
        assert!(!ctx.contains_key("numThreads"));

        let ctx = threads.inject(ctx, Some(0)).unwrap();
        assert_eq!(ctx.get("numThreads"), Some("0"));
    }

    #[test]
    fn test_optional_with_unset_clears() {
        let ctx = set::<String>()
            .optional_with(unset())
            .bind("env")
            .inject(props(&[("env", "DEV")]), None)
            .unwrap();
        assert!(!ctx.contains_key("env"));
    }

    #[test]
    fn test_parsed_and_displayed() {
        let addr = Ipv4Addr::new(10, 0, 0, 1);
        let ctx = displayed::<Ipv4Addr>()
            .bind("host")
            .inject(Properties::new(), addr)
            .unwrap();
        assert_eq!(ctx.get("host"), Some("10.0.0.1"));
        assert_eq!(parsed::<Ipv4Addr>().bind("host").extract(&ctx).unwrap(), addr);
    }
}
