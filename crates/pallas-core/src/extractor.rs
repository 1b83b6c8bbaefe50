//! Core extractor trait.
//!
//! The [`Extractor`] trait is the foundation of the read side. An extractor
//! is an immutable function from a borrowed context to a value; it may fail
//! with its declared `Error` type. Extractors that cannot fail use
//! [`Infallible`] and gain the [`InfallibleExtractor::get`] shorthand.
//!
//! # Example
//!
//! ```rust
//! use pallas_core::{extractor, Extractor, InfallibleExtractor};
//!
//! struct Row {
//!     id: i64,
//!     name: String,
//! }
//!
//! let id = extractor::infallible(|row: &Row| row.id);
//! let name = extractor::infallible(|row: &Row| row.name.clone());
//!
//! let label = (id, name).map(|(id, name)| format!("{id}:{name}"));
//!
//! let row = Row { id: 7, name: "seven".into() };
//! assert_eq!(label.get(&row), "7:seven");
//! ```

use std::convert::Infallible;
use std::marker::PhantomData;

use crate::adapt::{ErrInto, Fallible, FlatMap, Map, MapErr, Optional, TryMap, Unchecked};
use crate::Absence;

/// A function that reads a typed value out of a context.
///
/// One signature covers both the checked form (any `Error`) and the
/// unchecked form (`Error = Infallible`). The context is only borrowed;
/// extractors never own or dispose of it.
///
/// # Implementing `Extractor`
///
/// ```rust
/// use pallas_core::{Error, Extractor};
/// use std::collections::HashMap;
///
/// struct Port;
///
/// impl Extractor<HashMap<String, String>> for Port {
///     type Output = u16;
///     type Error = Error;
///
///     fn extract(&self, ctx: &HashMap<String, String>) -> Result<u16, Error> {
///         let raw = ctx.get("port").ok_or_else(|| Error::missing("port"))?;
///         raw.parse()
///             .map_err(|e: std::num::ParseIntError| Error::parse("port", raw, "u16", e.to_string()))
///     }
/// }
///
/// let mut ctx = HashMap::new();
/// ctx.insert("port".to_string(), "8080".to_string());
/// assert_eq!(Port.extract(&ctx).unwrap(), 8080);
/// ```
pub trait Extractor<C: ?Sized> {
    /// The extracted value.
    type Output;

    /// The declared failure.
    type Error;

    /// Reads a value from `ctx`.
    fn extract(&self, ctx: &C) -> Result<Self::Output, Self::Error>;

    /// Applies `f` to the extracted value.
    ///
    /// The base extractor runs exactly once per call.
    fn map<F, U>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map::new(self, f)
    }

    /// Applies a fallible conversion to the extracted value.
    fn try_map<F, U>(self, f: F) -> TryMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Result<U, Self::Error>,
    {
        TryMap::new(self, f)
    }

    /// Uses the extracted value to choose a second extractor, then runs it
    /// against the same context.
    fn flat_map<F, X>(self, f: F) -> FlatMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> X,
        X: Extractor<C, Error = Self::Error>,
    {
        FlatMap::new(self, f)
    }

    /// Turns an absent value into `None`.
    ///
    /// Only errors for which [`Absence::is_absent`] holds are converted;
    /// every other failure still propagates.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
        Self::Error: Absence,
    {
        Optional::new(self)
    }

    /// Transforms the declared error.
    fn map_err<F, E>(self, f: F) -> MapErr<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Error) -> E,
    {
        MapErr::new(self, f)
    }

    /// Converts the declared error with [`Into`].
    fn err_into<E>(self) -> ErrInto<Self, E>
    where
        Self: Sized,
        Self::Error: Into<E>,
    {
        ErrInto::new(self)
    }

    /// Widens an infallible extractor to any declared error type, so it can be
    /// combined with fallible ones.
    fn fallible<E>(self) -> Fallible<Self, E>
    where
        Self: Sized + Extractor<C, Error = Infallible>,
    {
        Fallible::new(self)
    }

    /// Erases the declared error.
    ///
    /// A failure is raised as an [`UncheckedError`](crate::UncheckedError)
    /// carrying the original error as its cause.
    fn unchecked(self) -> Unchecked<Self>
    where
        Self: Sized,
        Self::Error: std::error::Error + Send + Sync + 'static,
    {
        Unchecked::new(self)
    }

    /// Borrows this extractor, so it can be combined without being consumed.
    fn by_ref(&self) -> &Self
    where
        Self: Sized,
    {
        self
    }

    /// Boxes this extractor behind a trait object.
    fn boxed<'a>(self) -> BoxExtractor<'a, C, Self::Output, Self::Error>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

/// A type-erased extractor.
pub type BoxExtractor<'a, C, T, E> = Box<dyn Extractor<C, Output = T, Error = E> + 'a>;

impl<C: ?Sized, X: Extractor<C> + ?Sized> Extractor<C> for &X {
    type Output = X::Output;
    type Error = X::Error;

    fn extract(&self, ctx: &C) -> Result<Self::Output, Self::Error> {
        (**self).extract(ctx)
    }
}

impl<C: ?Sized, X: Extractor<C> + ?Sized> Extractor<C> for Box<X> {
    type Output = X::Output;
    type Error = X::Error;

    fn extract(&self, ctx: &C) -> Result<Self::Output, Self::Error> {
        (**self).extract(ctx)
    }
}

/// Shorthand for extractors that cannot fail.
pub trait InfallibleExtractor<C: ?Sized>: Extractor<C, Error = Infallible> {
    /// Reads a value from `ctx`.
    fn get(&self, ctx: &C) -> Self::Output {
        match self.extract(ctx) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }
}

impl<C: ?Sized, X: Extractor<C, Error = Infallible> + ?Sized> InfallibleExtractor<C> for X {}

/// Extractor built from a fallible closure. See [`from_fn`].
pub struct FromFn<F, T, E> {
    f: F,
    _marker: PhantomData<fn() -> (T, E)>,
}

impl<F: Clone, T, E> Clone for FromFn<F, T, E> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<C: ?Sized, T, E, F> Extractor<C> for FromFn<F, T, E>
where
    F: Fn(&C) -> Result<T, E>,
{
    type Output = T;
    type Error = E;

    fn extract(&self, ctx: &C) -> Result<T, E> {
        (self.f)(ctx)
    }
}

/// Creates a checked extractor from a closure.
///
/// ```rust
/// use pallas_core::{extractor, Extractor};
///
/// let first = extractor::from_fn(|ctx: &Vec<i32>| ctx.first().copied().ok_or("empty"));
/// assert_eq!(first.extract(&vec![3, 4]), Ok(3));
/// assert_eq!(first.extract(&vec![]), Err("empty"));
/// ```
pub fn from_fn<C: ?Sized, T, E, F>(f: F) -> FromFn<F, T, E>
where
    F: Fn(&C) -> Result<T, E>,
{
    FromFn {
        f,
        _marker: PhantomData,
    }
}

/// Extractor built from a total closure. See [`infallible`].
pub struct InfallibleFn<F, T> {
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<F: Clone, T> Clone for InfallibleFn<F, T> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<C: ?Sized, T, F> Extractor<C> for InfallibleFn<F, T>
where
    F: Fn(&C) -> T,
{
    type Output = T;
    type Error = Infallible;

    fn extract(&self, ctx: &C) -> Result<T, Infallible> {
        Ok((self.f)(ctx))
    }
}

/// Creates an extractor that cannot fail.
pub fn infallible<C: ?Sized, T, F>(f: F) -> InfallibleFn<F, T>
where
    F: Fn(&C) -> T,
{
    InfallibleFn {
        f,
        _marker: PhantomData,
    }
}

/// Extractor that ignores the context and yields a clone of a fixed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constant<T>(pub T);

impl<C: ?Sized, T: Clone> Extractor<C> for Constant<T> {
    type Output = T;
    type Error = Infallible;

    fn extract(&self, _ctx: &C) -> Result<T, Infallible> {
        Ok(self.0.clone())
    }
}

/// Creates an extractor that always yields `value`.
pub fn constant<T: Clone>(value: T) -> Constant<T> {
    Constant(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn length() -> impl Extractor<String, Output = usize, Error = Infallible> {
        infallible(|s: &String| s.len())
    }

    #[test]
    fn test_basic_extraction() {
        let ctx = "hello".to_string();
        assert_eq!(length().get(&ctx), 5);
    }

    #[test]
    fn test_from_fn_propagates_error() {
        let ex = from_fn(|s: &String| -> Result<u8, Error> {
            s.parse().map_err(|_| Error::parse("input", s.as_str(), "u8", "not a byte"))
        });

        assert_eq!(ex.extract(&"12".to_string()), Ok(12));
        assert!(matches!(
            ex.extract(&"x".to_string()),
            Err(Error::Parse { .. })
        ));
    }

    #[test]
    fn test_constant_ignores_context() {
        let ex = constant("fixed");
        assert_eq!(Extractor::<()>::extract(&ex, &()), Ok("fixed"));
        assert_eq!(Extractor::<str>::extract(&ex, "anything"), Ok("fixed"));
    }

    #[test]
    fn test_reference_and_box_delegate() {
        let ex = length();
        let ctx = "abc".to_string();
        assert_eq!(ex.by_ref().get(&ctx), 3);

        let boxed = length().boxed();
        assert_eq!(boxed.get(&ctx), 3);
    }

    #[test]
    fn test_map_err_and_err_into() {
        let failing = from_fn(|_: &()| -> Result<(), &'static str> { Err("nope") });
        let mapped = failing.map_err(|e| e.len());
        assert_eq!(mapped.extract(&()), Err(4));

        let widened = from_fn(|_: &()| -> Result<(), u8> { Err(7) }).err_into::<u32>();
        assert_eq!(widened.extract(&()), Err(7_u32));
    }

    #[test]
    fn test_fallible_widens_infallible() {
        let ex = infallible(|n: &i32| n * 2).fallible::<Error>();
        let result: Result<i32, Error> = ex.extract(&21);
        assert_eq!(result, Ok(42));
    }
}
