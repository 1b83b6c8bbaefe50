//! By-index and by-name extractors and injectors.
//!
//! Many contexts are addressed rather than self-contained: a result row is
//! read by column position or label, a prepared statement is bound by
//! parameter number or name, a property map is looked up by key. The keyed
//! traits take that address as an extra argument. [`KeyedExtractor::bind`]
//! and [`KeyedInjector::bind`] close over a key and produce a plain
//! [`Extractor`] or [`Injector`]; they are the only bridge between the two
//! families.
//!
//! Each keyed type has exactly one key kind, declared by its `Key`
//! associated type. By-index families use `usize`, by-name families use
//! `str`. Whether an index is zero- or one-based is backend-native and
//! documented by each backend.
//!
//! # Example
//!
//! ```rust
//! use pallas_core::{keyed, Extractor, KeyedExtractor};
//!
//! let cell = keyed::extractor_from_fn(|row: &Vec<i64>, index: &usize| {
//!     row.get(*index).copied().ok_or(pallas_core::Error::missing(index.to_string()))
//! });
//!
//! let second = cell.bind(1_usize);
//! assert_eq!(second.extract(&vec![10, 20, 30]).unwrap(), 20);
//! ```

use std::borrow::Borrow;
use std::convert::Infallible;
use std::marker::PhantomData;

use crate::adapt::{
    ErrInto, Fallible, Map, MapErr, Optional, OptionalWith, Premap, TryMap, TryPremap, Unchecked,
};
use crate::{Absence, Extractor, Injector};

/// An extractor that also takes a key (a column index, a field name).
pub trait KeyedExtractor<C: ?Sized> {
    /// The key kind, `usize` for positional access and `str` for names.
    type Key: ?Sized;

    /// The extracted value.
    type Output;

    /// The declared failure.
    type Error;

    /// Reads the value stored under `key` in `ctx`.
    fn extract_key(&self, ctx: &C, key: &Self::Key) -> Result<Self::Output, Self::Error>;

    /// Fixes the key, producing a plain [`Extractor`].
    fn bind<Q>(self, key: Q) -> Bound<Self, Q>
    where
        Self: Sized,
        Q: Borrow<Self::Key>,
    {
        Bound::new(self, key)
    }

    /// Applies `f` to the extracted value.
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

    /// Turns an absent value into `None`.
    ///
    /// A present value that happens to equal the type's default (for
    /// example `0`) stays `Some`; only the backend's absence signal maps to
    /// `None`.
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

    /// Widens an infallible extractor to any declared error type.
    fn fallible<E>(self) -> Fallible<Self, E>
    where
        Self: Sized + KeyedExtractor<C, Error = Infallible>,
    {
        Fallible::new(self)
    }

    /// Erases the declared error. See [`Extractor::unchecked`].
    fn unchecked(self) -> Unchecked<Self>
    where
        Self: Sized,
        Self::Error: std::error::Error + Send + Sync + 'static,
    {
        Unchecked::new(self)
    }
}

impl<C: ?Sized, X: KeyedExtractor<C> + ?Sized> KeyedExtractor<C> for &X {
    type Key = X::Key;
    type Output = X::Output;
    type Error = X::Error;

    fn extract_key(&self, ctx: &C, key: &Self::Key) -> Result<Self::Output, Self::Error> {
        (**self).extract_key(ctx, key)
    }
}

impl<C: ?Sized, X: KeyedExtractor<C> + ?Sized> KeyedExtractor<C> for Box<X> {
    type Key = X::Key;
    type Output = X::Output;
    type Error = X::Error;

    fn extract_key(&self, ctx: &C, key: &Self::Key) -> Result<Self::Output, Self::Error> {
        (**self).extract_key(ctx, key)
    }
}

/// An injector that also takes a key (a parameter index, a field name).
pub trait KeyedInjector<C, T> {
    /// The key kind, `usize` for positional access and `str` for names.
    type Key: ?Sized;

    /// The declared failure.
    type Error;

    /// Writes `value` under `key` in `ctx` and returns the updated context.
    fn inject_key(&self, ctx: C, key: &Self::Key, value: T) -> Result<C, Self::Error>;

    /// Fixes the key, producing a plain [`Injector`].
    fn bind<Q>(self, key: Q) -> Bound<Self, Q>
    where
        Self: Sized,
        Q: Borrow<Self::Key>,
    {
        Bound::new(self, key)
    }

    /// Builds an injector for `U` by converting each value with `f` first.
    fn premap<F, U>(self, f: F) -> Premap<Self, F, T>
    where
        Self: Sized,
        F: Fn(U) -> T,
    {
        Premap::new(self, f)
    }

    /// Like [`premap`](Self::premap) with a fallible conversion.
    fn try_premap<F, U>(self, f: F) -> TryPremap<Self, F, T>
    where
        Self: Sized,
        F: Fn(U) -> Result<T, Self::Error>,
    {
        TryPremap::new(self, f)
    }

    /// Accepts `Option<T>`, skipping the write for `None`.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional::new(self)
    }

    /// Accepts `Option<T>`, delegating `None` to `absent` under the same key.
    fn optional_with<N>(self, absent: N) -> OptionalWith<Self, N>
    where
        Self: Sized,
        N: KeyedInjector<C, (), Key = Self::Key, Error = Self::Error>,
    {
        OptionalWith::new(self, absent)
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

    /// Widens an infallible injector to any declared error type.
    fn fallible<E>(self) -> Fallible<Self, E>
    where
        Self: Sized + KeyedInjector<C, T, Error = Infallible>,
    {
        Fallible::new(self)
    }

    /// Erases the declared error. See [`Extractor::unchecked`].
    fn unchecked(self) -> Unchecked<Self>
    where
        Self: Sized,
        Self::Error: std::error::Error + Send + Sync + 'static,
    {
        Unchecked::new(self)
    }
}

impl<C, T, I: KeyedInjector<C, T> + ?Sized> KeyedInjector<C, T> for &I {
    type Key = I::Key;
    type Error = I::Error;

    fn inject_key(&self, ctx: C, key: &Self::Key, value: T) -> Result<C, Self::Error> {
        (**self).inject_key(ctx, key, value)
    }
}

impl<C, T, I: KeyedInjector<C, T> + ?Sized> KeyedInjector<C, T> for Box<I> {
    type Key = I::Key;
    type Error = I::Error;

    fn inject_key(&self, ctx: C, key: &Self::Key, value: T) -> Result<C, Self::Error> {
        (**self).inject_key(ctx, key, value)
    }
}

/// Extractor addressed by position.
pub trait ExtractorByIndex<C: ?Sized>: KeyedExtractor<C, Key = usize> {}

impl<C: ?Sized, X: KeyedExtractor<C, Key = usize> + ?Sized> ExtractorByIndex<C> for X {}

/// Extractor addressed by name.
pub trait ExtractorByName<C: ?Sized>: KeyedExtractor<C, Key = str> {}

impl<C: ?Sized, X: KeyedExtractor<C, Key = str> + ?Sized> ExtractorByName<C> for X {}

/// Injector addressed by position.
pub trait InjectorByIndex<C, T>: KeyedInjector<C, T, Key = usize> {}

impl<C, T, I: KeyedInjector<C, T, Key = usize> + ?Sized> InjectorByIndex<C, T> for I {}

/// Injector addressed by name.
pub trait InjectorByName<C, T>: KeyedInjector<C, T, Key = str> {}

impl<C, T, I: KeyedInjector<C, T, Key = str> + ?Sized> InjectorByName<C, T> for I {}

/// A keyed extractor or injector with its key fixed.
///
/// Created by [`KeyedExtractor::bind`] and [`KeyedInjector::bind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bound<X, Q> {
    inner: X,
    key: Q,
}

impl<X, Q> Bound<X, Q> {
    pub(crate) fn new(inner: X, key: Q) -> Self {
        Self { inner, key }
    }

    /// Returns the bound key.
    pub fn key(&self) -> &Q {
        &self.key
    }

    /// Returns the unbound keyed function.
    pub fn into_inner(self) -> X {
        self.inner
    }
}

impl<C: ?Sized, X, Q> Extractor<C> for Bound<X, Q>
where
    X: KeyedExtractor<C>,
    Q: Borrow<X::Key>,
{
    type Output = X::Output;
    type Error = X::Error;

    fn extract(&self, ctx: &C) -> Result<Self::Output, Self::Error> {
        self.inner.extract_key(ctx, self.key.borrow())
    }
}

impl<C, T, I, Q> Injector<C, T> for Bound<I, Q>
where
    I: KeyedInjector<C, T>,
    Q: Borrow<I::Key>,
{
    type Error = I::Error;

    fn inject(&self, ctx: C, value: T) -> Result<C, Self::Error> {
        self.inner.inject_key(ctx, self.key.borrow(), value)
    }
}

/// Keyed extractor built from a closure. See [`extractor_from_fn`].
pub struct ExtractorFn<F, K: ?Sized, T, E> {
    f: F,
    _marker: PhantomData<fn(&K) -> (T, E)>,
}

impl<C: ?Sized, K: ?Sized, T, E, F> KeyedExtractor<C> for ExtractorFn<F, K, T, E>
where
    F: Fn(&C, &K) -> Result<T, E>,
{
    type Key = K;
    type Output = T;
    type Error = E;

    fn extract_key(&self, ctx: &C, key: &K) -> Result<T, E> {
        (self.f)(ctx, key)
    }
}

/// Creates a keyed extractor from a closure.
pub fn extractor_from_fn<C: ?Sized, K: ?Sized, T, E, F>(f: F) -> ExtractorFn<F, K, T, E>
where
    F: Fn(&C, &K) -> Result<T, E>,
{
    ExtractorFn {
        f,
        _marker: PhantomData,
    }
}

/// Keyed injector built from a closure. See [`injector_from_fn`].
pub struct InjectorFn<F, K: ?Sized, E> {
    f: F,
    _marker: PhantomData<fn(&K) -> E>,
}

impl<C, T, K: ?Sized, E, F> KeyedInjector<C, T> for InjectorFn<F, K, E>
where
    F: Fn(C, &K, T) -> Result<C, E>,
{
    type Key = K;
    type Error = E;

    fn inject_key(&self, ctx: C, key: &K, value: T) -> Result<C, E> {
        (self.f)(ctx, key, value)
    }
}

/// Creates a keyed injector from a closure.
pub fn injector_from_fn<C, K: ?Sized, T, E, F>(f: F) -> InjectorFn<F, K, E>
where
    F: Fn(C, &K, T) -> Result<C, E>,
{
    InjectorFn {
        f,
        _marker: PhantomData,
    }
}
