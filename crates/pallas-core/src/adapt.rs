//! Adapter types returned by the combinator methods.
//!
//! Every adapter wraps an inner extractor or injector and implements the same
//! family as the value it wraps: an adapter around a plain [`Extractor`] is a
//! plain extractor, an adapter around a [`KeyedExtractor`] stays keyed, and
//! so on. None of them hold state beyond the wrapped value and the supplied
//! function.

use std::convert::Infallible;
use std::marker::PhantomData;

use crate::error::raise;
use crate::{Absence, Extractor, Injector, KeyedExtractor, KeyedInjector};

/// Applies a function to an extracted value. See [`Extractor::map`].
#[derive(Debug, Clone, Copy)]
pub struct Map<X, F> {
    inner: X,
    f: F,
}

impl<X, F> Map<X, F> {
    pub(crate) fn new(inner: X, f: F) -> Self {
        Self { inner, f }
    }
}

impl<C: ?Sized, X, F, U> Extractor<C> for Map<X, F>
where
    X: Extractor<C>,
    F: Fn(X::Output) -> U,
{
    type Output = U;
    type Error = X::Error;

    fn extract(&self, ctx: &C) -> Result<U, X::Error> {
        self.inner.extract(ctx).map(&self.f)
    }
}

impl<C: ?Sized, X, F, U> KeyedExtractor<C> for Map<X, F>
where
    X: KeyedExtractor<C>,
    F: Fn(X::Output) -> U,
{
    type Key = X::Key;
    type Output = U;
    type Error = X::Error;

    fn extract_key(&self, ctx: &C, key: &X::Key) -> Result<U, X::Error> {
        self.inner.extract_key(ctx, key).map(&self.f)
    }
}

/// Applies a fallible function to an extracted value. See [`Extractor::try_map`].
#[derive(Debug, Clone, Copy)]
pub struct TryMap<X, F> {
    inner: X,
    f: F,
}

impl<X, F> TryMap<X, F> {
    pub(crate) fn new(inner: X, f: F) -> Self {
        Self { inner, f }
    }
}

impl<C: ?Sized, X, F, U> Extractor<C> for TryMap<X, F>
where
    X: Extractor<C>,
    F: Fn(X::Output) -> Result<U, X::Error>,
{
    type Output = U;
    type Error = X::Error;

    fn extract(&self, ctx: &C) -> Result<U, X::Error> {
        self.inner.extract(ctx).and_then(&self.f)
    }
}

impl<C: ?Sized, X, F, U> KeyedExtractor<C> for TryMap<X, F>
where
    X: KeyedExtractor<C>,
    F: Fn(X::Output) -> Result<U, X::Error>,
{
    type Key = X::Key;
    type Output = U;
    type Error = X::Error;

    fn extract_key(&self, ctx: &C, key: &X::Key) -> Result<U, X::Error> {
        self.inner.extract_key(ctx, key).and_then(&self.f)
    }
}

/// Chooses a second extractor from the first one's result. See [`Extractor::flat_map`].
#[derive(Debug, Clone, Copy)]
pub struct FlatMap<X, F> {
    inner: X,
    f: F,
}

impl<X, F> FlatMap<X, F> {
    pub(crate) fn new(inner: X, f: F) -> Self {
        Self { inner, f }
    }
}

impl<C: ?Sized, X, F, Y> Extractor<C> for FlatMap<X, F>
where
    X: Extractor<C>,
    F: Fn(X::Output) -> Y,
    Y: Extractor<C, Error = X::Error>,
{
    type Output = Y::Output;
    type Error = X::Error;

    fn extract(&self, ctx: &C) -> Result<Y::Output, X::Error> {
        let selector = self.inner.extract(ctx)?;
        (self.f)(selector).extract(ctx)
    }
}

/// Present/absent adaptation.
///
/// Around an extractor, absent values become `None`. Around an injector,
/// `None` skips the write. See [`Extractor::optional`] and
/// [`Injector::optional`].
#[derive(Debug, Clone, Copy)]
pub struct Optional<X> {
    inner: X,
}

impl<X> Optional<X> {
    pub(crate) fn new(inner: X) -> Self {
        Self { inner }
    }
}

fn absent_to_none<T, E: Absence>(result: Result<T, E>) -> Result<Option<T>, E> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_absent() => Ok(None),
        Err(err) => Err(err),
    }
}

impl<C: ?Sized, X> Extractor<C> for Optional<X>
where
    X: Extractor<C>,
    X::Error: Absence,
{
    type Output = Option<X::Output>;
    type Error = X::Error;

    fn extract(&self, ctx: &C) -> Result<Self::Output, X::Error> {
        absent_to_none(self.inner.extract(ctx))
    }
}

impl<C: ?Sized, X> KeyedExtractor<C> for Optional<X>
where
    X: KeyedExtractor<C>,
    X::Error: Absence,
{
    type Key = X::Key;
    type Output = Option<X::Output>;
    type Error = X::Error;

    fn extract_key(&self, ctx: &C, key: &X::Key) -> Result<Self::Output, X::Error> {
        absent_to_none(self.inner.extract_key(ctx, key))
    }
}

impl<C, T, I> Injector<C, Option<T>> for Optional<I>
where
    I: Injector<C, T>,
{
    type Error = I::Error;

    fn inject(&self, ctx: C, value: Option<T>) -> Result<C, I::Error> {
        match value {
            Some(value) => self.inner.inject(ctx, value),
            None => Ok(ctx),
        }
    }
}

impl<C, T, I> KeyedInjector<C, Option<T>> for Optional<I>
where
    I: KeyedInjector<C, T>,
{
    type Key = I::Key;
    type Error = I::Error;

    fn inject_key(&self, ctx: C, key: &I::Key, value: Option<T>) -> Result<C, I::Error> {
        match value {
            Some(value) => self.inner.inject_key(ctx, key, value),
            None => Ok(ctx),
        }
    }
}

/// Optional injection with an explicit null write. See [`Injector::optional_with`].
#[derive(Debug, Clone, Copy)]
pub struct OptionalWith<I, N> {
    inner: I,
    absent: N,
}

impl<I, N> OptionalWith<I, N> {
    pub(crate) fn new(inner: I, absent: N) -> Self {
        Self { inner, absent }
    }
}

impl<C, T, I, N> Injector<C, Option<T>> for OptionalWith<I, N>
where
    I: Injector<C, T>,
    N: Injector<C, (), Error = I::Error>,
{
    type Error = I::Error;

    fn inject(&self, ctx: C, value: Option<T>) -> Result<C, I::Error> {
        match value {
            Some(value) => self.inner.inject(ctx, value),
            None => self.absent.inject(ctx, ()),
        }
    }
}

impl<C, T, I, N> KeyedInjector<C, Option<T>> for OptionalWith<I, N>
where
    I: KeyedInjector<C, T>,
    N: KeyedInjector<C, (), Key = I::Key, Error = I::Error>,
{
    type Key = I::Key;
    type Error = I::Error;

    fn inject_key(&self, ctx: C, key: &I::Key, value: Option<T>) -> Result<C, I::Error> {
        match value {
            Some(value) => self.inner.inject_key(ctx, key, value),
            None => self.absent.inject_key(ctx, key, ()),
        }
    }
}

/// Converts each value before injecting it. See [`Injector::premap`].
pub struct Premap<I, F, T> {
    inner: I,
    f: F,
    _marker: PhantomData<fn(T)>,
}

impl<I, F, T> Premap<I, F, T> {
    pub(crate) fn new(inner: I, f: F) -> Self {
        Self {
            inner,
            f,
            _marker: PhantomData,
        }
    }
}

impl<I: Clone, F: Clone, T> Clone for Premap<I, F, T> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone(), self.f.clone())
    }
}

impl<C, T, U, I, F> Injector<C, U> for Premap<I, F, T>
where
    I: Injector<C, T>,
    F: Fn(U) -> T,
{
    type Error = I::Error;

    fn inject(&self, ctx: C, value: U) -> Result<C, I::Error> {
        self.inner.inject(ctx, (self.f)(value))
    }
}

impl<C, T, U, I, F> KeyedInjector<C, U> for Premap<I, F, T>
where
    I: KeyedInjector<C, T>,
    F: Fn(U) -> T,
{
    type Key = I::Key;
    type Error = I::Error;

    fn inject_key(&self, ctx: C, key: &I::Key, value: U) -> Result<C, I::Error> {
        self.inner.inject_key(ctx, key, (self.f)(value))
    }
}

/// Converts each value with a fallible function before injecting it.
/// See [`Injector::try_premap`].
pub struct TryPremap<I, F, T> {
    inner: I,
    f: F,
    _marker: PhantomData<fn(T)>,
}

impl<I, F, T> TryPremap<I, F, T> {
    pub(crate) fn new(inner: I, f: F) -> Self {
        Self {
            inner,
            f,
            _marker: PhantomData,
        }
    }
}

impl<C, T, U, I, F> Injector<C, U> for TryPremap<I, F, T>
where
    I: Injector<C, T>,
    F: Fn(U) -> Result<T, I::Error>,
{
    type Error = I::Error;

    fn inject(&self, ctx: C, value: U) -> Result<C, I::Error> {
        self.inner.inject(ctx, (self.f)(value)?)
    }
}

impl<C, T, U, I, F> KeyedInjector<C, U> for TryPremap<I, F, T>
where
    I: KeyedInjector<C, T>,
    F: Fn(U) -> Result<T, I::Error>,
{
    type Key = I::Key;
    type Error = I::Error;

    fn inject_key(&self, ctx: C, key: &I::Key, value: U) -> Result<C, I::Error> {
        self.inner.inject_key(ctx, key, (self.f)(value)?)
    }
}

/// Transforms the declared error. See [`Extractor::map_err`].
#[derive(Debug, Clone, Copy)]
pub struct MapErr<X, F> {
    inner: X,
    f: F,
}

impl<X, F> MapErr<X, F> {
    pub(crate) fn new(inner: X, f: F) -> Self {
        Self { inner, f }
    }
}

impl<C: ?Sized, X, F, E> Extractor<C> for MapErr<X, F>
where
    X: Extractor<C>,
    F: Fn(X::Error) -> E,
{
    type Output = X::Output;
    type Error = E;

    fn extract(&self, ctx: &C) -> Result<X::Output, E> {
        self.inner.extract(ctx).map_err(&self.f)
    }
}

impl<C: ?Sized, X, F, E> KeyedExtractor<C> for MapErr<X, F>
where
    X: KeyedExtractor<C>,
    F: Fn(X::Error) -> E,
{
    type Key = X::Key;
    type Output = X::Output;
    type Error = E;

    fn extract_key(&self, ctx: &C, key: &X::Key) -> Result<X::Output, E> {
        self.inner.extract_key(ctx, key).map_err(&self.f)
    }
}

impl<C, T, I, F, E> Injector<C, T> for MapErr<I, F>
where
    I: Injector<C, T>,
    F: Fn(I::Error) -> E,
{
    type Error = E;

    fn inject(&self, ctx: C, value: T) -> Result<C, E> {
        self.inner.inject(ctx, value).map_err(&self.f)
    }
}

impl<C, T, I, F, E> KeyedInjector<C, T> for MapErr<I, F>
where
    I: KeyedInjector<C, T>,
    F: Fn(I::Error) -> E,
{
    type Key = I::Key;
    type Error = E;

    fn inject_key(&self, ctx: C, key: &I::Key, value: T) -> Result<C, E> {
        self.inner.inject_key(ctx, key, value).map_err(&self.f)
    }
}

/// Converts the declared error with [`Into`]. See [`Extractor::err_into`].
pub struct ErrInto<X, E> {
    inner: X,
    _marker: PhantomData<fn() -> E>,
}

impl<X, E> ErrInto<X, E> {
    pub(crate) fn new(inner: X) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<X: Clone, E> Clone for ErrInto<X, E> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

impl<C: ?Sized, X, E> Extractor<C> for ErrInto<X, E>
where
    X: Extractor<C>,
    X::Error: Into<E>,
{
    type Output = X::Output;
    type Error = E;

    fn extract(&self, ctx: &C) -> Result<X::Output, E> {
        self.inner.extract(ctx).map_err(Into::into)
    }
}

impl<C: ?Sized, X, E> KeyedExtractor<C> for ErrInto<X, E>
where
    X: KeyedExtractor<C>,
    X::Error: Into<E>,
{
    type Key = X::Key;
    type Output = X::Output;
    type Error = E;

    fn extract_key(&self, ctx: &C, key: &X::Key) -> Result<X::Output, E> {
        self.inner.extract_key(ctx, key).map_err(Into::into)
    }
}

impl<C, T, I, E> Injector<C, T> for ErrInto<I, E>
where
    I: Injector<C, T>,
    I::Error: Into<E>,
{
    type Error = E;

    fn inject(&self, ctx: C, value: T) -> Result<C, E> {
        self.inner.inject(ctx, value).map_err(Into::into)
    }
}

impl<C, T, I, E> KeyedInjector<C, T> for ErrInto<I, E>
where
    I: KeyedInjector<C, T>,
    I::Error: Into<E>,
{
    type Key = I::Key;
    type Error = E;

    fn inject_key(&self, ctx: C, key: &I::Key, value: T) -> Result<C, E> {
        self.inner.inject_key(ctx, key, value).map_err(Into::into)
    }
}

/// Gives an infallible function an arbitrary declared error type.
/// See [`Extractor::fallible`].
pub struct Fallible<X, E> {
    inner: X,
    _marker: PhantomData<fn() -> E>,
}

impl<X, E> Fallible<X, E> {
    pub(crate) fn new(inner: X) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }
}

impl<X: Clone, E> Clone for Fallible<X, E> {
    fn clone(&self) -> Self {
        Self::new(self.inner.clone())
    }
}

fn never<E>(never: Infallible) -> E {
    match never {}
}

impl<C: ?Sized, X, E> Extractor<C> for Fallible<X, E>
where
    X: Extractor<C, Error = Infallible>,
{
    type Output = X::Output;
    type Error = E;

    fn extract(&self, ctx: &C) -> Result<X::Output, E> {
        self.inner.extract(ctx).map_err(never)
    }
}

impl<C: ?Sized, X, E> KeyedExtractor<C> for Fallible<X, E>
where
    X: KeyedExtractor<C, Error = Infallible>,
{
    type Key = X::Key;
    type Output = X::Output;
    type Error = E;

    fn extract_key(&self, ctx: &C, key: &X::Key) -> Result<X::Output, E> {
        self.inner.extract_key(ctx, key).map_err(never)
    }
}

impl<C, T, I, E> Injector<C, T> for Fallible<I, E>
where
    I: Injector<C, T, Error = Infallible>,
{
    type Error = E;

    fn inject(&self, ctx: C, value: T) -> Result<C, E> {
        self.inner.inject(ctx, value).map_err(never)
    }
}

impl<C, T, I, E> KeyedInjector<C, T> for Fallible<I, E>
where
    I: KeyedInjector<C, T, Error = Infallible>,
{
    type Key = I::Key;
    type Error = E;

    fn inject_key(&self, ctx: C, key: &I::Key, value: T) -> Result<C, E> {
        self.inner.inject_key(ctx, key, value).map_err(never)
    }
}

/// Erases the declared error of the wrapped function.
///
/// The adapter's `Error` is [`Infallible`]. When the wrapped function fails,
/// the failure is raised as an [`UncheckedError`](crate::UncheckedError)
/// whose cause is the original error, unchanged. Nothing is retried or
/// suppressed. Use [`catch_unchecked`](crate::catch_unchecked) to turn it back
/// into a value at a boundary.
#[derive(Debug, Clone, Copy)]
pub struct Unchecked<X> {
    inner: X,
}

impl<X> Unchecked<X> {
    pub(crate) fn new(inner: X) -> Self {
        Self { inner }
    }

    /// Returns the checked function.
    pub fn into_inner(self) -> X {
        self.inner
    }
}

fn or_raise<T, E>(result: Result<T, E>) -> Result<T, Infallible>
where
    E: std::error::Error + Send + Sync + 'static,
{
    match result {
        Ok(value) => Ok(value),
        Err(err) => raise(err),
    }
}

impl<C: ?Sized, X> Extractor<C> for Unchecked<X>
where
    X: Extractor<C>,
    X::Error: std::error::Error + Send + Sync + 'static,
{
    type Output = X::Output;
    type Error = Infallible;

    fn extract(&self, ctx: &C) -> Result<X::Output, Infallible> {
        or_raise(self.inner.extract(ctx))
    }
}

impl<C: ?Sized, X> KeyedExtractor<C> for Unchecked<X>
where
    X: KeyedExtractor<C>,
    X::Error: std::error::Error + Send + Sync + 'static,
{
    type Key = X::Key;
    type Output = X::Output;
    type Error = Infallible;

    fn extract_key(&self, ctx: &C, key: &X::Key) -> Result<X::Output, Infallible> {
        or_raise(self.inner.extract_key(ctx, key))
    }
}

impl<C, T, I> Injector<C, T> for Unchecked<I>
where
    I: Injector<C, T>,
    I::Error: std::error::Error + Send + Sync + 'static,
{
    type Error = Infallible;

    fn inject(&self, ctx: C, value: T) -> Result<C, Infallible> {
        or_raise(self.inner.inject(ctx, value))
    }
}

impl<C, T, I> KeyedInjector<C, T> for Unchecked<I>
where
    I: KeyedInjector<C, T>,
    I::Error: std::error::Error + Send + Sync + 'static,
{
    type Key = I::Key;
    type Error = Infallible;

    fn inject_key(&self, ctx: C, key: &I::Key, value: T) -> Result<C, Infallible> {
        or_raise(self.inner.inject_key(ctx, key, value))
    }
}
