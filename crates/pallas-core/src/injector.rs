//! Core injector trait.
//!
//! The [`Injector`] trait is the write side, the mirror image of
//! [`Extractor`](crate::Extractor). An injector takes a context by value,
//! writes a value into it and hands the context back. Contexts that are
//! updated in place are passed as `&mut` references; persistent contexts
//! can return a new value.

use std::convert::Infallible;
use std::marker::PhantomData;

use crate::adapt::{ErrInto, Fallible, MapErr, Optional, OptionalWith, Premap, TryPremap, Unchecked};

/// A function that writes a typed value into a context.
///
/// # Example
///
/// ```rust
/// use pallas_core::{injector, Injector, InfallibleInjector};
///
/// let push = injector::infallible(|mut log: Vec<String>, value: i32| {
///     log.push(value.to_string());
///     log
/// });
///
/// let log = push.put(Vec::new(), 42);
/// assert_eq!(log, vec!["42".to_string()]);
/// ```
pub trait Injector<C, T> {
    /// The declared failure.
    type Error;

    /// Writes `value` into `ctx` and returns the updated context.
    fn inject(&self, ctx: C, value: T) -> Result<C, Self::Error>;

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

    /// Accepts `Option<T>`, skipping the write entirely for `None`.
    fn optional(self) -> Optional<Self>
    where
        Self: Sized,
    {
        Optional::new(self)
    }

    /// Accepts `Option<T>`, delegating `None` to `absent`.
    ///
    /// Use this when the backend needs an explicit null-equivalent write,
    /// for example to keep positional columns aligned.
    fn optional_with<N>(self, absent: N) -> OptionalWith<Self, N>
    where
        Self: Sized,
        N: Injector<C, (), Error = Self::Error>,
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
        Self: Sized + Injector<C, T, Error = Infallible>,
    {
        Fallible::new(self)
    }

    /// Erases the declared error. See [`Extractor::unchecked`](crate::Extractor::unchecked).
    fn unchecked(self) -> Unchecked<Self>
    where
        Self: Sized,
        Self::Error: std::error::Error + Send + Sync + 'static,
    {
        Unchecked::new(self)
    }

    /// Borrows this injector, so it can be combined without being consumed.
    fn by_ref(&self) -> &Self
    where
        Self: Sized,
    {
        self
    }

    /// Boxes this injector behind a trait object.
    fn boxed<'a>(self) -> BoxInjector<'a, C, T, Self::Error>
    where
        Self: Sized + 'a,
    {
        Box::new(self)
    }
}

/// A type-erased injector.
pub type BoxInjector<'a, C, T, E> = Box<dyn Injector<C, T, Error = E> + 'a>;

impl<C, T, I: Injector<C, T> + ?Sized> Injector<C, T> for &I {
    type Error = I::Error;

    fn inject(&self, ctx: C, value: T) -> Result<C, Self::Error> {
        (**self).inject(ctx, value)
    }
}

impl<C, T, I: Injector<C, T> + ?Sized> Injector<C, T> for Box<I> {
    type Error = I::Error;

    fn inject(&self, ctx: C, value: T) -> Result<C, Self::Error> {
        (**self).inject(ctx, value)
    }
}

/// Shorthand for injectors that cannot fail.
pub trait InfallibleInjector<C, T>: Injector<C, T, Error = Infallible> {
    /// Writes `value` into `ctx` and returns the updated context.
    fn put(&self, ctx: C, value: T) -> C {
        match self.inject(ctx, value) {
            Ok(ctx) => ctx,
            Err(never) => match never {},
        }
    }
}

impl<C, T, I: Injector<C, T, Error = Infallible> + ?Sized> InfallibleInjector<C, T> for I {}

/// Injector built from a fallible closure. See [`from_fn`].
pub struct FromFn<F, E> {
    f: F,
    _marker: PhantomData<fn() -> E>,
}

impl<F: Clone, E> Clone for FromFn<F, E> {
    fn clone(&self) -> Self {
        Self {
            f: self.f.clone(),
            _marker: PhantomData,
        }
    }
}

impl<C, T, E, F> Injector<C, T> for FromFn<F, E>
where
    F: Fn(C, T) -> Result<C, E>,
{
    type Error = E;

    fn inject(&self, ctx: C, value: T) -> Result<C, E> {
        (self.f)(ctx, value)
    }
}

/// Creates a checked injector from a closure.
pub fn from_fn<C, T, E, F>(f: F) -> FromFn<F, E>
where
    F: Fn(C, T) -> Result<C, E>,
{
    FromFn {
        f,
        _marker: PhantomData,
    }
}

/// Injector built from a total closure. See [`infallible`].
#[derive(Clone, Copy)]
pub struct InfallibleFn<F> {
    f: F,
}

impl<C, T, F> Injector<C, T> for InfallibleFn<F>
where
    F: Fn(C, T) -> C,
{
    type Error = Infallible;

    fn inject(&self, ctx: C, value: T) -> Result<C, Infallible> {
        Ok((self.f)(ctx, value))
    }
}

/// Creates an injector that cannot fail.
pub fn infallible<C, T, F>(f: F) -> InfallibleFn<F>
where
    F: Fn(C, T) -> C,
{
    InfallibleFn { f }
}

/// Injector that discards the value and returns the context untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Noop;

impl<C, T> Injector<C, T> for Noop {
    type Error = Infallible;

    fn inject(&self, ctx: C, _value: T) -> Result<C, Infallible> {
        Ok(ctx)
    }
}

/// Creates an injector that writes nothing.
pub fn noop() -> Noop {
    Noop
}
