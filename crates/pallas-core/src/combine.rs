//! Combining several extractors or injectors into one.
//!
//! Tuples of extractors are extractors of tuples, and tuples of injectors are
//! injectors of tuples. Every member must declare the same `Error` type; use
//! [`err_into`](crate::Extractor::err_into) or
//! [`fallible`](crate::Extractor::fallible) to line them up first.
//!
//! Members are evaluated left to right, each exactly once per call. The first
//! failure aborts the call. An injector tuple threads the context through its
//! members in order, so writes that happened before the failure stay applied.
//!
//! `Vec<X>` is the homogeneous form for any number of members of one type.
//!
//! # Example
//!
//! ```rust
//! use pallas_core::{combine, extractor, InfallibleExtractor};
//!
//! struct Endpoint {
//!     host: String,
//!     port: u16,
//! }
//!
//! let host = extractor::infallible(|ctx: &(String, u16)| ctx.0.clone());
//! let port = extractor::infallible(|ctx: &(String, u16)| ctx.1);
//!
//! let endpoint = combine((host, port), |(host, port): (String, u16)| Endpoint { host, port });
//!
//! let value = endpoint.get(&("localhost".to_string(), 8080));
//! assert_eq!(value.host, "localhost");
//! assert_eq!(value.port, 8080);
//! ```

use crate::adapt::{Map, Premap};
use crate::{Error, Extractor, Injector};

/// Combines `parts` and feeds their outputs to `ctor`.
///
/// `parts` is usually a tuple of extractors sharing one error type. The
/// constructor receives the tuple of their outputs.
pub fn combine<X, F>(parts: X, ctor: F) -> Map<X, F> {
    Map::new(parts, ctor)
}

/// Splits each value with `decompose` and writes the pieces with `parts`.
///
/// The inverse of [`combine`]: `decompose` turns the composite into the tuple
/// of values accepted by the tuple of injectors.
pub fn combine_into<I, F, T>(parts: I, decompose: F) -> Premap<I, F, T> {
    Premap::new(parts, decompose)
}

macro_rules! impl_extractor_for_tuple {
    ($($idx:tt $ty:ident),+) => {
        impl<C: ?Sized, E, $($ty,)+> Extractor<C> for ($($ty,)+)
        where
            $($ty: Extractor<C, Error = E>,)+
        {
            type Output = ($(<$ty as Extractor<C>>::Output,)+);
            type Error = E;

            fn extract(&self, ctx: &C) -> Result<Self::Output, E> {
                Ok(($(self.$idx.extract(ctx)?,)+))
            }
        }
    };
}

macro_rules! impl_injector_for_tuple {
    ($($idx:tt $ty:ident $val:ident),+) => {
        impl<C, E, $($ty, $val,)+> Injector<C, ($($val,)+)> for ($($ty,)+)
        where
            $($ty: Injector<C, $val, Error = E>,)+
        {
            type Error = E;

            fn inject(&self, ctx: C, value: ($($val,)+)) -> Result<C, E> {
                $(let ctx = self.$idx.inject(ctx, value.$idx)?;)+
                Ok(ctx)
            }
        }
    };
}

impl_extractor_for_tuple!(0 X0);
impl_extractor_for_tuple!(0 X0, 1 X1);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2, 3 X3);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2, 3 X3, 4 X4);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2, 3 X3, 4 X4, 5 X5);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2, 3 X3, 4 X4, 5 X5, 6 X6);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2, 3 X3, 4 X4, 5 X5, 6 X6, 7 X7);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2, 3 X3, 4 X4, 5 X5, 6 X6, 7 X7, 8 X8);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2, 3 X3, 4 X4, 5 X5, 6 X6, 7 X7, 8 X8, 9 X9);
impl_extractor_for_tuple!(0 X0, 1 X1, 2 X2, 3 X3, 4 X4, 5 X5, 6 X6, 7 X7, 8 X8, 9 X9, 10 X10);
impl_extractor_for_tuple!(
    0 X0, 1 X1, 2 X2, 3 X3, 4 X4, 5 X5, 6 X6, 7 X7, 8 X8, 9 X9, 10 X10, 11 X11
);

impl_injector_for_tuple!(0 I0 T0);
impl_injector_for_tuple!(0 I0 T0, 1 I1 T1);
impl_injector_for_tuple!(0 I0 T0, 1 I1 T1, 2 I2 T2);
impl_injector_for_tuple!(0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3);
impl_injector_for_tuple!(0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3, 4 I4 T4);
impl_injector_for_tuple!(0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3, 4 I4 T4, 5 I5 T5);
impl_injector_for_tuple!(0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3, 4 I4 T4, 5 I5 T5, 6 I6 T6);
impl_injector_for_tuple!(
    0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3, 4 I4 T4, 5 I5 T5, 6 I6 T6, 7 I7 T7
);
impl_injector_for_tuple!(
    0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3, 4 I4 T4, 5 I5 T5, 6 I6 T6, 7 I7 T7, 8 I8 T8
);
impl_injector_for_tuple!(
    0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3, 4 I4 T4, 5 I5 T5, 6 I6 T6, 7 I7 T7, 8 I8 T8, 9 I9 T9
);
impl_injector_for_tuple!(
    0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3, 4 I4 T4, 5 I5 T5, 6 I6 T6, 7 I7 T7, 8 I8 T8, 9 I9 T9,
    10 I10 T10
);
impl_injector_for_tuple!(
    0 I0 T0, 1 I1 T1, 2 I2 T2, 3 I3 T3, 4 I4 T4, 5 I5 T5, 6 I6 T6, 7 I7 T7, 8 I8 T8, 9 I9 T9,
    10 I10 T10, 11 I11 T11
);

impl<C: ?Sized, X: Extractor<C>> Extractor<C> for Vec<X> {
    type Output = Vec<X::Output>;
    type Error = X::Error;

    fn extract(&self, ctx: &C) -> Result<Self::Output, Self::Error> {
        self.iter().map(|part| part.extract(ctx)).collect()
    }
}

/// Writes the `n`-th value with the `n`-th injector.
///
/// The number of values must equal the number of injectors; a mismatch is
/// reported as [`Error::ArityMismatch`] before anything is written.
impl<C, T, I> Injector<C, Vec<T>> for Vec<I>
where
    I: Injector<C, T>,
    I::Error: From<Error>,
{
    type Error = I::Error;

    fn inject(&self, ctx: C, values: Vec<T>) -> Result<C, Self::Error> {
        if values.len() != self.len() {
            return Err(Error::arity_mismatch(self.len(), values.len()).into());
        }
        self.iter()
            .zip(values)
            .try_fold(ctx, |ctx, (part, value)| part.inject(ctx, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{field, write, MapContext, RecordingContext};
    use crate::{extractor, injector, InfallibleExtractor};
    use std::convert::Infallible;

    #[test]
    fn test_tuple_reads_left_to_right_once() {
        let ctx = RecordingContext::new([("a", 1), ("b", 2), ("c", 3)]);
        let abc = (field("a"), field("b"), field("c"));

        assert_eq!(abc.extract(&ctx), Ok((1, 2, 3)));
        assert_eq!(ctx.reads(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tuple_stops_at_first_failure() {
        let ctx = RecordingContext::new([("a", 1), ("c", 3)]);
        let abc = (field("a"), field("b"), field("c"));

        assert_eq!(abc.extract(&ctx), Err(Error::missing("b")));
        assert_eq!(ctx.reads(), vec!["a", "b"]);
    }

    #[test]
    fn test_combine_builds_composite() {
        #[derive(Debug, PartialEq)]
        struct Pair {
            left: i64,
            right: i64,
        }

        let ctx = RecordingContext::new([("l", 4), ("r", 5)]);
        let pair = combine((field("l"), field("r")), |(left, right): (i64, i64)| Pair {
            left,
            right,
        });

        assert_eq!(pair.extract(&ctx), Ok(Pair { left: 4, right: 5 }));
    }

    #[test]
    fn test_twelve_part_tuple() {
        let n = extractor::infallible(|ctx: &i32| *ctx);
        let n = &n;
        let all = (n, n, n, n, n, n, n, n, n, n, n, n);
        let out = all.get(&1);
        assert_eq!(out.0 + out.11, 2);
    }

    #[test]
    fn test_injector_tuple_threads_context() {
        let both = (write("x"), write("y"));
        let ctx = both.inject(MapContext::new(), (1, 2)).unwrap();
        assert_eq!(ctx.get("x"), Some(&1));
        assert_eq!(ctx.get("y"), Some(&2));
    }

    #[test]
    fn test_combine_into_decomposes() {
        let point = combine_into((write("x"), write("y")), |p: [i64; 2]| (p[0], p[1]));
        let ctx = point.inject(MapContext::new(), [7, 9]).unwrap();
        assert_eq!(ctx.get("x"), Some(&7));
        assert_eq!(ctx.get("y"), Some(&9));
    }

    #[test]
    fn test_vec_extractor() {
        let ctx = RecordingContext::new([("a", 1), ("b", 2)]);
        let list = vec![field("b"), field("a")];
        assert_eq!(list.extract(&ctx), Ok(vec![2, 1]));
        assert_eq!(ctx.reads(), vec!["b", "a"]);
    }

    #[test]
    fn test_vec_injector_checks_arity_first() {
        let list = vec![write("a"), write("b")];
        let err = list.inject(MapContext::new(), vec![1]).unwrap_err();
        assert_eq!(err, Error::arity_mismatch(2, 1));

        let ctx = list.inject(MapContext::new(), vec![1, 2]).unwrap();
        assert_eq!(ctx.len(), 2);
    }

    #[test]
    fn test_infallible_tuple_of_injectors() {
        let append = injector::infallible(|mut v: Vec<String>, s: &str| {
            v.push(s.to_string());
            v
        });
        let result: Result<Vec<String>, Infallible> =
            (append, append).inject(Vec::new(), ("one", "two"));
        assert_eq!(result.unwrap(), vec!["one", "two"]);
    }
}
