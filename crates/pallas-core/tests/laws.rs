//! Algebraic laws of the extractor and injector combinators.
//!
//! These properties hold for any leaf functions, so they are checked against
//! the in-memory fixtures with generated inputs.

use pallas_core::fixtures::{failing, field, write, Boom, MapContext, RecordingContext};
use pallas_core::{
    catch_unchecked, combine, combine_into, extractor, Error, Extractor, InfallibleExtractor,
    Injector,
};
use proptest::prelude::*;

fn context(a: i64, b: i64, c: i64) -> RecordingContext {
    RecordingContext::new([("a", a), ("b", b), ("c", c)])
}

proptest! {
    #[test]
    fn map_identity(a in any::<i64>()) {
        let ctx = context(a, 0, 0);
        let plain = field("a").extract(&ctx);
        let mapped = field("a").map(|v| v).extract(&ctx);
        prop_assert_eq!(plain, mapped);
    }

    #[test]
    fn map_composition(a in -1_000_000_i64..1_000_000) {
        let f = |v: i64| v * 3;
        let g = |v: i64| v - 7;
        let ctx = context(a, 0, 0);

        let chained = field("a").map(f).map(g).extract(&ctx);
        let fused = field("a").map(move |v| g(f(v))).extract(&ctx);
        prop_assert_eq!(chained, fused);
    }

    #[test]
    fn map_evaluates_base_once(a in any::<i64>()) {
        let ctx = context(a, 0, 0);
        let _ = field("a").map(|v| v.to_string()).map(|s| s.len()).extract(&ctx);
        prop_assert_eq!(ctx.reads(), vec!["a".to_string()]);
    }

    #[test]
    fn combine_reads_each_field_once_in_order(a in any::<i64>(), b in any::<i64>(), c in any::<i64>()) {
        let ctx = context(a, b, c);
        let sum = combine(
            (field("c"), field("a"), field("b")),
            |(c, a, b): (i64, i64, i64)| (i128::from(a), i128::from(b), i128::from(c)),
        );

        prop_assert_eq!(sum.extract(&ctx), Ok((i128::from(a), i128::from(b), i128::from(c))));
        prop_assert_eq!(ctx.reads(), vec!["c".to_string(), "a".to_string(), "b".to_string()]);
    }

    #[test]
    fn injected_tuple_reads_back(x in any::<i64>(), y in any::<i64>()) {
        let writer = combine_into((write("x"), write("y")), |p: (i64, i64)| p);
        let written = writer.inject(MapContext::new(), (x, y)).unwrap();

        let ctx = RecordingContext::new(written.iter().map(|(k, v)| (k.as_str(), *v)));
        prop_assert_eq!((field("x"), field("y")).extract(&ctx), Ok((x, y)));
    }

    #[test]
    fn optional_distinguishes_zero_from_absent(a in any::<i64>()) {
        let ctx = context(a, 0, 0);
        prop_assert_eq!(field("a").optional().extract(&ctx), Ok(Some(a)));
        prop_assert_eq!(field("z").optional().extract(&ctx), Ok(None));
    }
}

#[test]
fn optional_injection_skips_write() {
    let ctx = write("x").optional().inject(MapContext::new(), None).unwrap();
    assert!(ctx.is_empty());
}

#[test]
fn unchecked_keeps_the_cause() {
    let ex = failing("boom").unchecked();
    let err = catch_unchecked(|| ex.get(&context(1, 2, 3))).unwrap_err();

    assert_eq!(err.downcast_ref::<Boom>(), Some(&Boom("boom".to_string())));
    assert_eq!(err.cause().to_string(), "boom");
}

#[test]
fn checked_failure_propagates_unchanged() {
    let ctx = context(1, 2, 3);
    let err = (field("a"), failing("boom").map_err(|b: Boom| Error::missing(b.0)))
        .extract(&ctx)
        .unwrap_err();
    assert_eq!(err, Error::missing("boom"));
}

#[test]
fn flat_map_uses_the_same_context() {
    let ctx = context(1, 20, 30);
    let pick = field("a").flat_map(|a| field(if a == 1 { "b" } else { "c" }));
    assert_eq!(pick.extract(&ctx), Ok(20));
}

#[test]
fn constant_ignores_context() {
    let ctx = context(0, 0, 0);
    assert_eq!(extractor::constant(5).get(&ctx), 5);
    assert!(ctx.reads().is_empty());
}
