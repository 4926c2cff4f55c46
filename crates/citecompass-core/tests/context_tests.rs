//! Scoped citation contexts driven through the process-wide API.
//!
//! Context stacks are per thread, and the test harness runs each test on its
//! own thread, so depth assertions here are not affected by other tests.

use std::panic::{AssertUnwindSafe, catch_unwind};

use citecompass_core::{
    CitationSite, CiteError, cite_fn, cite_function, cite_module, citation_context,
    close_context, context_depth, open_context, with_citation_context,
};
use citecompass_test_utils::fixtures::unique_identity;
use pretty_assertions::assert_eq;

/// Citation: Metropolis, N. et al. (1953).
#[cite_function]
fn metropolis_step(x: f64) -> f64 {
    x * 0.5
}

/// Citation: Hastings, W. K. (1970).
#[cite_function]
fn hastings_step(x: f64) -> f64 {
    x * 0.25
}

#[test_log::test]
fn test_context_sees_only_uses_inside_it() {
    let identity = metropolis_step_citation().identity();
    let ctx = citation_context("sampling");
    assert!(ctx.get_citations().is_empty());

    metropolis_step(1.0);
    assert_eq!(
        ctx.get_citations(),
        vec![format!("{identity}: Metropolis, N. et al. (1953).")]
    );

    // Repeated calls inside the frame are recorded once.
    metropolis_step(2.0);
    assert_eq!(ctx.len(), 1);
}

#[test]
fn test_later_calls_still_reach_new_contexts() {
    let identity = hastings_step_citation().identity();
    hastings_step(1.0);

    let ctx = citation_context("after first use");
    assert!(ctx.is_empty());
    hastings_step(1.0);
    assert!(ctx.contains(identity));
}

#[test]
fn test_nested_contexts_both_capture() {
    let inner_only = unique_identity("ctx::inner_only");
    let outer_only = unique_identity("ctx::outer_only");
    let f = cite_fn(CitationSite::function(&inner_only), |()| ());
    let g = cite_fn(CitationSite::function(&outer_only), |()| ());

    let outer = citation_context("outer");
    {
        let inner = citation_context("inner");
        f(());
        assert!(inner.contains(&inner_only));
        assert_eq!(context_depth(), 2);
    }
    g(());

    assert_eq!(context_depth(), 1);
    assert!(outer.contains(&inner_only));
    assert!(outer.contains(&outer_only));
}

#[test]
fn test_frames_readable_after_close() {
    let identity = unique_identity("ctx::after_close");
    let f = cite_fn(CitationSite::function(&identity).with_citation("Kept"), |()| ());

    let ctx = open_context("manual");
    f(());
    close_context(&ctx).expect("innermost frame closes");

    assert_eq!(context_depth(), 0);
    assert_eq!(ctx.get_citations(), vec![format!("{identity}: Kept")]);
}

#[test]
fn test_out_of_order_close_is_mismatch() {
    let outer = open_context("outer");
    let inner = open_context("inner");

    let err = close_context(&outer).unwrap_err();
    assert!(matches!(
        &err,
        CiteError::ContextMismatch { expected: Some(e), found } if e == "inner" && found == "outer"
    ));

    close_context(&inner).expect("LIFO close succeeds");
    close_context(&outer).expect("LIFO close succeeds");
    assert_eq!(context_depth(), 0);
}

#[test]
fn test_closing_on_empty_stack_is_mismatch() {
    let ctx = open_context("once");
    close_context(&ctx).expect("first close succeeds");
    let err = close_context(&ctx).unwrap_err();
    assert!(matches!(err, CiteError::ContextMismatch { expected: None, .. }));
}

#[test]
fn test_same_name_frames_are_distinct() {
    let identity = unique_identity("ctx::same_name");
    let f = cite_fn(CitationSite::function(&identity), |()| ());

    let first = open_context("run");
    let second = open_context("run");
    assert!(close_context(&first).is_err());

    close_context(&second).expect("top frame closes");
    f(());
    close_context(&first).expect("remaining frame closes");

    assert!(!second.contains(&identity));
    assert!(first.contains(&identity));
}

#[test]
fn test_guard_closes_on_panic() {
    let result = catch_unwind(AssertUnwindSafe(|| {
        let _ctx = citation_context("panicking");
        assert_eq!(context_depth(), 1);
        panic!("boom");
    }));
    assert!(result.is_err());
    assert_eq!(context_depth(), 0);
}

fn early_return(stop: bool) -> Option<usize> {
    let _ctx = citation_context("early");
    if stop {
        return None;
    }
    Some(context_depth())
}

#[test]
fn test_guard_closes_on_early_return() {
    assert_eq!(early_return(true), None);
    assert_eq!(context_depth(), 0);
    assert_eq!(early_return(false), Some(1));
    assert_eq!(context_depth(), 0);
}

#[test]
fn test_with_citation_context_returns_value() {
    let module = unique_identity("ctx_module");
    let n = with_citation_context("closure", |ctx| {
        cite_module!(module.as_str(), "Module, 2010.");
        ctx.len()
    });
    assert_eq!(n, 1);
    assert_eq!(context_depth(), 0);
}

#[test]
fn test_explicit_guard_close() {
    let guard = citation_context("explicit");
    let ctx = guard.close().expect("only frame closes");
    assert_eq!(ctx.name(), "explicit");
    assert_eq!(context_depth(), 0);
}
