//! Integration tests for the citecompass-macros attribute and derive macros.
//!
//! These live in citecompass-core because proc-macro crates can't have
//! integration tests that use their own macros.

#![allow(dead_code)]
#![deny(unused_braces)]

use citecompass_core::{
    CitationEntry, CitationKind, CiteableType, NO_CITATION, cite_function, cite_typed_object,
    citation_context, get_all_citations, get_used_citations, with_registry,
};
use citecompass_test_utils::capture::capture_logs;
use pretty_assertions::assert_eq;

fn path(item: &str) -> String {
    format!("{}::{item}", module_path!())
}

fn entry(identity: &str) -> CitationEntry {
    with_registry(|r| r.entry(identity).cloned()).expect("registered")
}

fn entry_ending_with(suffix: &str) -> CitationEntry {
    with_registry(|r| r.entries().find(|e| e.identity.ends_with(suffix)).cloned())
        .unwrap_or_else(|| panic!("no entry ending with {suffix}"))
}

// ── definition-time registration ──────────────────────────────────

/// Citation: Never, E. (2000). A function nobody calls.
#[cite_function]
fn never_called() {}

/// Citation: Unbuilt, T. (2001). A type nobody constructs.
#[derive(CiteableType)]
struct NeverConstructed;

#[test_log::test]
fn test_annotated_items_known_before_any_call() {
    let function = path("never_called");
    let ty = path("NeverConstructed");

    let all = get_all_citations(false);
    assert!(all.contains(&format!("{function}: Never, E. (2000). A function nobody calls.")));
    assert!(all.contains(&format!("{ty}: Unbuilt, T. (2001). A type nobody constructs.")));

    assert!(with_registry(|r| r.is_known(&function) && !r.is_used(&function)));
    assert!(with_registry(|r| r.is_known(&ty) && !r.is_used(&ty)));
    assert_eq!(entry(&ty).kind, CitationKind::Class);
}

// ── cite_function ─────────────────────────────────────────────────

/// Solve a linear system.
///
/// Citation: Golub, G. H., Van Loan, C. F. (2013). Matrix Computations.
#[cite_function]
fn solve_linear(n: usize) -> usize {
    let doubled = n * 2;
    doubled
}

#[test]
fn test_function_used_after_first_call() {
    let identity = path("solve_linear");
    assert_eq!(solve_linear_citation().identity(), identity);

    let line = format!("{identity}: Golub, G. H., Van Loan, C. F. (2013). Matrix Computations.");
    assert!(get_all_citations(false).contains(&line));
    assert!(!get_used_citations(false).contains(&line));

    assert_eq!(solve_linear(21), 42);
    assert!(get_used_citations(false).contains(&line));

    solve_linear(1);
    solve_linear(2);
    let used = get_used_citations(false);
    assert_eq!(used.iter().filter(|l| **l == line).count(), 1);
}

/// Estimate a derivative with central differences.
#[cite_function]
fn central_difference(h: f64) -> f64 {
    h / 2.0
}

#[test]
fn test_whole_docs_when_no_section() {
    let identity = path("central_difference");
    assert!(!with_registry(|r| r.is_used(&identity)));

    central_difference(0.5);
    assert!(with_registry(|r| r.is_used(&identity)));

    let entry = entry(&identity);
    assert_eq!(entry.kind, CitationKind::Function);
    assert_eq!(
        entry.citation.as_deref(),
        Some("Estimate a derivative with central differences.")
    );
}

#[cite_function("function_citation_1")]
fn labelled_only() {}

#[test]
fn test_label_used_when_no_docs() {
    labelled_only();
    let line = format!("{}: function_citation_1", path("labelled_only"));
    assert!(get_used_citations(false).contains(&line));
}

#[cite_function]
fn undocumented() {}

#[test]
fn test_default_text_when_nothing_given() {
    undocumented();
    let line = format!("{}: {NO_CITATION}", path("undocumented"));
    assert!(get_used_citations(false).contains(&line));
}

/// Citation: From the docs.
#[cite_function(label = "fft", citation = "Cooley, J. W., Tukey, J. W. (1965).")]
fn fft_explicit() {}

#[test]
fn test_explicit_citation_overrides_docs() {
    fft_explicit();
    let entry = entry(&path("fft_explicit"));
    assert_eq!(
        entry.citation.as_deref(),
        Some("Cooley, J. W., Tukey, J. W. (1965).")
    );
    assert_eq!(entry.label.as_deref(), Some("fft"));
}

/// Citation: Untracked helper.
#[cite_function(track_used = false)]
fn untracked_helper() -> u32 {
    7
}

#[test]
fn test_untracked_function_used_without_any_call() {
    let identity = path("untracked_helper");
    let line = format!("{identity}: Untracked helper.");
    assert!(get_used_citations(false).contains(&line));

    let ctx = citation_context("untracked");
    assert_eq!(untracked_helper(), 7);
    assert!(!ctx.contains(&identity));
    assert!(get_used_citations(false).contains(&line));
}

/// Multi-line references section.
///
/// References
/// ----------
/// Press, W. H. et al. (2007).
/// Numerical Recipes.
#[cite_function]
fn numpy_style() {}

#[test]
fn test_numpy_style_section_from_docs() {
    numpy_style();
    assert_eq!(
        entry(&path("numpy_style")).citation.as_deref(),
        Some("Press, W. H. et al. (2007).\nNumerical Recipes.")
    );
}

// ── methods ───────────────────────────────────────────────────────

struct Integrator {
    dt: f64,
}

impl Integrator {
    /// Citation: Verlet, L. (1967).
    #[cite_function]
    fn step(&self, x: f64) -> f64 {
        x + self.dt
    }

    /// Citation: Runge, C. (1895).
    #[cite_function(method)]
    fn with_default_step() -> Self {
        Self { dt: 0.1 }
    }
}

#[test]
fn test_inherent_methods_are_cited() {
    let step = entry_ending_with("Integrator::step");
    assert_eq!(step.citation.as_deref(), Some("Verlet, L. (1967)."));
    assert!(!with_registry(|r| r.is_used(&step.identity)));

    let integrator = Integrator::with_default_step();
    assert_eq!(integrator.step(1.0), 1.1);
    assert!(with_registry(|r| r.is_used(&step.identity)));

    let ctor = entry_ending_with("Integrator::with_default_step");
    assert!(get_used_citations(false).contains(&format!("{}: Runge, C. (1895).", ctor.identity)));
}

trait Stepper {
    fn advance(&self, x: f64) -> f64;
}

struct Euler;

impl Stepper for Euler {
    /// Citation: Euler, L. (1768). Institutionum calculi integralis.
    #[cite_function]
    fn advance(&self, x: f64) -> f64 {
        x + 1.0
    }
}

#[test]
fn test_trait_impl_methods_are_cited() {
    let identity = entry_ending_with("Stepper>::advance").identity;
    assert!(identity.contains("Euler"), "{identity}");
    assert!(!with_registry(|r| r.is_used(&identity)));

    let ctx = citation_context("trait impl");
    assert_eq!(Euler.advance(1.0), 2.0);
    assert!(ctx.contains(&identity));
    assert_eq!(
        entry(&identity).citation.as_deref(),
        Some("Euler, L. (1768). Institutionum calculi integralis.")
    );
}

// ── CiteableType ──────────────────────────────────────────────────

/// A discrete Kalman filter.
///
/// Citation: Kalman, R. E. (1960). A New Approach to Linear Filtering.
#[derive(CiteableType)]
struct KalmanFilter {
    gain: f64,
}

impl KalmanFilter {
    fn new(gain: f64) -> Self {
        Self::mark_constructed();
        Self { gain }
    }
}

#[test]
fn test_derived_type_used_on_construction() {
    let identity = path("KalmanFilter");
    assert_eq!(KalmanFilter::citation_site().identity(), identity);
    assert!(!with_registry(|r| r.is_used(&identity)));

    let ctx = citation_context("filtering");
    let _filter = KalmanFilter::new(0.5);
    let _again = KalmanFilter::new(0.7);
    assert!(ctx.contains(&identity));

    let entry = entry(&identity);
    assert_eq!(entry.kind, CitationKind::Class);
    assert_eq!(
        entry.citation.as_deref(),
        Some("Kalman, R. E. (1960). A New Approach to Linear Filtering.")
    );
}

#[derive(CiteableType)]
#[cite(label = "particle", citation = "Gordon, N. J. et al. (1993).")]
enum ParticleFilter {
    Bootstrap,
    Auxiliary,
}

#[test]
fn test_typed_object_keeps_class_entry() {
    let identity = path("ParticleFilter");

    let ((), logs) = capture_logs(|| {
        cite_typed_object(&ParticleFilter::Bootstrap);
        ParticleFilter::register_citation();
    });
    assert!(logs.warnings_containing("duplicated").is_empty());

    let entry = entry(&identity);
    assert_eq!(entry.kind, CitationKind::Class);
    assert_eq!(entry.label.as_deref(), Some("particle"));
    assert_eq!(entry.to_string(), format!("{identity}: Gordon, N. J. et al. (1993)."));
    assert!(with_registry(|r| r.is_used(&identity)));
}
