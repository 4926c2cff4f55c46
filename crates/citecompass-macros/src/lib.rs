#![deny(unsafe_code)]

//! Procedural macros for citecompass.
//!
//! - `#[cite_function]`: register a function or method as citable and
//!   record its first use
//! - `#[derive(CiteableType)]`: make a type citable through the
//!   `CiteableType` trait
//!
//! Generated code refers to `::citecompass_core`, which must be a dependency
//! of the consuming crate.

extern crate proc_macro;

mod cite_function;
mod citeable_type;
mod docs;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro marking a function or method as citable.
///
/// The function's `///` documentation is searched for a citation section.
/// The site is submitted at link time, so the function is a known citation
/// from process start. Free functions also get an accessor
/// `<name>_citation()` returning their `&'static CitationSite`; methods keep
/// the site inside their body, which lets the attribute work in trait impls.
///
/// Supported arguments, all optional:
/// - a leading string literal, or `label = "..."`: a user-defined label
/// - `citation = "..."`: explicit citation text, overriding the docs
/// - `track_used = false`: skip use tracking; the function counts as used
///   once registered
/// - `method`: the function is an associated function without a `self`
///   receiver (methods with a receiver are detected automatically); no
///   accessor is generated for it
///
/// # Example
///
/// ```ignore
/// use citecompass_core::cite_function;
///
/// /// Solve the heat equation.
/// ///
/// /// Citation: Crank, J., Nicolson, P. (1947).
/// #[cite_function]
/// fn crank_nicolson(u: &mut [f64]) { /* ... */ }
///
/// #[cite_function(label = "fft", citation = "Cooley, Tukey (1965).", track_used = false)]
/// fn fft(signal: &[f64]) -> Vec<f64> { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn cite_function(attr: TokenStream, item: TokenStream) -> TokenStream {
    cite_function::expand(attr, item)
}

/// Derive macro making a type citable.
///
/// Implements `citecompass_core::CiteableType`. The type's doc comment is
/// searched for a citation section; `#[cite(label = "...", citation = "...")]`
/// sets a label or explicit text.
///
/// # Example
///
/// ```ignore
/// use citecompass_core::CiteableType;
///
/// /// Citation: Kalman, R. E. (1960).
/// #[derive(CiteableType)]
/// #[cite(label = "kalman")]
/// struct KalmanFilter {
///     gain: f64,
/// }
/// ```
#[proc_macro_derive(CiteableType, attributes(cite))]
pub fn derive_citeable_type(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    citeable_type::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
