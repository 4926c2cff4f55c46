#![deny(unsafe_code)]

//! citecompass core: citation bookkeeping for Rust code.
//!
//! Authors mark functions, methods, types, modules and objects as citable;
//! users ask which of them exist and which were actually exercised during a
//! run, either for the whole process or within a named, scoped context.
//!
//! ```ignore
//! use citecompass_core::{cite_function, cite_module, citation_context, get_used_citations};
//!
//! /// Integrate with the velocity Verlet scheme.
//! ///
//! /// Citation: Verlet, L. (1967). Phys. Rev. 159, 98.
//! #[cite_function]
//! fn verlet_step(x: f64, v: f64, dt: f64) -> (f64, f64) {
//!     (x + v * dt, v)
//! }
//!
//! cite_module!("nalgebra", "Crozet, S. nalgebra.");
//! let ctx = citation_context("simulation");
//! verlet_step(0.0, 1.0, 0.1);
//! assert_eq!(ctx.get_citations().len(), 1);
//! ```
//!
//! The process-wide registry is guarded by a mutex; context stacks are per
//! thread.

/// Scoped citation contexts and the LIFO context stack.
pub mod context;
/// Docstring citation extraction heuristics.
pub mod docstring;
/// Citation entries and their formatting.
pub mod entry;
/// Error types.
pub mod error;
/// The process-wide registry, annotation entry points and queries.
pub mod global;
/// Log subscriber setup.
pub mod logging;
/// The citation registry.
pub mod registry;
/// Text and JSON reports.
pub mod report;
/// Citation sites and the `CiteableType` trait.
pub mod site;

pub use citecompass_config::{CiteConfig, ReportConfig, ReportFormat};
pub use citecompass_macros::{CiteableType, cite_function};

pub use context::{CitationContext, ContextGuard, ContextStack};
pub use docstring::{
    DocstringExtractor, check_for_any_keyword, extract_citation, extract_urls,
    find_citation_section,
};
pub use entry::{CitationEntry, CitationKind, NO_CITATION};
pub use error::CiteError;
pub use global::{
    citation_context, cite_module, cite_object, cite_typed_object, close_context, configure,
    context_depth, get_all_citations, get_all_imports, get_keyword_imports, get_used_citations,
    mark_used, open_context, print_all_citations, print_citation_report, print_used_citations,
    record_use, register, register_entry, with_citation_context, with_registry,
};
pub use registry::CitationRegistry;
pub use site::{CitationSite, CiteableType, cite_fn};

/// Items used by code generated from `citecompass-macros`.
#[doc(hidden)]
pub mod __private {
    pub use crate::site::{SiteRegistration, qualified_name};
    pub use inventory;
}

/// Cite a module; it is known and used immediately.
///
/// - `cite_module!()` cites the calling module (`module_path!()`) as an import marker.
/// - `cite_module!("dep")` cites a named module or dependency as an import marker.
/// - `cite_module!("dep", "citation text")` cites it with explicit text.
#[macro_export]
macro_rules! cite_module {
    () => {
        $crate::cite_module(::std::module_path!(), ::std::option::Option::None)
    };
    ($name:expr) => {
        $crate::cite_module($name, ::std::option::Option::None)
    };
    ($name:expr, $citation:expr) => {
        $crate::cite_module($name, ::std::option::Option::Some($citation))
    };
}
