//! The process-wide citation service.
//!
//! Annotations happen in independently compiled modules with no shared
//! constructor call, so they all report into one registry. It is created on
//! first use, lives until the process exits, and is never torn down. Access
//! is serialized by a mutex. Sites declared with `#[cite_function]` or
//! `#[derive(CiteableType)]` are collected at link time and are known from
//! the moment the registry exists.
//!
//! Context stacks are per thread: a frame only sees uses that happen on the
//! thread that opened it.

use std::io;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use citecompass_config::{CiteConfig, ReportConfig};
use tracing::debug;

use crate::context::{CitationContext, ContextGuard, ContextStack};
use crate::docstring::DocstringExtractor;
use crate::entry::{CitationEntry, CitationKind};
use crate::error::CiteError;
use crate::registry::CitationRegistry;
use crate::report;
use crate::site::{self, CitationSite, CiteableType};

/// Starts out knowing every site the macros submitted at link time.
static REGISTRY: LazyLock<Mutex<CitationRegistry>> = LazyLock::new(|| {
    let mut registry = CitationRegistry::new();
    for site in site::collected_sites() {
        let entry = site.to_entry(registry.extractor());
        registry.register(entry);
    }
    debug!(known = registry.len(), "citation registry initialised");
    Mutex::new(registry)
});

thread_local! {
    static CONTEXTS: ContextStack = ContextStack::new();
}

fn registry() -> MutexGuard<'static, CitationRegistry> {
    // Registry updates are idempotent; a panic mid-update leaves nothing to repair.
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

fn broadcast(entry: &CitationEntry) {
    let _ = CONTEXTS.try_with(|stack| stack.broadcast(entry));
}

fn has_open_contexts() -> bool {
    CONTEXTS.try_with(|stack| !stack.is_empty()).unwrap_or(false)
}

/// Run `f` with read access to the process-wide registry.
///
/// Do not call other functions of this module from inside `f`; the registry
/// lock is held.
pub fn with_registry<R>(f: impl FnOnce(&CitationRegistry) -> R) -> R {
    f(&registry())
}

/// Apply configuration to the process-wide registry.
///
/// Sites declared with the macros are re-read with the new extractor
/// keywords; entries registered by hand keep their text.
pub fn configure(config: &CiteConfig) {
    let mut registry = registry();
    registry.set_extractor(DocstringExtractor::from_config(&config.extractor));
    for site in site::collected_sites() {
        let entry = site.to_entry(registry.extractor());
        registry.refresh(entry);
    }
}

/// Register a site as known (and as used, if it is untracked).
pub fn register(site: &CitationSite) {
    let mut registry = registry();
    let entry = site.to_entry(registry.extractor());
    registry.register(entry);
}

/// Register a prepared entry.
pub fn register_entry(entry: CitationEntry) {
    registry().register(entry);
}

/// Mark a registered identity as used and record it in the open contexts of
/// this thread. Unknown identities are ignored.
pub fn mark_used(identity: &str) {
    let entry = registry().mark_used(identity).cloned();
    if let Some(entry) = entry {
        broadcast(&entry);
    }
}

/// Record one use of a site.
///
/// The registry is updated on the first use only, registering the site if
/// needed. Later uses are only reported to contexts that are open right now.
/// Untracked sites are registered (and so used) but never reach contexts.
pub fn record_use(site: &CitationSite) {
    if site.first_use() {
        let entry = {
            let mut registry = registry();
            if !registry.is_known(site.identity()) {
                let entry = site.to_entry(registry.extractor());
                registry.register(entry);
            }
            if !site.is_tracked() {
                return;
            }
            registry.mark_used(site.identity()).cloned()
        };
        if let Some(entry) = entry {
            broadcast(&entry);
        }
    } else if site.is_tracked() && has_open_contexts() {
        mark_used(site.identity());
    }
}

/// Cite a module or external dependency; it is known and used at once.
///
/// Without citation text the module is an import marker, hidden from the
/// citation lists unless imports are requested. Prefer the
/// [`cite_module!`](crate::cite_module!) macro, which fills in the calling
/// module's path.
pub fn cite_module(name: &str, citation: Option<&str>) {
    registry().register(CitationEntry::module(name, citation.map(str::to_string)));
    mark_used(name);
}

/// Cite a specific object by its type; it is known and used at once.
pub fn cite_object<T: ?Sized>(_object: &T, label: Option<&str>, citation: Option<&str>) {
    let identity = std::any::type_name::<T>();
    registry().register(CitationEntry::new(
        identity,
        CitationKind::Object,
        citation.map(str::to_string),
        label.map(str::to_string),
    ));
    mark_used(identity);
}

/// Cite an object of a [`CiteableType`], falling back to the type's docs
/// for the citation text.
///
/// The object is cited through its type's entry, which keeps its `Class`
/// kind and is only registered here if it is not known yet.
pub fn cite_typed_object<T: CiteableType + ?Sized>(_object: &T) {
    let site = T::citation_site();
    {
        let mut registry = registry();
        if !registry.is_known(site.identity()) {
            let entry = site.to_entry(registry.extractor());
            registry.register(entry);
        }
    }
    mark_used(site.identity());
}

/// Every known citation, first-registered first.
pub fn get_all_citations(include_imports: bool) -> Vec<String> {
    registry().all_citations(include_imports)
}

/// Every used citation, first-registered first.
pub fn get_used_citations(include_imports: bool) -> Vec<String> {
    registry().used_citations(include_imports)
}

/// Identities of all cited modules.
pub fn get_all_imports() -> Vec<String> {
    registry().all_imports()
}

/// Identities of cited modules whose citation text mentions one of the
/// extractor keywords.
pub fn get_keyword_imports() -> Vec<String> {
    registry().keyword_imports()
}

/// Open a context on this thread. Close it with [`close_context`].
pub fn open_context(name: impl Into<String>) -> CitationContext {
    CONTEXTS.with(|stack| stack.open(name))
}

/// Close the innermost context of this thread.
pub fn close_context(context: &CitationContext) -> Result<(), CiteError> {
    CONTEXTS.with(|stack| stack.close(context))
}

/// Open a context that closes when the returned guard drops.
///
/// ```ignore
/// let ctx = citation_context("simulation");
/// run_simulation();
/// println!("{:?}", ctx.get_citations());
/// ```
pub fn citation_context(name: impl Into<String>) -> ContextGuard {
    CONTEXTS.with(|stack| stack.scope(name))
}

/// Run `f` inside a context on this thread.
pub fn with_citation_context<R>(
    name: impl Into<String>,
    f: impl FnOnce(&CitationContext) -> R,
) -> R {
    let guard = citation_context(name);
    f(&guard)
}

/// Number of contexts open on this thread.
pub fn context_depth() -> usize {
    CONTEXTS.with(|stack| stack.depth())
}

/// Print every known citation to stdout.
pub fn print_all_citations(include_imports: bool) {
    println!("All citations:");
    for line in get_all_citations(include_imports) {
        println!("  {line}");
    }
}

/// Print every used citation to stdout.
pub fn print_used_citations(include_imports: bool) {
    println!("Used citations:");
    for line in get_used_citations(include_imports) {
        println!("  {line}");
    }
}

/// Write a full report of the process-wide registry to stdout.
pub fn print_citation_report(options: &ReportConfig) -> io::Result<()> {
    let registry = registry();
    report::write_report(&mut io::stdout().lock(), &registry, options)
}
