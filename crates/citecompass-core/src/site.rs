//! Citation sites: the static description of one citable item.
//!
//! A [`CitationSite`] is what `#[cite_function]` and `#[derive(CiteableType)]`
//! generate for each annotated item: identity, optional label and citation
//! text, the item's doc comment, and whether uses are tracked. Each site also
//! carries a call-once flag so that the process-wide registry is only updated
//! on the first use.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::docstring::DocstringExtractor;
use crate::entry::{CitationEntry, CitationKind};
use crate::global;

/// Static description of a citable function, method or type.
#[derive(Debug)]
pub struct CitationSite {
    identity: String,
    kind: CitationKind,
    label: Option<String>,
    citation: Option<String>,
    docstring: Option<String>,
    track_used: bool,
    used: AtomicBool,
}

impl CitationSite {
    pub fn new(kind: CitationKind, identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            kind,
            label: None,
            citation: None,
            docstring: None,
            track_used: true,
            used: AtomicBool::new(false),
        }
    }

    /// A function or method site.
    pub fn function(identity: impl Into<String>) -> Self {
        Self::new(CitationKind::Function, identity)
    }

    /// A type site.
    pub fn class(identity: impl Into<String>) -> Self {
        Self::new(CitationKind::Class, identity)
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Explicit citation text; takes precedence over the docstring.
    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = Some(citation.into());
        self
    }

    /// The item's documentation, searched for a citation section.
    pub fn with_docs(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = Some(docstring.into());
        self
    }

    /// Untracked sites are considered used as soon as they are registered.
    pub fn with_track_used(mut self, track_used: bool) -> Self {
        self.track_used = track_used;
        self
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn kind(&self) -> CitationKind {
        self.kind
    }

    pub fn docstring(&self) -> Option<&str> {
        self.docstring.as_deref()
    }

    pub fn is_tracked(&self) -> bool {
        self.track_used
    }

    /// Build the registry entry, resolving citation text with `extractor`.
    pub fn to_entry(&self, extractor: &DocstringExtractor) -> CitationEntry {
        let citation = self.citation.clone().or_else(|| {
            let extracted = extractor.extract(self.docstring.as_deref());
            (!extracted.is_empty()).then_some(extracted)
        });
        CitationEntry::new(
            self.identity.clone(),
            self.kind,
            citation,
            self.label.clone(),
        )
        .with_track_used(self.track_used)
    }

    /// Flip the call-once flag. Returns `true` only for the first use.
    pub(crate) fn first_use(&self) -> bool {
        !self.used.swap(true, Ordering::AcqRel)
    }
}

/// A type that can be cited.
///
/// Derive it with `#[derive(CiteableType)]`; the type's doc comment supplies
/// the citation text unless `#[cite(citation = "...")]` is given. Derived
/// types are known from process start; call
/// [`mark_constructed`](Self::mark_constructed) from every constructor.
/// Hand-written impls also call
/// [`register_citation`](Self::register_citation) to become known early.
///
/// ```ignore
/// /// A Kalman filter.
/// ///
/// /// Citation: Kalman, R. E. (1960).
/// #[derive(CiteableType)]
/// struct KalmanFilter { gain: f64 }
///
/// impl KalmanFilter {
///     fn new(gain: f64) -> Self {
///         Self::mark_constructed();
///         Self { gain }
///     }
/// }
/// ```
pub trait CiteableType {
    /// The site describing this type.
    fn citation_site() -> &'static CitationSite;

    /// Register the type as known without marking it used.
    fn register_citation() {
        global::register(Self::citation_site());
    }

    /// Record a construction. Only the first one updates the registry.
    fn mark_constructed() {
        global::record_use(Self::citation_site());
    }
}

/// Wrap a closure so that calling it records a use of `site`.
///
/// The site is registered immediately. Functions taking several arguments
/// can take a tuple.
///
/// ```ignore
/// let integrate = cite_fn(
///     CitationSite::function("physics::integrate").with_citation("Verlet, 1967."),
///     |(x, dt): (f64, f64)| x + dt,
/// );
/// integrate((1.0, 0.1));
/// ```
pub fn cite_fn<A, R>(site: CitationSite, f: impl Fn(A) -> R) -> impl Fn(A) -> R {
    let site = Arc::new(site);
    global::register(&site);
    move |args: A| {
        global::record_use(&site);
        f(args)
    }
}

/// A site submitted at link time by `#[cite_function]` and
/// `#[derive(CiteableType)]`.
#[doc(hidden)]
pub struct SiteRegistration(pub fn() -> &'static CitationSite);

inventory::collect!(SiteRegistration);

/// Every submitted site, ordered by identity.
///
/// Link order is unspecified, so the sites are sorted to keep reports stable.
pub(crate) fn collected_sites() -> Vec<&'static CitationSite> {
    let mut sites: Vec<&'static CitationSite> = inventory::iter::<SiteRegistration>
        .into_iter()
        .map(|registration| (registration.0)())
        .collect();
    sites.sort_by(|a, b| a.identity.cmp(&b.identity));
    sites
}

/// Derive an item's qualified name from the type name of a marker function
/// nested one level inside the item's site accessor
/// (`path::item_citation::marker` or `path::item::__citecompass_site`).
///
/// Inherent impl scopes (`path::<impl path::Type>`) are shortened to the
/// type path.
#[doc(hidden)]
pub fn qualified_name(marker: &str, item: &str) -> String {
    let accessor = marker.rsplit_once("::").map_or(marker, |(scope, _)| scope);
    let Some((scope, _)) = accessor.rsplit_once("::") else {
        return item.to_string();
    };
    let scope = scope
        .rfind("<impl ")
        .filter(|_| scope.ends_with('>'))
        .map_or(scope, |start| &scope[start + "<impl ".len()..scope.len() - 1]);
    format!("{scope}::{item}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_explicit_citation_wins_over_docs() {
        let site = CitationSite::function("app::f")
            .with_docs("Citation: From docs")
            .with_citation("Explicit");
        let entry = site.to_entry(&DocstringExtractor::default());
        assert_eq!(entry.to_string(), "app::f: Explicit");
    }

    #[test]
    fn test_docs_section_extracted() {
        let site = CitationSite::function("app::f")
            .with_label("fallback")
            .with_docs("Does things.\n\nCitation: Doe 2021");
        let entry = site.to_entry(&DocstringExtractor::default());
        assert_eq!(entry.to_string(), "app::f: Doe 2021");
        assert_eq!(entry.label.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_whole_docs_when_no_section() {
        let site = CitationSite::class("app::Model").with_docs(" A model. ");
        let entry = site.to_entry(&DocstringExtractor::default());
        assert_eq!(entry.kind, CitationKind::Class);
        assert_eq!(entry.to_string(), "app::Model: A model.");
    }

    #[test]
    fn test_label_when_no_docs() {
        let site = CitationSite::function("app::f").with_label("function_citation_1");
        let entry = site.to_entry(&DocstringExtractor::default());
        assert_eq!(entry.to_string(), "app::f: function_citation_1");

        let bare = CitationSite::function("app::g").to_entry(&DocstringExtractor::default());
        assert_eq!(bare.to_string(), "app::g: No citation provided.");
    }

    #[test]
    fn test_track_used_flag_carried() {
        let site = CitationSite::function("app::f").with_track_used(false);
        assert!(!site.is_tracked());
        assert!(!site.to_entry(&DocstringExtractor::default()).track_used);
    }

    #[test]
    fn test_first_use_only_once() {
        let site = CitationSite::function("app::f");
        assert!(site.first_use());
        assert!(!site.first_use());
        assert!(!site.first_use());
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(
            qualified_name("my_crate::solver::solve_citation::__citecompass_marker", "solve"),
            "my_crate::solver::solve"
        );
        assert_eq!(
            qualified_name("<a::B as a::Run>::run_citation::__citecompass_marker", "run"),
            "<a::B as a::Run>::run"
        );
        assert_eq!(
            qualified_name(
                "app::<impl app::solver::Solver>::step_citation::__citecompass_marker",
                "step"
            ),
            "app::solver::Solver::step"
        );
        assert_eq!(
            qualified_name("app::<impl app::Solver>::step::__citecompass_site", "step"),
            "app::Solver::step"
        );
        assert_eq!(
            qualified_name("<app::Euler as app::Stepper>::advance::__citecompass_site", "advance"),
            "<app::Euler as app::Stepper>::advance"
        );
        assert_eq!(qualified_name("marker", "solve"), "solve");
    }
}
