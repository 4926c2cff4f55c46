//! Citation entries: the unit stored in the registry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::docstring::extract_urls;

/// Citation text used when an entry has neither citation text nor a label.
pub const NO_CITATION: &str = "No citation provided.";

/// What kind of item an entry cites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationKind {
    /// A free function or a method.
    Function,
    /// A type that opts in with `#[derive(CiteableType)]`.
    Class,
    /// A module or external dependency.
    Module,
    /// A specific object, cited by its type.
    Object,
}

impl fmt::Display for CitationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CitationKind::Function => "function",
            CitationKind::Class => "class",
            CitationKind::Module => "module",
            CitationKind::Object => "object",
        };
        f.write_str(s)
    }
}

/// A registered citable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationEntry {
    /// Qualified path of the cited item; the registry key.
    pub identity: String,
    /// Kind of item.
    pub kind: CitationKind,
    /// Optional user-defined label.
    pub label: Option<String>,
    /// Citation text from an explicit argument or the item's docs.
    pub citation: Option<String>,
    /// Whether uses are tracked. Untracked entries count as used from the
    /// moment they are registered.
    pub track_used: bool,
    /// Set on module entries registered without citation text.
    pub import_marker: bool,
    /// URLs found in the resolved citation text.
    pub urls: Vec<String>,
}

impl CitationEntry {
    /// Create an entry. Empty citation text and labels are treated as absent.
    pub fn new(
        identity: impl Into<String>,
        kind: CitationKind,
        citation: Option<String>,
        label: Option<String>,
    ) -> Self {
        let citation = citation.filter(|c| !c.trim().is_empty());
        let label = label.filter(|l| !l.trim().is_empty());
        let mut entry = Self {
            identity: identity.into(),
            kind,
            label,
            citation,
            track_used: true,
            import_marker: false,
            urls: Vec::new(),
        };
        entry.urls = extract_urls(entry.citation_text());
        entry
    }

    /// A module entry. Without citation text it is a bare import marker.
    pub fn module(name: impl Into<String>, citation: Option<String>) -> Self {
        let mut entry = Self::new(name, CitationKind::Module, citation, None);
        entry.import_marker = entry.citation.is_none();
        entry
    }

    /// Set the `track_used` flag.
    pub fn with_track_used(mut self, track_used: bool) -> Self {
        self.track_used = track_used;
        self
    }

    /// The citation text shown for this entry: the citation, else the label,
    /// else [`NO_CITATION`].
    pub fn citation_text(&self) -> &str {
        self.citation
            .as_deref()
            .or(self.label.as_deref())
            .unwrap_or(NO_CITATION)
    }
}

impl fmt::Display for CitationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.identity, self.citation_text())
    }
}
