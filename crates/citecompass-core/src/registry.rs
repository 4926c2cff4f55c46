//! The citation registry: every known entry plus the set of used ones.
//!
//! Entries are kept in registration order so that reports are stable and
//! traceable across runs. The `used` set only grows and is always a subset of
//! the known entries.

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::docstring::DocstringExtractor;
use crate::entry::{CitationEntry, CitationKind};

/// Known and used citation entries.
#[derive(Debug, Default)]
pub struct CitationRegistry {
    entries: IndexMap<String, CitationEntry>,
    used: HashSet<String>,
    extractor: DocstringExtractor,
}

impl CitationRegistry {
    /// Create an empty registry with the default extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry using the given docstring extractor.
    pub fn with_extractor(extractor: DocstringExtractor) -> Self {
        Self {
            extractor,
            ..Self::default()
        }
    }

    /// The extractor applied to docstrings of registered sites.
    pub fn extractor(&self) -> &DocstringExtractor {
        &self.extractor
    }

    /// Replace the extractor. Entries registered earlier keep their text.
    pub fn set_extractor(&mut self, extractor: DocstringExtractor) {
        self.extractor = extractor;
    }

    /// Insert or update an entry.
    ///
    /// Re-registering an identity keeps its original position and replaces
    /// its label, citation and flags (last write wins). Used membership is
    /// never cleared. Untracked entries are marked used immediately.
    pub fn register(&mut self, entry: CitationEntry) {
        let identity = entry.identity.clone();
        if entry.track_used {
            debug!(%identity, kind = %entry.kind, "registered citation");
        } else {
            debug!(%identity, kind = %entry.kind, "registered untracked citation, assuming used");
            self.used.insert(identity.clone());
        }

        if let Some(existing) = self.entries.get_mut(&identity) {
            if *existing != entry {
                warn!(%identity, kind = %entry.kind, "duplicated citation identity, replacing earlier entry");
            }
            *existing = entry;
        } else {
            self.entries.insert(identity, entry);
        }
    }

    /// Replace the text of an already known entry without treating it as a
    /// duplicate. Unknown identities are ignored.
    pub fn refresh(&mut self, entry: CitationEntry) {
        if let Some(existing) = self.entries.get_mut(&entry.identity) {
            *existing = entry;
        }
    }

    /// Mark a known identity as used.
    ///
    /// Returns the entry when it is known and tracked, so the caller can
    /// record it in any open contexts. Unknown identities are ignored.
    pub fn mark_used(&mut self, identity: &str) -> Option<&CitationEntry> {
        let Some(entry) = self.entries.get(identity) else {
            debug!(identity, "ignoring use of unregistered citation");
            return None;
        };
        if self.used.insert(identity.to_string()) {
            debug!(identity, "citation used");
        }
        entry.track_used.then_some(entry)
    }

    /// Formatted `identity: citation` strings for every known entry, in
    /// registration order.
    ///
    /// With `include_imports = false`, modules registered without citation
    /// text are left out.
    pub fn all_citations(&self, include_imports: bool) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| include_imports || !e.import_marker)
            .map(ToString::to_string)
            .collect()
    }

    /// Like [`all_citations`](Self::all_citations), restricted to used entries.
    pub fn used_citations(&self, include_imports: bool) -> Vec<String> {
        self.used_entries()
            .filter(|e| include_imports || !e.import_marker)
            .map(ToString::to_string)
            .collect()
    }

    /// Identities of every module entry, in registration order.
    pub fn all_imports(&self) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| e.kind == CitationKind::Module)
            .map(|e| e.identity.clone())
            .collect()
    }

    /// Like [`all_imports`](Self::all_imports), keeping only modules whose
    /// citation text mentions one of the extractor keywords.
    pub fn keyword_imports(&self) -> Vec<String> {
        self.entries
            .values()
            .filter(|e| e.kind == CitationKind::Module)
            .filter(|e| self.extractor.mentions_keyword(e.citation.as_deref()))
            .map(|e| e.identity.clone())
            .collect()
    }

    /// Look up an entry by identity.
    pub fn entry(&self, identity: &str) -> Option<&CitationEntry> {
        self.entries.get(identity)
    }

    /// All entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &CitationEntry> {
        self.entries.values()
    }

    /// Used entries in registration order.
    pub fn used_entries(&self) -> impl Iterator<Item = &CitationEntry> {
        self.entries
            .values()
            .filter(|e| self.used.contains(&e.identity))
    }

    pub fn is_known(&self, identity: &str) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn is_used(&self, identity: &str) -> bool {
        self.used.contains(identity)
    }

    /// Number of known entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
