//! Fuzz target for docstring citation extraction.
//!
//! Run with: cargo +nightly fuzz run fuzz_extractor
//!
//! Extraction must never fail: every docstring yields some text, and a found
//! section is never longer than the docstring it came from.

#![no_main]

use citecompass_core::{extract_citation, extract_urls, find_citation_section};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(doc) = std::str::from_utf8(data) {
        let extracted = extract_citation(Some(doc));
        assert!(extracted.len() <= doc.len());

        if let Some(section) = find_citation_section(doc) {
            assert!(section.len() <= doc.len());
        }

        for url in extract_urls(&extracted) {
            assert!(url.starts_with("http://") || url.starts_with("https://"));
        }
    }
});
