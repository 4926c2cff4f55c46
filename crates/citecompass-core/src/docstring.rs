//! Docstring citation extraction.
//!
//! Finds the citation-relevant part of a docstring. Two section layouts are
//! recognized, matched case-insensitively against a keyword list
//! (`citation`, `citations`, `reference`, `references` by default):
//!
//! ```text
//! Google style                 Numpy style
//!
//! Citation: Author, 2025.      References
//!                              ----------
//!                              Author, 2025.
//!                              Other, 2024.
//!
//!                              Parameters
//!                              ----------
//! ```
//!
//! The earliest matching section wins. When no section is present the whole
//! trimmed docstring is used instead, and an absent docstring yields an empty
//! string. Extraction never fails.

use std::sync::LazyLock;

use citecompass_config::ExtractorConfig;

static DEFAULT_EXTRACTOR: LazyLock<DocstringExtractor> = LazyLock::new(DocstringExtractor::default);

/// Extracts citation sections from docstrings using a configurable keyword list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocstringExtractor {
    /// Lowercased section keywords.
    keywords: Vec<String>,
}

impl DocstringExtractor {
    /// Create an extractor recognizing the given keywords (case-insensitive).
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_ascii_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// Build an extractor from the `[extractor]` config section.
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(&config.keywords)
    }

    /// The keywords this extractor recognizes, lowercased.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Return the citation text for a docstring.
    ///
    /// This is the citation section if one exists, otherwise the whole
    /// trimmed docstring, otherwise an empty string.
    pub fn extract(&self, docstring: Option<&str>) -> String {
        let Some(doc) = docstring else {
            return String::new();
        };
        self.find_section(doc)
            .unwrap_or_else(|| doc.trim().to_string())
    }

    /// Return the first citation section in `docstring`, if any.
    pub fn find_section(&self, docstring: &str) -> Option<String> {
        let lines: Vec<&str> = docstring.lines().map(str::trim).collect();

        for (idx, line) in lines.iter().enumerate() {
            if let Some(rest) = self.inline_header(line) {
                let rest = rest.trim();
                if !rest.is_empty() {
                    return Some(rest.to_string());
                }
                // "Citation:" alone on its line; the text follows as a paragraph.
                let mut body = Vec::new();
                for j in idx + 1..lines.len() {
                    if lines[j].is_empty() || self.is_section_header(&lines, j) {
                        break;
                    }
                    body.push(lines[j]);
                }
                return Some(body.join(" "));
            }

            if self.is_keyword(line) && lines.get(idx + 1).is_some_and(|next| is_underline(next)) {
                let start = idx + 2;
                let end = (start..lines.len())
                    .find(|&j| self.is_section_header(&lines, j))
                    .unwrap_or(lines.len());
                return Some(lines[start..end].join("\n").trim().to_string());
            }
        }

        None
    }

    /// Heuristic check for any keyword anywhere in the text, including the
    /// middle of a sentence.
    ///
    /// Useful to flag documentation that probably mentions a citation without
    /// using a recognized section layout.
    pub fn mentions_keyword(&self, docstring: Option<&str>) -> bool {
        let Some(doc) = docstring.filter(|d| !d.is_empty()) else {
            return false;
        };
        let lower = doc.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
    }

    /// If `line` starts with `keyword:`, return what follows the colon.
    fn inline_header<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.keywords.iter().find_map(|keyword| {
            let head = line.get(..keyword.len())?;
            if !head.eq_ignore_ascii_case(keyword) {
                return None;
            }
            line[keyword.len()..].strip_prefix(':')
        })
    }

    fn is_keyword(&self, line: &str) -> bool {
        self.keywords.iter().any(|k| line.eq_ignore_ascii_case(k))
    }

    /// Whether `lines[idx]` opens a section, citation-related or not.
    fn is_section_header(&self, lines: &[&str], idx: usize) -> bool {
        let line = lines[idx];
        if line.is_empty() || is_underline(line) {
            return false;
        }
        if lines.get(idx + 1).is_some_and(|next| is_underline(next)) {
            return true;
        }
        self.inline_header(line).is_some() || is_heading_line(line)
    }
}

impl Default for DocstringExtractor {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

/// A Numpy section underline: two or more dashes and nothing else.
fn is_underline(line: &str) -> bool {
    line.len() >= 2 && line.chars().all(|c| c == '-')
}

/// A Google section heading such as `Returns:` or `See also:`.
fn is_heading_line(line: &str) -> bool {
    let Some(name) = line.strip_suffix(':') else {
        return false;
    };
    name.starts_with(|c: char| c.is_alphabetic())
        && name.chars().all(|c| c.is_alphabetic() || c == ' ')
}

/// Extract citation text with the default keywords.
///
/// See [`DocstringExtractor::extract`].
pub fn extract_citation(docstring: Option<&str>) -> String {
    DEFAULT_EXTRACTOR.extract(docstring)
}

/// Find a citation section with the default keywords, without falling back
/// to the whole docstring.
pub fn find_citation_section(docstring: &str) -> Option<String> {
    DEFAULT_EXTRACTOR.find_section(docstring)
}

/// Check whether a docstring mentions any default keyword.
pub fn check_for_any_keyword(docstring: Option<&str>) -> bool {
    DEFAULT_EXTRACTOR.mentions_keyword(docstring)
}

/// Collect every `http://` or `https://` URL in a piece of citation text.
///
/// Surrounding brackets and trailing punctuation are stripped.
pub fn extract_urls(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|token| {
            let start = ["https://", "http://"]
                .iter()
                .filter_map(|scheme| token.find(scheme))
                .min()?;
            let url = token[start..].trim_end_matches(|c: char| {
                matches!(c, '.' | ',' | ';' | ':' | ')' | ']' | '>' | '"' | '\'')
            });
            url.split_once("://")
                .is_some_and(|(_, rest)| !rest.is_empty())
                .then(|| url.to_string())
        })
        .collect()
}
