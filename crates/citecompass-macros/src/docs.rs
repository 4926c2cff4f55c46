//! Reading `///` documentation from item attributes.

use syn::{Attribute, Expr, ExprLit, Lit, Meta};

/// Join an item's `#[doc = "..."]` attributes into one docstring.
///
/// Each `///` line contributes one line, with the single leading space that
/// rustdoc inserts removed. Returns `None` for undocumented items.
pub fn doc_string(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value()),
                _ => None,
            },
            _ => None,
        })
        .flat_map(|doc| {
            // `split` rather than `lines`: an empty `///` line must stay a blank line.
            doc.split('\n')
                .map(|line| {
                    let line = line.strip_suffix('\r').unwrap_or(line);
                    line.strip_prefix(' ').unwrap_or(line).to_string()
                })
                .collect::<Vec<_>>()
        })
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
