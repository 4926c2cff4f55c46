//! Implementation of `#[derive(CiteableType)]`.
//!
//! Implements `citecompass_core::CiteableType` with a lazily built site whose
//! identity is the type's module path plus its name, and submits that site
//! through `inventory` so the type is known from process start.
//!
//! # Example
//!
//! ```ignore
//! /// Citation: Kalman, R. E. (1960).
//! #[derive(CiteableType)]
//! #[cite(label = "kalman")]
//! struct KalmanFilter {
//!     gain: f64,
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, LitStr, Result};

use crate::docs::doc_string;

struct CiteMeta {
    label: Option<String>,
    citation: Option<String>,
}

impl CiteMeta {
    fn parse(input: &DeriveInput) -> Result<Self> {
        let mut meta = CiteMeta {
            label: None,
            citation: None,
        };

        for attr in &input.attrs {
            if attr.path().is_ident("cite") {
                attr.parse_nested_meta(|nested| {
                    if nested.path.is_ident("label") {
                        let value = nested.value()?;
                        let lit: LitStr = value.parse()?;
                        meta.label = Some(lit.value());
                        Ok(())
                    } else if nested.path.is_ident("citation") {
                        let value = nested.value()?;
                        let lit: LitStr = value.parse()?;
                        meta.citation = Some(lit.value());
                        Ok(())
                    } else {
                        Err(nested.error("expected `label` or `citation`"))
                    }
                })?;
            }
        }

        Ok(meta)
    }
}

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "CiteableType cannot be derived for generic types",
        ));
    }

    let meta = CiteMeta::parse(&input)?;
    let name_str = name.to_string();

    let with_label = meta.label.as_ref().map(|l| quote! { .with_label(#l) });
    let with_citation = meta.citation.as_ref().map(|c| quote! { .with_citation(#c) });
    let with_docs = doc_string(&input.attrs).map(|d| quote! { .with_docs(#d) });

    Ok(quote! {
        impl ::citecompass_core::CiteableType for #name {
            fn citation_site() -> &'static ::citecompass_core::CitationSite {
                static SITE: ::std::sync::LazyLock<::citecompass_core::CitationSite> =
                    ::std::sync::LazyLock::new(|| {
                        ::citecompass_core::CitationSite::class(
                            ::std::concat!(::std::module_path!(), "::", #name_str),
                        )
                        #with_label
                        #with_citation
                        #with_docs
                    });
                &SITE
            }
        }

        ::citecompass_core::__private::inventory::submit! {
            ::citecompass_core::__private::SiteRegistration(
                <#name as ::citecompass_core::CiteableType>::citation_site,
            )
        }
    })
}
