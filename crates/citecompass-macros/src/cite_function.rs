//! Implementation of `#[cite_function(...)]`.
//!
//! Wraps a function so that calling it records a use of its citation site,
//! and generates an accessor for that site.
//!
//! # Example
//!
//! ```ignore
//! /// Citation: Doe, J. (2020).
//! #[cite_function(label = "doe")]
//! pub fn estimate(x: f64) -> f64 {
//!     x * 2.0
//! }
//! ```
//!
//! Expands to:
//! - `pub fn estimate_citation() -> &'static CitationSite`, a lazily built
//!   site holding the qualified name, label, explicit citation and docs
//! - an `inventory` submission of that accessor, so the process-wide
//!   registry knows the function before it is first called
//! - the original function with a `record_use` prologue (omitted when
//!   `track_used = false`)
//!
//! Methods get no accessor; their site and submission sit at the top of the
//! method body.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{ItemFn, LitBool, LitStr, Result};

use crate::docs::doc_string;

struct CiteAttrs {
    label: Option<String>,
    citation: Option<String>,
    track_used: bool,
    method: bool,
}

impl CiteAttrs {
    fn parse(attr: proc_macro::TokenStream) -> Result<Self> {
        let attr_ts: proc_macro2::TokenStream = attr.into();
        let parsed = syn::parse2::<CiteAttrArgs>(quote! { (#attr_ts) })?;

        let mut attrs = CiteAttrs {
            label: None,
            citation: None,
            track_used: true,
            method: false,
        };

        for meta in parsed.metas {
            match meta {
                CiteMeta::Label(s) => attrs.label = Some(s),
                CiteMeta::Citation(s) => attrs.citation = Some(s),
                CiteMeta::TrackUsed(b) => attrs.track_used = b,
                CiteMeta::Method => attrs.method = true,
            }
        }

        Ok(attrs)
    }
}

enum CiteMeta {
    Label(String),
    Citation(String),
    TrackUsed(bool),
    Method,
}

struct CiteAttrArgs {
    metas: Vec<CiteMeta>,
}

impl syn::parse::Parse for CiteAttrArgs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let content;
        syn::parenthesized!(content in input);

        let mut metas = Vec::new();

        // `#[cite_function("label")]` shorthand.
        if content.peek(LitStr) {
            let lit: LitStr = content.parse()?;
            metas.push(CiteMeta::Label(lit.value()));
            if content.peek(syn::Token![,]) {
                content.parse::<syn::Token![,]>()?;
            }
        }

        while !content.is_empty() {
            let ident: syn::Ident = content.parse()?;

            if ident == "method" {
                metas.push(CiteMeta::Method);
            } else {
                content.parse::<syn::Token![=]>()?;
                if ident == "label" {
                    let lit: LitStr = content.parse()?;
                    metas.push(CiteMeta::Label(lit.value()));
                } else if ident == "citation" {
                    let lit: LitStr = content.parse()?;
                    metas.push(CiteMeta::Citation(lit.value()));
                } else if ident == "track_used" {
                    let lit: LitBool = content.parse()?;
                    metas.push(CiteMeta::TrackUsed(lit.value));
                } else {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "expected `label`, `citation`, `track_used`, or `method`",
                    ));
                }
            }

            if content.peek(syn::Token![,]) {
                content.parse::<syn::Token![,]>()?;
            }
        }

        Ok(CiteAttrArgs { metas })
    }
}

pub fn expand(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let attrs = match CiteAttrs::parse(attr) {
        Ok(a) => a,
        Err(e) => return e.to_compile_error().into(),
    };

    let func = match syn::parse::<ItemFn>(item) {
        Ok(f) => f,
        Err(e) => return e.to_compile_error().into(),
    };

    match expand_fn(attrs, func) {
        Ok(ts) => ts.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn expand_fn(attrs: CiteAttrs, func: ItemFn) -> Result<TokenStream> {
    if let Some(constness) = &func.sig.constness {
        return Err(syn::Error::new_spanned(
            constness,
            "cite_function cannot be applied to a const fn",
        ));
    }

    let ItemFn {
        attrs: fn_attrs,
        vis,
        sig,
        block,
    } = func;

    let fn_name = &sig.ident;
    let fn_name_str = fn_name.to_string();
    let stmts = &block.stmts;

    let with_label = attrs.label.as_ref().map(|l| quote! { .with_label(#l) });
    let with_citation = attrs.citation.as_ref().map(|c| quote! { .with_citation(#c) });
    let with_docs = doc_string(&fn_attrs).map(|d| quote! { .with_docs(#d) });
    let track_used = attrs.track_used;

    let site_body = |marker: TokenStream| {
        quote! {
            static SITE: ::std::sync::LazyLock<::citecompass_core::CitationSite> =
                ::std::sync::LazyLock::new(|| {
                    ::citecompass_core::CitationSite::function(
                        ::citecompass_core::__private::qualified_name(
                            ::std::any::type_name_of_val(&#marker),
                            #fn_name_str,
                        ),
                    )
                    #with_label
                    #with_citation
                    #with_docs
                    .with_track_used(#track_used)
                });
            &SITE
        }
    };

    // Methods may live in trait impls, which cannot take extra items, so
    // their site is declared inside the body instead of beside it.
    if attrs.method || sig.receiver().is_some() {
        let site = site_body(quote! { __citecompass_site });
        let record = track_used.then(|| {
            quote! { ::citecompass_core::record_use(__citecompass_site()); }
        });

        return Ok(quote! {
            #(#fn_attrs)*
            #vis #sig {
                fn __citecompass_site() -> &'static ::citecompass_core::CitationSite {
                    #site
                }
                ::citecompass_core::__private::inventory::submit! {
                    ::citecompass_core::__private::SiteRegistration(__citecompass_site)
                }
                #record
                #(#stmts)*
            }
        });
    }

    let accessor = format_ident!("{}_citation", fn_name);
    let accessor_doc = format!("Citation site of `{fn_name_str}`.");
    let site = site_body(quote! { __citecompass_marker });
    let record = track_used.then(|| {
        quote! { ::citecompass_core::record_use(#accessor()); }
    });

    Ok(quote! {
        #[doc = #accessor_doc]
        #[allow(dead_code)]
        #vis fn #accessor() -> &'static ::citecompass_core::CitationSite {
            fn __citecompass_marker() {}
            #site
        }

        ::citecompass_core::__private::inventory::submit! {
            ::citecompass_core::__private::SiteRegistration(#accessor)
        }

        #(#fn_attrs)*
        #vis #sig {
            #record
            #(#stmts)*
        }
    })
}
