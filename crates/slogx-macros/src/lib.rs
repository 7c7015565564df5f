#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Derive macro backing `slogx::Inspect`.
//!
//! Layout: `attr.rs` (container/field attribute parsing), `inspect.rs` (expansion).

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attr;
mod inspect;

/// Derives `Inspect`, rendering every field regardless of visibility.
///
/// Attributes:
/// * `#[inspect(crate = "path")]` on the type: runtime crate path (default `::slogx`)
/// * `#[inspect(skip)]` on a field: leave the field out
/// * `#[inspect(rename = "name")]` on a field or variant: key used in the output
///
/// ```ignore
/// #[derive(slogx::Inspect)]
/// struct Session {
///     user: String,
///     token: String, // private fields are included
///     #[inspect(skip)]
///     scratch: Vec<u8>,
/// }
/// ```
#[proc_macro_derive(Inspect, attributes(inspect))]
pub fn derive_inspect(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    inspect::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
