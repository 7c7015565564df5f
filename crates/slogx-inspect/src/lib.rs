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

//! Total conversion of in-memory values into JSON trees for the log viewer.
//!
//! Layout: `inspector.rs` (the `Inspect` trait and traversal context),
//! `placeholder.rs` (type naming and placeholder strings), `impls/` (standard
//! library and ecosystem implementations), `bridge.rs` (serde fallback).
//!
//! # Design
//! - Rust has no reflection, so every inspectable type implements [`Inspect`];
//!   user types get it from `#[derive(Inspect)]`, which includes private fields.
//! - Conversion never fails: anything that cannot be rendered faithfully becomes
//!   a short `<kind detail>` placeholder string.
//! - Shared aggregates are tracked by identity for the duration of one call so
//!   cyclic `Rc`/`Arc` graphs terminate with `"[circular]"`.

mod bridge;
mod impls;
mod inspector;
mod placeholder;

pub use bridge::from_serialize;
pub use impls::errors::error_value;
pub use inspector::{DEFAULT_MAX_DEPTH, Inspect, Inspector};
pub use placeholder::{
    CIRCULAR, MAX_DEPTH, error_type_name, placeholder, short_type_name, simplify_type_name,
};
pub use slogx_macros::Inspect;

use serde_json::Value;

/// Convert `value` into a JSON tree using a fresh [`Inspector`].
#[must_use]
pub fn inspect<T: Inspect + ?Sized>(value: &T) -> Value {
    Inspector::new().inspect_shared(value)
}

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{Map, Value};
}
