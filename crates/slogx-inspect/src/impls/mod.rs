//! `Inspect` implementations for the standard library and the ecosystem types
//! the workspace depends on.

mod collections;
#[allow(clippy::redundant_pub_crate)]
pub(crate) mod errors;
mod external;
mod pointers;
mod primitives;
mod sync;
