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

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (ports, polling, logging), viewer.rs (WebSocket viewer client).

pub mod fixtures;
pub mod viewer;

pub use fixtures::{free_port, init_test_logging, wait_for};
pub use viewer::ViewerClient;
