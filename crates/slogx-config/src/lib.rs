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

//! Configuration for the slogx log streaming subsystem.
//!
//! Layout: `model.rs` (typed `Config` and builders), `defaults.rs` (default
//! values), `validate.rs` (field checks), `loader.rs` (environment loading),
//! `error.rs` (`ConfigError`).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    ENV_BIND_ADDR, ENV_DEV, ENV_MAX_BATCH, ENV_PORT, ENV_QUEUE_CAPACITY, ENV_SERVICE,
};
pub use model::Config;
