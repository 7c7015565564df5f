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

//! WebSocket fan-out of log entries to connected viewers.
//!
//! Layout: `server.rs` (listener + upgrade route), `session.rs` (per-viewer
//! reader and writer tasks), `registry.rs` (open sessions and their queues),
//! `broadcaster.rs` (entry encoding and delivery), `quiet.rs` (markers that
//! let log bridges skip transport activity), `error.rs`.

pub mod broadcaster;
pub mod error;
pub mod quiet;
pub mod registry;
pub mod server;
mod session;

pub use broadcaster::Broadcaster;
pub use error::{TransportError, TransportResult};
pub use registry::{BroadcastReport, SessionId, SessionRegistry};
pub use server::{LogServer, ServerHandle};
