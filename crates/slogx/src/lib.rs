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

//! Stream structured log entries from a running service to a browser viewer.
//!
//! ```ignore
//! slogx::init(slogx::Config::new(cfg!(debug_assertions)).with_service_name("checkout")).await?;
//! slogx::info!("order placed", { "order": 42 }, cart);
//! slogx::error!("payment failed", err);
//! ```
//!
//! Layout: `global.rs` (process-wide logger and `init`), `logger.rs`
//! (`Logger`), `probe.rs` (argument classification), `layer.rs` (`tracing`
//! bridge), `macros.rs` (`debug!`/`info!`/`warn!`/`error!`), `error.rs`.

mod error;
mod global;
mod layer;
mod logger;
mod probe;

pub use error::{SlogxError, SlogxResult};
pub use global::{global, init, is_initialized, log, service_name, session_count};
pub use layer::SlogxLayer;
pub use logger::Logger;
pub use slogx_config::{Config, ConfigError};
pub use slogx_entry::{Arg, CaughtError, LogEntry, LogLevel};
pub use slogx_inspect::{Inspect, Inspector, from_serialize, inspect};
pub use slogx_telemetry::{LogFormat, LoggingConfig, MetricsSnapshot, init_logging};
pub use slogx_transport::TransportError;

#[doc(hidden)]
pub mod __private {
    pub use serde_json::{Map, Value, json};
    pub use slogx_entry::Arg;

    pub use crate::global::log_from;
    pub use crate::probe::{Probe, ViaDebug, ViaError, ViaInspect, ViaOpaque, ViaSerialize};
}

mod macros;
