//! Hands built entries to every open session.

use std::sync::Arc;

use slogx_entry::LogEntry;
use slogx_telemetry::Metrics;
use tracing::warn;

use crate::quiet;
use crate::registry::{BroadcastReport, SessionRegistry};

/// Cloneable handle used by loggers to publish entries.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<SessionRegistry>,
}

impl Broadcaster {
    /// Broadcaster over `registry`.
    #[must_use]
    pub const fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Whether at least one viewer is connected.
    #[must_use]
    pub fn has_sessions(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Number of connected viewers.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Transport metrics.
    #[must_use]
    pub fn metrics(&self) -> &Metrics {
        self.registry.metrics()
    }

    /// Encode `entry` once and offer it to every session.
    ///
    /// With no viewers this returns immediately without encoding. The thread
    /// stays marked by [`quiet::enter`] while the entry is delivered.
    pub fn broadcast(&self, entry: &LogEntry) -> BroadcastReport {
        if !self.has_sessions() {
            return BroadcastReport::default();
        }
        let _quiet = quiet::enter();
        let text = match entry.to_json() {
            Ok(text) => text,
            Err(error) => {
                warn!(entry = %entry.id, %error, "failed to encode log entry");
                return BroadcastReport::default();
            }
        };
        self.metrics().inc_entries_broadcast();
        self.registry.broadcast(&Arc::from(text))
    }
}
