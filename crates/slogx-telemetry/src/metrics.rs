//! Prometheus-backed metrics for the log broadcast transport.
//!
//! # Design
//! - Each `Metrics` owns its registry so several servers (and tests) can coexist
//!   in one process.
//! - Exposes only the counters the transport updates: session churn, entries
//!   broadcast, frames written and frames dropped under back-pressure.

use std::sync::Arc;

use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{CollectorStage, Result, TelemetryError};

/// Prometheus-backed transport metrics.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    sessions_open: IntGauge,
    sessions_opened_total: IntCounter,
    sessions_closed_total: IntCounter,
    entries_broadcast_total: IntCounter,
    frames_sent_total: IntCounter,
    frames_dropped_total: IntCounter,
}

/// Snapshot of the transport counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Sessions currently registered.
    pub sessions_open: i64,
    /// Sessions accepted since start.
    pub sessions_opened_total: u64,
    /// Sessions removed since start.
    pub sessions_closed_total: u64,
    /// Entries handed to the broadcaster while at least one session was open.
    pub entries_broadcast_total: u64,
    /// WebSocket text frames written to viewers.
    pub frames_sent_total: u64,
    /// Per-session deliveries dropped because a queue was full.
    pub frames_dropped_total: u64,
}

fn counter(name: &'static str, help: &str) -> Result<IntCounter> {
    IntCounter::with_opts(Opts::new(name, help)).map_err(|source| TelemetryError::Collector {
        metric: name,
        stage: CollectorStage::Build,
        source,
    })
}

fn register<C>(registry: &Registry, name: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| TelemetryError::Collector {
            metric: name,
            stage: CollectorStage::Register,
            source,
        })
}

impl Metrics {
    /// Construct a registry with the transport collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be built or
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let sessions_open = IntGauge::with_opts(Opts::new(
            "slogx_sessions_open",
            "Viewer sessions currently connected",
        ))
        .map_err(|source| TelemetryError::Collector {
            metric: "slogx_sessions_open",
            stage: CollectorStage::Build,
            source,
        })?;
        let sessions_opened_total = counter(
            "slogx_sessions_opened_total",
            "Viewer sessions accepted",
        )?;
        let sessions_closed_total = counter(
            "slogx_sessions_closed_total",
            "Viewer sessions removed after close or failure",
        )?;
        let entries_broadcast_total = counter(
            "slogx_entries_broadcast_total",
            "Log entries offered to connected viewers",
        )?;
        let frames_sent_total = counter(
            "slogx_frames_sent_total",
            "WebSocket text frames written to viewers",
        )?;
        let frames_dropped_total = counter(
            "slogx_frames_dropped_total",
            "Entries dropped for a viewer whose queue was full",
        )?;

        register(&registry, "slogx_sessions_open", &sessions_open)?;
        register(&registry, "slogx_sessions_opened_total", &sessions_opened_total)?;
        register(&registry, "slogx_sessions_closed_total", &sessions_closed_total)?;
        register(&registry, "slogx_entries_broadcast_total", &entries_broadcast_total)?;
        register(&registry, "slogx_frames_sent_total", &frames_sent_total)?;
        register(&registry, "slogx_frames_dropped_total", &frames_dropped_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                sessions_open,
                sessions_opened_total,
                sessions_closed_total,
                entries_broadcast_total,
                frames_sent_total,
                frames_dropped_total,
            }),
        })
    }

    /// Record a newly registered session.
    pub fn session_opened(&self) {
        self.inner.sessions_opened_total.inc();
        self.inner.sessions_open.inc();
    }

    /// Record a session removed from the registry.
    pub fn session_closed(&self) {
        self.inner.sessions_closed_total.inc();
        self.inner.sessions_open.dec();
    }

    /// Record an entry offered to the open sessions.
    pub fn inc_entries_broadcast(&self) {
        self.inner.entries_broadcast_total.inc();
    }

    /// Record a frame written to a viewer socket.
    pub fn inc_frames_sent(&self) {
        self.inner.frames_sent_total.inc();
    }

    /// Record `count` deliveries dropped under back-pressure.
    pub fn add_frames_dropped(&self, count: u64) {
        self.inner.frames_dropped_total.inc_by(count);
    }

    /// Render the registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|source| TelemetryError::Exposition { source })?;
        String::from_utf8(buffer).map_err(|source| TelemetryError::ExpositionText { source })
    }

    /// Take a point-in-time snapshot of every counter.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            sessions_open: self.inner.sessions_open.get(),
            sessions_opened_total: self.inner.sessions_opened_total.get(),
            sessions_closed_total: self.inner.sessions_closed_total.get(),
            entries_broadcast_total: self.inner.entries_broadcast_total.get(),
            frames_sent_total: self.inner.frames_sent_total.get(),
            frames_dropped_total: self.inner.frames_dropped_total.get(),
        }
    }
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("snapshot", &self.snapshot())
            .finish()
    }
}
