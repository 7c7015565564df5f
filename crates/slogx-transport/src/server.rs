//! Listener and upgrade route for viewer connections.
//!
//! # Design
//! - Binding is separate from serving so callers learn about port conflicts
//!   before any task is spawned.
//! - Upgrades are accepted on `/` from any origin, without authentication.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{ConnectInfo, State};
use axum::response::Response;
use axum::routing::get;
use slogx_config::Config;
use slogx_telemetry::Metrics;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::broadcaster::Broadcaster;
use crate::error::{TransportError, TransportResult};
use crate::registry::SessionRegistry;
use crate::{quiet, session};

#[derive(Clone)]
struct ServerState {
    registry: Arc<SessionRegistry>,
    max_batch: usize,
}

/// Bound, not yet serving, log server.
#[derive(Debug)]
pub struct LogServer {
    listener: TcpListener,
    local_addr: SocketAddr,
    registry: Arc<SessionRegistry>,
    max_batch: usize,
}

impl LogServer {
    /// Bind the listener described by `config` with a fresh metrics registry.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Bind`] when the port cannot be bound, and
    /// [`TransportError::Metrics`] if the metrics registry cannot be built.
    pub async fn bind(config: &Config) -> TransportResult<Self> {
        let metrics = Metrics::new().map_err(|source| TransportError::Metrics { source })?;
        Self::bind_with_metrics(config, metrics).await
    }

    /// Bind the listener described by `config`, recording into `metrics`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Bind`] when the port cannot be bound.
    pub async fn bind_with_metrics(config: &Config, metrics: Metrics) -> TransportResult<Self> {
        let listener = TcpListener::bind(config.socket_addr())
            .await
            .map_err(|source| TransportError::Bind {
                port: config.port,
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| TransportError::LocalAddr { source })?;
        Ok(Self {
            listener,
            local_addr,
            registry: Arc::new(SessionRegistry::new(config.session_queue_capacity, metrics)),
            max_batch: config.max_batch,
        })
    }

    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Broadcaster for sessions accepted by this server.
    #[must_use]
    pub fn broadcaster(&self) -> Broadcaster {
        Broadcaster::new(Arc::clone(&self.registry))
    }

    /// Start accepting viewers on a background task.
    #[must_use]
    pub fn spawn(self) -> ServerHandle {
        let broadcaster = self.broadcaster();
        let local_addr = self.local_addr;
        let state = ServerState {
            registry: self.registry,
            max_batch: self.max_batch,
        };
        let router = Router::new()
            .route("/", get(upgrade))
            .layer(TraceLayer::new_for_http())
            .with_state(state);
        let listener = self.listener;

        info!(addr = %local_addr, "log server listening");
        let task = tokio::spawn(quiet::scope(async move {
            let service = router.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(error) = axum::serve(listener, service).await {
                warn!(%error, "log server stopped");
            }
        }));

        ServerHandle {
            local_addr,
            broadcaster,
            task,
        }
    }
}

async fn upgrade(
    ws: WebSocketUpgrade,
    State(state): State<ServerState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Response {
    ws.on_upgrade(move |socket| {
        quiet::scope(session::run(
            socket,
            peer,
            state.registry,
            state.max_batch,
        ))
    })
}

/// Running log server.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    broadcaster: Broadcaster,
    task: JoinHandle<()>,
}

impl ServerHandle {
    /// Address the listener is bound to.
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Broadcaster for the server's sessions.
    #[must_use]
    pub const fn broadcaster(&self) -> &Broadcaster {
        &self.broadcaster
    }

    /// Whether the accept loop has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop accepting viewers. Sessions already open keep running until they
    /// close.
    pub fn abort(&self) {
        self.task.abort();
    }
}
