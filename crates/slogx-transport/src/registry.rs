//! Registry of open viewer sessions.
//!
//! # Design
//! - The registry owns the only sender of each session queue; removing a
//!   session drops it, which ends that session's writer.
//! - Broadcast iterates under the read lock and never awaits. Full queues drop
//!   the frame for that session only; closed queues are removed afterwards
//!   under the write lock.
//! - Poisoned locks are recovered; a panic elsewhere must not silence logging.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use slogx_telemetry::Metrics;
use tokio::sync::mpsc::{self, Receiver, Sender, error::TrySendError};
use tracing::debug;

/// Identifier assigned to each accepted viewer.
pub type SessionId = u64;

struct Session {
    sender: Sender<Arc<str>>,
    peer: SocketAddr,
}

/// Outcome of offering one payload to every open session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Sessions whose queue accepted the payload.
    pub delivered: usize,
    /// Sessions that skipped the payload because their queue was full.
    pub dropped: usize,
    /// Sessions found closed and removed.
    pub closed: usize,
}

/// Open viewer sessions keyed by id.
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Session>>,
    next_id: AtomicU64,
    queue_capacity: usize,
    metrics: Metrics,
}

impl SessionRegistry {
    /// Empty registry whose sessions buffer up to `queue_capacity` payloads.
    #[must_use]
    pub fn new(queue_capacity: usize, metrics: Metrics) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            queue_capacity: queue_capacity.max(1),
            metrics,
        }
    }

    /// Register a viewer and hand back the receiving end of its queue.
    pub fn open(&self, peer: SocketAddr) -> (SessionId, Receiver<Arc<str>>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        self.write().insert(id, Session { sender, peer });
        self.metrics.session_opened();
        debug!(session = id, %peer, "viewer session opened");
        (id, receiver)
    }

    /// Remove a session. Returns `false` when it was already gone.
    pub fn close(&self, id: SessionId) -> bool {
        let Some(session) = self.write().remove(&id) else {
            return false;
        };
        self.metrics.session_closed();
        debug!(session = id, peer = %session.peer, "viewer session closed");
        true
    }

    /// Number of open sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no session is open.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Metrics shared with the sessions.
    #[must_use]
    pub const fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Offer `payload` to every open session without waiting.
    pub fn broadcast(&self, payload: &Arc<str>) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut closed = Vec::new();
        {
            let sessions = self.read();
            for (id, session) in sessions.iter() {
                match session.sender.try_send(Arc::clone(payload)) {
                    Ok(()) => report.delivered += 1,
                    Err(TrySendError::Full(_)) => report.dropped += 1,
                    Err(TrySendError::Closed(_)) => closed.push(*id),
                }
            }
        }
        if report.dropped > 0 {
            self.metrics
                .add_frames_dropped(u64::try_from(report.dropped).unwrap_or(u64::MAX));
        }
        report.closed = closed.into_iter().filter(|id| self.close(*id)).count();
        report
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SessionId, Session>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.len())
            .field("queue_capacity", &self.queue_capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddrV4};

    use super::*;

    fn peer(port: u16) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, port))
    }

    fn registry(capacity: usize) -> SessionRegistry {
        SessionRegistry::new(capacity, Metrics::new().expect("metrics registry"))
    }

    #[test]
    fn broadcasting_without_sessions_writes_nothing() {
        let registry = registry(4);
        let report = registry.broadcast(&Arc::from("{}"));
        assert_eq!(report, BroadcastReport::default());
        assert!(registry.is_empty());
    }

    #[test]
    fn closed_session_is_skipped_and_removed() {
        let registry = registry(4);
        let (_, mut first) = registry.open(peer(1));
        let (_, second) = registry.open(peer(2));
        let (_, mut third) = registry.open(peer(3));
        drop(second);

        let payload: Arc<str> = Arc::from(r#"{"id":"1"}"#);
        let report = registry.broadcast(&payload);

        assert_eq!(report.delivered, 2);
        assert_eq!(report.closed, 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(first.try_recv().expect("first receives").as_ref(), r#"{"id":"1"}"#);
        assert_eq!(third.try_recv().expect("third receives").as_ref(), r#"{"id":"1"}"#);
        assert_eq!(registry.metrics().snapshot().sessions_closed_total, 1);
    }

    #[test]
    fn full_queue_drops_only_for_that_session() {
        let registry = registry(1);
        let (_, mut slow) = registry.open(peer(1));
        let payload: Arc<str> = Arc::from("a");
        assert_eq!(registry.broadcast(&payload).delivered, 1);

        let (_, mut fresh) = registry.open(peer(2));
        let report = registry.broadcast(&Arc::from("b"));
        assert_eq!(report.delivered, 1);
        assert_eq!(report.dropped, 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(slow.try_recv().expect("buffered").as_ref(), "a");
        assert_eq!(fresh.try_recv().expect("delivered").as_ref(), "b");
        assert_eq!(registry.metrics().snapshot().frames_dropped_total, 1);
    }

    #[test]
    fn close_is_idempotent() {
        let registry = registry(2);
        let (id, _queue) = registry.open(peer(1));
        assert!(registry.close(id));
        assert!(!registry.close(id));
        let snapshot = registry.metrics().snapshot();
        assert_eq!(snapshot.sessions_open, 0);
        assert_eq!(snapshot.sessions_opened_total, 1);
        assert_eq!(snapshot.sessions_closed_total, 1);
    }

    #[test]
    fn removing_a_session_ends_its_queue() {
        let registry = registry(2);
        let (id, mut queue) = registry.open(peer(1));
        registry.close(id);
        assert!(matches!(
            queue.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
