//! Marks code that delivers log frames, so bridges from `tracing` or `log`
//! can skip the events it emits instead of turning them into new entries.
//!
//! Two markers are kept: a per-thread depth counter for synchronous
//! broadcasting, and a task-local set for the lifetime of each session task.

use std::cell::Cell;
use std::future::Future;

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

tokio::task_local! {
    static SESSION_TASK: ();
}

/// Whether the current thread is broadcasting or the current task serves a
/// viewer session.
#[must_use]
pub fn is_active() -> bool {
    DEPTH.with(Cell::get) > 0 || SESSION_TASK.try_with(|_| ()).is_ok()
}

/// Keeps the current thread marked until dropped.
#[derive(Debug)]
#[must_use = "the thread is only marked while the guard is alive"]
pub struct QuietGuard {
    _private: (),
}

/// Mark the current thread until the returned guard is dropped. Guards nest.
pub fn enter() -> QuietGuard {
    DEPTH.with(|depth| depth.set(depth.get() + 1));
    QuietGuard { _private: () }
}

impl Drop for QuietGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Run `future` with the session task marker set on every poll.
#[allow(clippy::redundant_pub_crate)]
pub(crate) async fn scope<F: Future>(future: F) -> F::Output {
    SESSION_TASK.scope((), future).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_nest_and_unwind() {
        assert!(!is_active());
        let outer = enter();
        let inner = enter();
        drop(inner);
        assert!(is_active());
        drop(outer);
        assert!(!is_active());
    }

    #[tokio::test]
    async fn session_scope_marks_only_its_own_task() {
        assert!(scope(async { is_active() }).await);
        let spawned = tokio::spawn(async { is_active() }).await;
        assert!(matches!(spawned, Ok(false)));
        assert!(!is_active());
    }
}
