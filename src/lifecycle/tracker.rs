//! Completion tracking for background work.
//!
//! # Responsibilities
//! - Count in-flight background tasks spawned by started components
//! - Register a task before it is spawned, release it when the task exits
//! - Let the top-level caller wait until every task has finished

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

/// Shared counter of background tasks, cloned into every component started
/// in one `run_all` call.
#[derive(Debug, Clone, Default)]
pub struct WorkTracker {
    inner: Arc<TrackerInner>,
}

#[derive(Debug, Default)]
struct TrackerInner {
    active: AtomicUsize,
    idle: Notify,
}

impl WorkTracker {
    /// Create a tracker with no registered work.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one unit of work. Returns a guard that releases it on drop.
    pub fn track(&self) -> WorkGuard {
        self.inner.active.fetch_add(1, Ordering::SeqCst);
        WorkGuard {
            tracker: self.clone(),
        }
    }

    /// Spawn `future` on the current runtime, counted until it completes.
    ///
    /// The count is taken before the task is spawned, so a caller that checks
    /// `active()` right after this returns always sees the new task.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let guard = self.track();
        tokio::spawn(async move {
            let _guard = guard;
            future.await
        })
    }

    /// Current number of in-flight tasks.
    pub fn active(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Wait until no work is registered.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register interest before checking, so a release between the
            // check and the await is not lost.
            notified.as_mut().enable();

            if self.active() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Guard for one unit of registered work.
/// Decrements the tracker when dropped, including on panic unwind.
#[derive(Debug)]
pub struct WorkGuard {
    tracker: WorkTracker,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.tracker.inner.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.tracker.inner.idle.notify_waiters();
        }
    }
}
