//! Outstanding-work accounting for the crawl engine
//!
//! Every task is registered with [`WorkTracker::begin`] before it is spawned
//! and deregistered when its [`WorkGuard`] drops, panics included. Because a
//! parent only finishes after registering its children, the counter can only
//! reach zero once, when the whole crawl is done.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Counter of scheduled-but-unfinished crawl tasks
#[derive(Debug, Default)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    idle: Notify,
}

impl WorkTracker {
    /// Creates a tracker with no outstanding work
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers one unit of work
    ///
    /// Must be called before the task is spawned; the returned guard is
    /// moved into the task.
    pub fn begin(self: &Arc<Self>) -> WorkGuard {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        WorkGuard {
            tracker: Arc::clone(self),
        }
    }

    /// Number of registered units that have not finished
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// Resolves once no work is outstanding
    pub async fn wait_idle(&self) {
        loop {
            // Register interest before checking, so a finish in between is not lost
            let notified = self.idle.notified();
            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }

    fn finish(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }
}

/// Marks one unit of outstanding work; dropping it finishes the unit
#[derive(Debug)]
pub struct WorkGuard {
    tracker: Arc<WorkTracker>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        self.tracker.finish();
    }
}
