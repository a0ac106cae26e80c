//! Completion tracking for submitted requests
//!
//! Every submitted request bumps the counter once and must be resolved exactly
//! once, either by the collector (a latency sample arrived) or by the worker
//! (the query failed). The dispatcher waits for the counter to reach zero
//! before it tears down any channel.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: AtomicUsize,
    idle: Notify,
}

/// Counts requests that were submitted but not yet resolved
///
/// Cheap to clone; all clones share the same count.
#[derive(Debug, Clone, Default)]
pub struct CompletionCounter {
    inner: Arc<Inner>,
}

impl CompletionCounter {
    /// Create a counter with nothing outstanding
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more outstanding request
    ///
    /// The returned guard resolves the request when dropped; disarm it when
    /// resolution is handed to someone else.
    pub fn submit(&self) -> ResolveGuard {
        self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
        ResolveGuard {
            counter: self.clone(),
            armed: true,
        }
    }

    /// Resolve one outstanding request
    ///
    /// Wakes the waiter when the count drops to zero. Resolving with nothing
    /// outstanding is a protocol bug; it is logged and ignored.
    pub fn resolve(&self) {
        let previous = self
            .inner
            .outstanding
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));

        match previous {
            Ok(1) => self.inner.idle.notify_waiters(),
            Ok(_) => {}
            Err(_) => {
                tracing::error!("Completion counter resolved more times than submitted");
            }
        }
    }

    /// Number of requests still outstanding
    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::SeqCst)
    }

    /// Whether every submitted request has been resolved
    pub fn is_idle(&self) -> bool {
        self.outstanding() == 0
    }

    /// Wait until every submitted request has been resolved
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a wake between the check and the
            // await is not lost.
            notified.as_mut().enable();

            if self.is_idle() {
                return;
            }
            notified.await;
        }
    }
}

/// Resolves one outstanding request on drop
///
/// The guard travels with its request from submitter to worker. A failed
/// query simply drops it; a successful one disarms it once the sample has
/// been handed to the collector, which then resolves the request itself.
/// Requests lost in a closed channel resolve the same way.
#[derive(Debug)]
pub struct ResolveGuard {
    counter: CompletionCounter,
    armed: bool,
}

impl ResolveGuard {
    /// Hand responsibility for resolving the request to someone else
    pub fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for ResolveGuard {
    fn drop(&mut self) {
        if self.armed {
            self.counter.resolve();
        }
    }
}
