//! Worker execution loop

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::request::PendingRequest;
use crate::traits::QueryExecutor;

use super::stats::WorkerStats;

/// Worker executes the requests routed to it: receive -> execute -> report -> repeat
///
/// Each worker owns one inbox and handles it strictly in order, one query at a
/// time. Since the dispatcher pins every host to a single worker, queries for
/// the same host never overlap.
pub struct Worker {
    /// Pool slot of this worker
    id: usize,

    /// Query executor (shared across workers via Arc)
    executor: Arc<dyn QueryExecutor>,

    /// Requests routed to this worker
    inbox: mpsc::Receiver<PendingRequest>,

    /// Latency samples for the collector
    samples_tx: mpsc::Sender<Duration>,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        executor: Arc<dyn QueryExecutor>,
        inbox: mpsc::Receiver<PendingRequest>,
        samples_tx: mpsc::Sender<Duration>,
    ) -> Self {
        Self {
            id,
            executor,
            inbox,
            samples_tx,
        }
    }

    /// Run the worker loop
    ///
    /// Returns once the inbox has been closed and drained.
    pub async fn run(mut self) -> WorkerStats {
        let mut stats = WorkerStats::new();
        let mut hosts = HashSet::new();
        stats.start();

        tracing::debug!(worker_id = self.id, "Worker started");

        while let Some(pending) = self.inbox.recv().await {
            // Dropping the guard resolves the request; it is only disarmed
            // once the collector owns the sample.
            let (request, guard) = pending.into_parts();
            if !hosts.contains(&request.host) {
                hosts.insert(request.host.clone());
            }

            let start = Instant::now();
            let result = self.executor.execute(&request).await;
            let elapsed = start.elapsed();

            match result {
                Ok(()) => {
                    stats.record_success(elapsed);
                    if self.samples_tx.send(elapsed).await.is_ok() {
                        guard.disarm();
                    } else {
                        tracing::warn!(
                            worker_id = self.id,
                            host = %request.host,
                            "Sample channel closed, latency dropped"
                        );
                    }
                }
                Err(e) => {
                    stats.record_error(elapsed);
                    tracing::warn!(
                        worker_id = self.id,
                        host = %request.host,
                        error = %e,
                        "Could not execute query"
                    );
                    drop(guard);
                }
            }
        }

        stats.hosts = hosts.len();
        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            completed = stats.completed,
            errors = stats.errors,
            hosts = stats.hosts,
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        stats
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("executor", &self.executor.name())
            .finish()
    }
}
