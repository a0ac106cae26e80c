//! Dispatcher execution logic

use std::sync::Arc;
use std::time::Instant;

use futures::{Stream, StreamExt};
use tokio::sync::{mpsc, oneshot};

use crate::channel::ChannelConfig;
use crate::collector::LatencyCollector;
use crate::completion::CompletionCounter;
use crate::config::SessionConfig;
use crate::error::{BenchError, BenchResult};
use crate::report::{finalize, LatencyReport};
use crate::request::{PendingRequest, QueryRequest};
use crate::traits::QueryExecutor;
use crate::worker::{WorkerBuilder, WorkerStats};

use super::aggregator::aggregate_worker_stats;
use super::builder::DispatcherBuilder;
use super::routing::HostRouter;

/// Dispatcher manages one dispatch session
///
/// Responsible for spawning the worker pool and the latency collector,
/// routing every request to the worker that owns its host, and running the
/// shutdown sequence once the request stream ends.
pub struct Dispatcher {
    /// Session configuration
    pub(crate) config: SessionConfig,

    /// Channel buffer sizes
    pub(crate) channels: ChannelConfig,

    /// Query executor (shared across workers)
    pub(crate) executor: Arc<dyn QueryExecutor>,

    /// Incoming requests from every submitter
    pub(crate) requests_rx: mpsc::Receiver<PendingRequest>,

    /// Outstanding request count shared with submitters, workers and collector
    pub(crate) completion: CompletionCounter,
}

impl Dispatcher {
    /// Create a new dispatcher
    ///
    /// Use `DispatcherBuilder` for a more ergonomic construction.
    pub(crate) fn new(
        config: SessionConfig,
        channels: ChannelConfig,
        executor: Arc<dyn QueryExecutor>,
        requests_rx: mpsc::Receiver<PendingRequest>,
        completion: CompletionCounter,
    ) -> Self {
        Self {
            config,
            channels,
            executor,
            requests_rx,
            completion,
        }
    }

    /// Get the session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the session on a background task
    ///
    /// The report is delivered exactly once through the returned receiver.
    /// Input ends when every `RequestSubmitter` clone has been dropped.
    pub fn spawn(self) -> ReportReceiver {
        let (report_tx, report_rx) = oneshot::channel();

        tokio::spawn(async move {
            match self.run().await {
                Ok(report) => {
                    if report_tx.send(report).is_err() {
                        tracing::debug!("Report receiver dropped before delivery");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Dispatch session failed");
                }
            }
        });

        ReportReceiver { rx: report_rx }
    }

    /// Run the session to completion on the current task
    ///
    /// Only returns once the request stream has ended and every submitted
    /// request has been resolved, so submitters must be driven concurrently.
    pub async fn run(mut self) -> BenchResult<LatencyReport> {
        let start = Instant::now();
        let pool_size = self.config.pool_size;

        tracing::info!(
            pool_size,
            executor = self.executor.name(),
            "Starting dispatch session"
        );

        let (samples_tx, samples_rx) = mpsc::channel(self.channels.sample_buffer);
        let collector = tokio::spawn(
            LatencyCollector::new(samples_rx, self.completion.clone()).collect(),
        );

        let mut inboxes = Vec::with_capacity(pool_size);
        let mut handles = Vec::with_capacity(pool_size);
        for worker_id in 0..pool_size {
            let (inbox_tx, inbox_rx) = mpsc::channel(self.channels.inbox_buffer);
            let worker = WorkerBuilder::new(worker_id)
                .executor(Arc::clone(&self.executor))
                .inbox(inbox_rx)
                .samples_tx(samples_tx.clone())
                .build()?;

            handles.push(tokio::spawn(worker.run()));
            inboxes.push(inbox_tx);
        }
        // Workers now hold the only sample senders; the collector stops
        // once the last of them finishes.
        drop(samples_tx);

        let mut router = HostRouter::new(pool_size);
        let mut dispatched = 0usize;
        while let Some(pending) = self.requests_rx.recv().await {
            let worker_id = router.route(&pending.request().host);
            if let Err(mpsc::error::SendError(lost)) = inboxes[worker_id].send(pending).await {
                // Dropping the request resolves it.
                tracing::error!(
                    worker_id,
                    host = %lost.request().host,
                    "Worker inbox closed, request dropped"
                );
                continue;
            }
            dispatched += 1;
        }

        tracing::debug!(
            dispatched,
            hosts = router.host_count(),
            outstanding = self.completion.outstanding(),
            "Request stream ended, waiting for outstanding queries"
        );

        self.completion.wait_idle().await;
        drop(inboxes);

        let worker_stats = join_workers(handles).await;
        let samples = collector.await.map_err(BenchError::task)?;
        let report = finalize(samples);

        let aggregated = aggregate_worker_stats(&worker_stats);
        tracing::info!(
            elapsed_secs = start.elapsed().as_secs_f64(),
            dispatched,
            hosts = router.host_count(),
            completed = aggregated.total_completed,
            errors = aggregated.total_errors,
            success_rate = aggregated.success_rate(),
            qps = aggregated.queries_per_second,
            "Dispatch session completed"
        );

        Ok(report)
    }
}

async fn join_workers(handles: Vec<tokio::task::JoinHandle<WorkerStats>>) -> Vec<WorkerStats> {
    let mut results = Vec::with_capacity(handles.len());
    for (worker_id, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(stats) => {
                tracing::debug!(
                    worker_id,
                    completed = stats.completed,
                    errors = stats.errors,
                    error_rate = stats.error_rate(),
                    hosts = stats.hosts,
                    utilization = stats.utilization(),
                    "Worker completed"
                );
                results.push(stats);
            }
            Err(e) => {
                tracing::error!(worker_id, error = %e, "Worker task panicked");
            }
        }
    }
    results
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("channels", &self.channels)
            .field("executor", &self.executor.name())
            .finish()
    }
}

/// Handle for feeding requests into a dispatch session
///
/// Cloneable. The session's input ends once every clone has been dropped.
#[derive(Debug, Clone)]
pub struct RequestSubmitter {
    pub(crate) sender: mpsc::Sender<PendingRequest>,
    pub(crate) completion: CompletionCounter,
}

impl RequestSubmitter {
    /// Submit a request, waiting while the request channel is full
    ///
    /// # Errors
    /// Returns an error if the dispatcher is no longer running. The request
    /// is not counted as outstanding in that case.
    pub async fn submit(&self, request: QueryRequest) -> BenchResult<()> {
        let pending = PendingRequest::new(request, self.completion.submit());
        self.sender
            .send(pending)
            .await
            .map_err(|e| rejected(e.0))
    }

    /// Blocking variant of [`submit`](Self::submit) for use outside the runtime
    ///
    /// # Panics
    /// Panics if called from within an asynchronous execution context.
    pub fn blocking_submit(&self, request: QueryRequest) -> BenchResult<()> {
        let pending = PendingRequest::new(request, self.completion.submit());
        self.sender
            .blocking_send(pending)
            .map_err(|e| rejected(e.0))
    }

    /// Number of requests submitted but not yet resolved
    pub fn outstanding(&self) -> usize {
        self.completion.outstanding()
    }
}

fn rejected(pending: PendingRequest) -> BenchError {
    BenchError::closed(format!("request for {} rejected", pending.request().host))
}

/// Single-use receiver for the session report
#[derive(Debug)]
pub struct ReportReceiver {
    rx: oneshot::Receiver<LatencyReport>,
}

impl ReportReceiver {
    /// Wait for the session report
    ///
    /// # Errors
    /// Returns `BenchError::ReportLost` if the session ended without one.
    pub async fn recv(self) -> BenchResult<LatencyReport> {
        self.rx.await.map_err(|_| BenchError::ReportLost)
    }
}

/// Run a complete session over a finite request stream
///
/// Validates the configuration, dispatches every request from `requests`,
/// and returns the aggregate report once all of them are resolved.
pub async fn run_session<S>(
    config: SessionConfig,
    executor: Arc<dyn QueryExecutor>,
    requests: S,
) -> BenchResult<LatencyReport>
where
    S: Stream<Item = QueryRequest>,
{
    let (dispatcher, submitter) = DispatcherBuilder::new()
        .config(config)
        .executor(executor)
        .build()?;
    let report_rx = dispatcher.spawn();

    futures::pin_mut!(requests);
    while let Some(request) = requests.next().await {
        submitter.submit(request).await?;
    }
    drop(submitter);

    report_rx.recv().await
}
