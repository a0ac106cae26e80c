//! Integration tests for the Worker module

use super::*;
use crate::completion::CompletionCounter;
use crate::request::{PendingRequest, QueryRequest};
use crate::traits::{ExecutorError, QueryExecutor};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Mock QueryExecutor
// ============================================================================

struct MockExecutor {
    delay: Option<Duration>,
    failing_host: Option<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl MockExecutor {
    fn new() -> Self {
        Self {
            delay: None,
            failing_host: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn failing_for(mut self, host: &str) -> Self {
        self.failing_host = Some(host.to_string());
        self
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    fn name(&self) -> &str {
        "mock"
    }

    async fn execute(&self, request: &QueryRequest) -> Result<(), ExecutorError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.host.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_host.as_deref() == Some(request.host.as_str()) {
            return Err(ExecutorError::Query("simulated failure".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Helper functions
// ============================================================================

fn request(host: &str) -> QueryRequest {
    let start = Utc.with_ymd_and_hms(2017, 1, 1, 8, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2017, 1, 1, 9, 0, 0).unwrap();
    QueryRequest::new(host, start, end)
}

struct Harness {
    worker: Worker,
    inbox_tx: mpsc::Sender<PendingRequest>,
    samples_rx: mpsc::Receiver<Duration>,
    completion: CompletionCounter,
}

fn create_test_worker(executor: Arc<dyn QueryExecutor>) -> Harness {
    let (inbox_tx, inbox_rx) = mpsc::channel(16);
    let (samples_tx, samples_rx) = mpsc::channel(16);
    let completion = CompletionCounter::new();

    let worker = WorkerBuilder::new(7)
        .executor(executor)
        .inbox(inbox_rx)
        .samples_tx(samples_tx)
        .build()
        .expect("Failed to build worker");

    Harness {
        worker,
        inbox_tx,
        samples_rx,
        completion,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_worker_reports_samples_for_successes() {
    let executor = Arc::new(MockExecutor::new());
    let mut h = create_test_worker(executor.clone());
    assert!(format!("{:?}", h.worker).contains("id: 7"));

    for host in ["a", "b", "a"] {
        h.inbox_tx
            .send(PendingRequest::new(request(host), h.completion.submit()))
            .await
            .unwrap();
    }
    drop(h.inbox_tx);

    let stats = h.worker.run().await;

    assert_eq!(stats.completed, 3);
    assert_eq!(stats.errors, 0);
    assert_eq!(stats.hosts, 2);
    assert!(stats.ended_at.is_some());

    let mut samples = 0;
    while h.samples_rx.try_recv().is_ok() {
        samples += 1;
    }
    assert_eq!(samples, 3);

    // Successes are resolved by the collector, not the worker.
    assert_eq!(h.completion.outstanding(), 3);
}

#[tokio::test]
async fn test_worker_resolves_failures_without_sample() {
    let executor = Arc::new(MockExecutor::new().failing_for("bad"));
    let mut h = create_test_worker(executor);

    for host in ["good", "bad", "good"] {
        h.inbox_tx
            .send(PendingRequest::new(request(host), h.completion.submit()))
            .await
            .unwrap();
    }
    drop(h.inbox_tx);

    let stats = h.worker.run().await;

    assert_eq!(stats.completed, 2);
    assert_eq!(stats.errors, 1);

    let mut samples = 0;
    while h.samples_rx.try_recv().is_ok() {
        samples += 1;
    }
    assert_eq!(samples, 2);

    // Only the failure was resolved by the worker itself.
    assert_eq!(h.completion.outstanding(), 2);
}

#[tokio::test]
async fn test_worker_processes_in_fifo_order_one_at_a_time() {
    let executor = Arc::new(MockExecutor::new().with_delay(Duration::from_millis(5)));
    let h = create_test_worker(executor.clone());

    let hosts = ["h1", "h2", "h3", "h1", "h4"];
    for host in hosts {
        h.inbox_tx
            .send(PendingRequest::new(request(host), h.completion.submit()))
            .await
            .unwrap();
    }
    drop(h.inbox_tx);

    let run = tokio::spawn(h.worker.run());
    let stats = run.await.expect("worker panicked");

    assert_eq!(stats.completed, hosts.len());
    assert_eq!(executor.seen(), hosts.to_vec());
    assert_eq!(executor.max_in_flight.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_worker_resolves_when_sample_channel_closed() {
    let executor = Arc::new(MockExecutor::new());
    let h = create_test_worker(executor);
    drop(h.samples_rx);

    h.inbox_tx
        .send(PendingRequest::new(request("orphan"), h.completion.submit()))
        .await
        .unwrap();
    drop(h.inbox_tx);

    let stats = h.worker.run().await;

    assert_eq!(stats.completed, 1);
    assert!(h.completion.is_idle());
}

#[tokio::test]
async fn test_worker_stops_on_closed_empty_inbox() {
    let executor = Arc::new(MockExecutor::new());
    let h = create_test_worker(executor);
    drop(h.inbox_tx);

    let stats = tokio::time::timeout(Duration::from_secs(1), h.worker.run())
        .await
        .expect("worker should stop when its inbox closes");

    assert_eq!(stats.total_requests(), 0);
    assert!(h.completion.is_idle());
}
