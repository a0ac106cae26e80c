//! Builder pattern for Worker construction

use crate::error::{BenchError, BenchResult};
use crate::request::PendingRequest;
use crate::traits::QueryExecutor;

use super::executor::Worker;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Builder for creating Worker instances
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .executor(executor)
///     .inbox(inbox_rx)
///     .samples_tx(samples_tx)
///     .build()?;
/// ```
pub struct WorkerBuilder {
    id: usize,
    executor: Option<Arc<dyn QueryExecutor>>,
    inbox: Option<mpsc::Receiver<PendingRequest>>,
    samples_tx: Option<mpsc::Sender<Duration>>,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            executor: None,
            inbox: None,
            samples_tx: None,
        }
    }

    /// Set the query executor
    pub fn executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the inbox receiver
    pub fn inbox(mut self, inbox: mpsc::Receiver<PendingRequest>) -> Self {
        self.inbox = Some(inbox);
        self
    }

    /// Set the sample channel sender
    pub fn samples_tx(mut self, tx: mpsc::Sender<Duration>) -> Self {
        self.samples_tx = Some(tx);
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> BenchResult<Worker> {
        let executor = self
            .executor
            .ok_or(BenchError::missing_config("executor"))?;
        let inbox = self.inbox.ok_or(BenchError::missing_config("inbox"))?;
        let samples_tx = self
            .samples_tx
            .ok_or(BenchError::missing_config("samples_tx"))?;

        Ok(Worker::new(self.id, executor, inbox, samples_tx))
    }
}
