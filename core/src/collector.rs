//! Latency sample collection

use std::time::Duration;

use tokio::sync::mpsc;

use crate::completion::CompletionCounter;

/// Accumulates latency samples reported by workers
///
/// Runs as its own task next to the workers. Each received sample resolves
/// one outstanding request; failed requests are resolved by the worker and
/// never pass through here.
#[derive(Debug)]
pub struct LatencyCollector {
    samples_rx: mpsc::Receiver<Duration>,
    completion: CompletionCounter,
}

impl LatencyCollector {
    /// Create a collector draining `samples_rx`
    pub fn new(samples_rx: mpsc::Receiver<Duration>, completion: CompletionCounter) -> Self {
        Self {
            samples_rx,
            completion,
        }
    }

    /// Collect until every sample sender has been dropped
    ///
    /// Returns samples in arrival order.
    pub async fn collect(mut self) -> Vec<Duration> {
        let mut samples = Vec::new();

        while let Some(sample) = self.samples_rx.recv().await {
            samples.push(sample);
            self.completion.resolve();
        }

        tracing::debug!(samples = samples.len(), "Latency collector finished");
        samples
    }
}
