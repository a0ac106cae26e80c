//! Worker statistics tracking

use std::time::{Duration, Instant};

/// Statistics tracked by each worker
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Number of queries that succeeded
    pub completed: usize,

    /// Number of queries that failed
    pub errors: usize,

    /// Distinct hosts this worker has served
    pub hosts: usize,

    /// Time spent inside the executor, successes and failures alike
    pub busy: Duration,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Get total number of requests (completed + errors)
    pub fn total_requests(&self) -> usize {
        self.completed + self.errors
    }

    /// Get error rate (0.0 - 1.0)
    pub fn error_rate(&self) -> f64 {
        if self.total_requests() == 0 {
            0.0
        } else {
            self.errors as f64 / self.total_requests() as f64
        }
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Fraction of the worker's lifetime spent executing queries
    pub fn utilization(&self) -> f64 {
        self.elapsed()
            .map(|d| {
                let secs = d.as_secs_f64();
                if secs > 0.0 {
                    (self.busy.as_secs_f64() / secs).min(1.0)
                } else {
                    0.0
                }
            })
            .unwrap_or(0.0)
    }

    /// Record a successful query
    pub fn record_success(&mut self, elapsed: Duration) {
        self.completed += 1;
        self.busy += elapsed;
    }

    /// Record a failed query
    pub fn record_error(&mut self, elapsed: Duration) {
        self.errors += 1;
        self.busy += elapsed;
    }

    /// Merge stats from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.completed += other.completed;
        self.errors += other.errors;
        self.hosts += other.hosts;
        self.busy += other.busy;
    }
}
