//! Aggregation of per-worker statistics

use std::time::Duration;

use crate::worker::WorkerStats;

/// Aggregated statistics from all workers
#[derive(Debug, Clone, Default)]
pub struct AggregatedStats {
    /// Number of workers that reported
    pub total_workers: usize,

    /// Total successful queries
    pub total_completed: usize,

    /// Total failed queries
    pub total_errors: usize,

    /// Distinct hosts across the pool
    pub total_hosts: usize,

    /// Longest worker lifetime
    pub total_duration: Duration,

    /// Overall queries per second
    pub queries_per_second: f64,
}

impl AggregatedStats {
    /// Get the total number of requests (completed + errors)
    pub fn total_requests(&self) -> usize {
        self.total_completed + self.total_errors
    }

    /// Get the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        let total = self.total_requests();
        if total > 0 {
            self.total_completed as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedStats {
    if stats.is_empty() {
        return AggregatedStats::default();
    }

    let mut merged = WorkerStats::new();
    for s in stats {
        merged.merge(s);
    }

    let total_duration = stats
        .iter()
        .filter_map(|s| s.elapsed())
        .max()
        .unwrap_or(Duration::ZERO);

    let secs = total_duration.as_secs_f64();
    let queries_per_second = if secs > 0.0 {
        merged.total_requests() as f64 / secs
    } else {
        0.0
    };

    AggregatedStats {
        total_workers: stats.len(),
        total_completed: merged.completed,
        total_errors: merged.errors,
        total_hosts: merged.hosts,
        total_duration,
        queries_per_second,
    }
}
