//! Latency statistics over completed requests
//!
//! [`finalize`] turns the collector's sample list into a [`LatencyReport`].
//! Median and average use truncating integer division on nanoseconds, so
//! `[1ns, 2ns]` averages to `1ns`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Aggregate latency report for a dispatch session
///
/// Only successful requests contribute. An empty session reports all zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LatencyReport {
    /// Number of successful requests
    pub count: usize,

    /// Sum of all latencies
    pub total: Duration,

    /// Fastest request
    pub min: Duration,

    /// Median latency
    pub median: Duration,

    /// Mean latency, truncated to whole nanoseconds
    pub average: Duration,

    /// Slowest request
    pub max: Duration,
}

impl LatencyReport {
    /// Whether no request succeeded
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Compute the aggregate report from the final sample list
///
/// Pure and order independent: any permutation of `samples` yields the same
/// report.
pub fn finalize(mut samples: Vec<Duration>) -> LatencyReport {
    if samples.is_empty() {
        return LatencyReport::default();
    }

    samples.sort_unstable();

    let count = samples.len();
    let total_ns: u128 = samples.iter().map(Duration::as_nanos).sum();

    let mid = count / 2;
    let median_ns = if count % 2 == 0 {
        (samples[mid - 1].as_nanos() + samples[mid].as_nanos()) / 2
    } else {
        samples[mid].as_nanos()
    };

    LatencyReport {
        count,
        total: duration_from_nanos(total_ns),
        min: samples[0],
        median: duration_from_nanos(median_ns),
        average: duration_from_nanos(total_ns / count as u128),
        max: samples[count - 1],
    }
}

fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % NANOS_PER_SEC) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(values: &[u64]) -> Vec<Duration> {
        values.iter().copied().map(Duration::from_nanos).collect()
    }

    #[test]
    fn test_finalize_empty() {
        let report = finalize(Vec::new());
        assert_eq!(report, LatencyReport::default());
        assert!(report.is_empty());
        assert_eq!(report.total, Duration::ZERO);
        assert_eq!(report.max, Duration::ZERO);
    }

    #[test]
    fn test_finalize_single_sample() {
        let report = finalize(ns(&[42]));
        assert_eq!(report.count, 1);
        assert_eq!(report.min, Duration::from_nanos(42));
        assert_eq!(report.median, Duration::from_nanos(42));
        assert_eq!(report.average, Duration::from_nanos(42));
        assert_eq!(report.max, Duration::from_nanos(42));
    }

    #[test]
    fn test_finalize_odd_count_median() {
        let report = finalize(ns(&[10, 30, 20]));
        assert_eq!(report.count, 3);
        assert_eq!(report.median, Duration::from_nanos(20));
        assert_eq!(report.min, Duration::from_nanos(10));
        assert_eq!(report.max, Duration::from_nanos(30));
        assert_eq!(report.total, Duration::from_nanos(60));
        assert_eq!(report.average, Duration::from_nanos(20));
    }

    #[test]
    fn test_finalize_even_count_median() {
        let report = finalize(ns(&[40, 10, 30, 20]));
        assert_eq!(report.median, Duration::from_nanos(25));
        assert_eq!(report.total, Duration::from_nanos(100));
        assert_eq!(report.average, Duration::from_nanos(25));
    }

    #[test]
    fn test_finalize_even_median_truncates() {
        let report = finalize(ns(&[1, 2]));
        assert_eq!(report.median, Duration::from_nanos(1));
    }

    #[test]
    fn test_finalize_average_truncates() {
        let report = finalize(ns(&[1, 2]));
        assert_eq!(report.average, Duration::from_nanos(1));
        assert_eq!(report.total, Duration::from_nanos(3));
    }

    #[test]
    fn test_finalize_order_independent() {
        let a = finalize(ns(&[5, 900, 17, 300, 17, 42]));
        let b = finalize(ns(&[42, 17, 300, 900, 5, 17]));
        assert_eq!(a, b);
        assert_eq!(a.median, Duration::from_nanos(29));
    }

    #[test]
    fn test_finalize_carries_seconds() {
        let report = finalize(vec![
            Duration::from_millis(1500),
            Duration::from_millis(2500),
        ]);
        assert_eq!(report.total, Duration::from_secs(4));
        assert_eq!(report.median, Duration::from_secs(2));
        assert_eq!(report.average, Duration::from_secs(2));
    }
}
