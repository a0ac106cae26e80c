//! Host to worker routing

use std::collections::HashMap;

/// Pins each host to one worker slot
///
/// Hosts are assigned round-robin in the order they are first seen; repeat
/// sightings reuse the existing slot. Assignments never change for the life of
/// the router, which is what keeps per-host queries serialized.
#[derive(Debug, Clone)]
pub struct HostRouter {
    pool_size: usize,
    next_slot: usize,
    assignments: HashMap<String, usize>,
}

impl HostRouter {
    /// Create a router over `pool_size` workers
    ///
    /// `pool_size` must be at least 1; the dispatcher validates this before
    /// building a router.
    pub fn new(pool_size: usize) -> Self {
        debug_assert!(pool_size > 0, "router needs at least one worker");
        Self {
            pool_size,
            next_slot: 0,
            assignments: HashMap::new(),
        }
    }

    /// Worker slot for `host`, assigning the next free slot on first sight
    pub fn route(&mut self, host: &str) -> usize {
        if let Some(&slot) = self.assignments.get(host) {
            return slot;
        }

        let slot = self.next_slot;
        self.assignments.insert(host.to_string(), slot);
        self.next_slot = (self.next_slot + 1) % self.pool_size;

        tracing::trace!(host, worker_id = slot, "Assigned host to worker");
        slot
    }

    /// Current assignment for `host`, if it has been seen
    pub fn assignment(&self, host: &str) -> Option<usize> {
        self.assignments.get(host).copied()
    }

    /// Number of distinct hosts routed so far
    pub fn host_count(&self) -> usize {
        self.assignments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_robin_over_first_seen_hosts() {
        let mut router = HostRouter::new(2);

        let routed: Vec<usize> = ["A", "B", "C", "A"]
            .iter()
            .map(|h| router.route(h))
            .collect();

        assert_eq!(routed, vec![0, 1, 0, 0]);
        assert_eq!(router.assignment("A"), Some(0));
        assert_eq!(router.assignment("B"), Some(1));
        assert_eq!(router.assignment("C"), Some(0));
        assert_eq!(router.host_count(), 3);
    }

    #[test]
    fn test_repeat_requests_do_not_advance_pointer() {
        let mut router = HostRouter::new(3);

        assert_eq!(router.route("x"), 0);
        assert_eq!(router.route("x"), 0);
        assert_eq!(router.route("x"), 0);
        assert_eq!(router.route("y"), 1);
        assert_eq!(router.route("z"), 2);
        assert_eq!(router.route("w"), 0);
    }

    #[test]
    fn test_single_worker_takes_everything() {
        let mut router = HostRouter::new(1);
        for host in ["a", "b", "c", "d"] {
            assert_eq!(router.route(host), 0);
        }
    }

    #[test]
    fn test_unknown_host_has_no_assignment() {
        let router = HostRouter::new(4);
        assert_eq!(router.assignment("nobody"), None);
    }
}
