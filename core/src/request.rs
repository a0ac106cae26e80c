//! Request types for dispatch operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::completion::ResolveGuard;

/// A single query to time: one host over one time range
///
/// Requests are immutable once built and are moved, not shared, from the
/// submitter to the dispatcher and on to the worker that owns the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    /// Host the query is scoped to; also the routing key
    pub host: String,

    /// Inclusive start of the queried range
    pub start: DateTime<Utc>,

    /// Inclusive end of the queried range
    pub end: DateTime<Utc>,
}

impl QueryRequest {
    /// Create a new request
    pub fn new(host: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            host: host.into(),
            start,
            end,
        }
    }
}

impl std::fmt::Display for QueryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{} .. {}]", self.host, self.start, self.end)
    }
}

/// A submitted request that has not been resolved yet
///
/// Carries the completion guard alongside the request so that dropping it
/// anywhere in the pipeline (a closed inbox, a worker that unwound) still
/// resolves it exactly once.
#[derive(Debug)]
pub struct PendingRequest {
    request: QueryRequest,
    guard: ResolveGuard,
}

impl PendingRequest {
    pub(crate) fn new(request: QueryRequest, guard: ResolveGuard) -> Self {
        Self { request, guard }
    }

    /// The wrapped request
    pub fn request(&self) -> &QueryRequest {
        &self.request
    }

    /// Split into the request and its completion guard
    pub fn into_parts(self) -> (QueryRequest, ResolveGuard) {
        (self.request, self.guard)
    }
}
