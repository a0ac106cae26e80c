//! Core trait for query executors
//!
//! The trait is defined in core so the dispatcher never depends on a concrete
//! store client. Implementations live in the executors crate.

use async_trait::async_trait;

use crate::request::QueryRequest;

/// Executes one query against the backing store
///
/// Implementations run the query for `(host, start, end)` and discard the
/// returned rows. Only the outcome matters: any error counts as a failed
/// request and no latency sample is recorded for it.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Executor identifier (e.g., "postgres")
    fn name(&self) -> &str;

    /// Run the query for a single request
    async fn execute(&self, request: &QueryRequest) -> Result<(), ExecutorError>;
}

/// Executor errors
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    /// The store could not be reached or the connection dropped
    #[error("Connection error: {0}")]
    Connection(String),

    /// The store rejected or failed the query
    #[error("Query failed: {0}")]
    Query(String),

    /// Bad executor configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ExecutorError {
    /// Whether the error came from losing the connection to the store
    pub fn is_connection(&self) -> bool {
        matches!(self, ExecutorError::Connection(_))
    }
}
