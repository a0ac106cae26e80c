//! Error types for query-bench-core

use thiserror::Error;

use crate::config::ConfigError;

/// Core error type
#[derive(Error, Debug)]
pub enum BenchError {
    /// Invalid session configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A required builder field was never set
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// The dispatcher is no longer accepting requests
    #[error("dispatcher closed: {0}")]
    DispatcherClosed(String),

    /// The session ended without delivering a report
    #[error("report channel closed before a report was delivered")]
    ReportLost,

    /// A session task panicked or was cancelled
    #[error("task failed: {0}")]
    Task(String),
}

impl BenchError {
    /// Error for a builder field that was not provided
    pub fn missing_config(field: &'static str) -> Self {
        Self::MissingConfig(field)
    }

    /// Error for a request that could not be handed to the dispatcher
    pub fn closed(detail: impl Into<String>) -> Self {
        Self::DispatcherClosed(detail.into())
    }

    /// Error for a join failure of a spawned session task
    pub fn task(err: tokio::task::JoinError) -> Self {
        Self::Task(err.to_string())
    }
}

/// Result type alias
pub type BenchResult<T> = std::result::Result<T, BenchError>;
