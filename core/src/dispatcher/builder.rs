//! Builder pattern for Dispatcher construction

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::channel::ChannelConfig;
use crate::completion::CompletionCounter;
use crate::config::SessionConfig;
use crate::error::{BenchError, BenchResult};
use crate::traits::QueryExecutor;

use super::executor::{Dispatcher, RequestSubmitter};

/// Builder for creating a Dispatcher with proper configuration
///
/// # Example
///
/// ```ignore
/// let (dispatcher, submitter) = DispatcherBuilder::new()
///     .pool_size(4)
///     .executor(executor)
///     .build()?;
/// ```
pub struct DispatcherBuilder {
    config: SessionConfig,
    executor: Option<Arc<dyn QueryExecutor>>,
    channel_config: ChannelConfig,
}

impl DispatcherBuilder {
    /// Create a new dispatcher builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            executor: None,
            channel_config: ChannelConfig::default(),
        }
    }

    /// Set the full session configuration
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the number of workers
    pub fn pool_size(mut self, pool_size: usize) -> Self {
        self.config.pool_size = pool_size;
        self
    }

    /// Set the query executor
    pub fn executor(mut self, executor: Arc<dyn QueryExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the channel configuration
    pub fn channel_config(mut self, config: ChannelConfig) -> Self {
        self.channel_config = config;
        self
    }

    /// Build the dispatcher and the submitter that feeds it
    ///
    /// # Errors
    ///
    /// Returns an error if the executor is not set, or if configuration
    /// validation fails. Nothing is spawned in that case.
    pub fn build(self) -> BenchResult<(Dispatcher, RequestSubmitter)> {
        let executor = self
            .executor
            .ok_or_else(|| BenchError::missing_config("executor"))?;

        self.config.validate()?;
        self.channel_config.validate()?;

        let (sender, requests_rx) = mpsc::channel(self.channel_config.request_buffer);
        let completion = CompletionCounter::new();

        let dispatcher = Dispatcher::new(
            self.config,
            self.channel_config,
            executor,
            requests_rx,
            completion.clone(),
        );
        let submitter = RequestSubmitter { sender, completion };

        Ok((dispatcher, submitter))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
