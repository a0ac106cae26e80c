//! Channel configuration for dispatcher communication

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Channel buffer configuration for dispatcher communication
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Request channel buffer size (ingestion -> dispatcher)
    pub request_buffer: usize,

    /// Per-worker inbox buffer size (dispatcher -> worker)
    pub inbox_buffer: usize,

    /// Sample channel buffer size (workers -> collector)
    pub sample_buffer: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            request_buffer: 6_000,
            inbox_buffer: 16,
            sample_buffer: 10_000,
        }
    }
}

impl ChannelConfig {
    /// Set the request channel buffer size
    pub fn with_request_buffer(mut self, size: usize) -> Self {
        self.request_buffer = size;
        self
    }

    /// Set the per-worker inbox buffer size
    pub fn with_inbox_buffer(mut self, size: usize) -> Self {
        self.inbox_buffer = size;
        self
    }

    /// Set the sample channel buffer size
    pub fn with_sample_buffer(mut self, size: usize) -> Self {
        self.sample_buffer = size;
        self
    }

    /// Validate buffer sizes; tokio bounded channels need a capacity of at least 1
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, size) in [
            ("request_buffer", self.request_buffer),
            ("inbox_buffer", self.inbox_buffer),
            ("sample_buffer", self.sample_buffer),
        ] {
            if size == 0 {
                return Err(ConfigError::InvalidBuffer(format!(
                    "{name} must be at least 1"
                )));
            }
        }
        Ok(())
    }
}
