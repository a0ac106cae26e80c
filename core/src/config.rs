//! Session configuration types

use serde::{Deserialize, Serialize};

/// Dispatch session configuration
///
/// Controls how many workers the dispatcher spreads hosts across.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Number of worker tasks; every host is pinned to exactly one of them
    pub pool_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { pool_size: 1 }
    }
}

impl SessionConfig {
    /// Create a new config with the given pool size
    pub fn new(pool_size: usize) -> Self {
        Self { pool_size }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool_size == 0 {
            return Err(ConfigError::InvalidPoolSize(
                "pool size must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid pool size
    #[error("Invalid pool size: {0}")]
    InvalidPoolSize(String),

    /// Invalid channel buffer size
    #[error("Invalid channel buffer: {0}")]
    InvalidBuffer(String),
}
