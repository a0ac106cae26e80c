//! Store connection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store configuration validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreConfigError {
    /// A required field is empty
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Port 0 cannot be connected to
    #[error("invalid port: {0}")]
    InvalidPort(u16),

    /// The connection pool cannot be empty
    #[error("invalid max connections: {0}")]
    InvalidMaxConnections(usize),

    /// The connect timeout is out of range
    #[error("invalid connect timeout: {0:?}")]
    InvalidTimeout(Duration),
}

/// Connection settings for the time-series store
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Server host name or address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Login role
    pub user: String,

    /// Login password
    pub password: String,

    /// Database holding the `cpu_usage` table
    pub dbname: String,

    /// Time allowed for establishing the connection
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,

    /// Upper bound on open connections; each busy worker holds one
    pub max_connections: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "password".to_string(),
            dbname: "homework".to_string(),
            connect_timeout: Duration::from_secs(10),
            max_connections: 10,
        }
    }
}

impl StoreConfig {
    /// Set the server host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the server port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the login role
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    /// Set the login password
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Set the database name
    pub fn with_dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = dbname.into();
        self
    }

    /// Set the connect timeout
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the connection pool size
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), StoreConfigError> {
        if self.host.is_empty() {
            return Err(StoreConfigError::MissingField("host"));
        }
        if self.user.is_empty() {
            return Err(StoreConfigError::MissingField("user"));
        }
        if self.dbname.is_empty() {
            return Err(StoreConfigError::MissingField("dbname"));
        }
        if self.port == 0 {
            return Err(StoreConfigError::InvalidPort(self.port));
        }

        if self.max_connections == 0 {
            return Err(StoreConfigError::InvalidMaxConnections(self.max_connections));
        }

        // 1s to 5m
        if self.connect_timeout < Duration::from_secs(1)
            || self.connect_timeout > Duration::from_secs(300)
        {
            return Err(StoreConfigError::InvalidTimeout(self.connect_timeout));
        }

        Ok(())
    }

    /// Address without credentials, for logging
    pub fn display_target(&self) -> String {
        format!("{}@{}:{}/{}", self.user, self.host, self.port, self.dbname)
    }

    pub(crate) fn to_pg_config(&self) -> tokio_postgres::Config {
        let mut pg = tokio_postgres::Config::new();
        pg.host(&self.host)
            .port(self.port)
            .user(&self.user)
            .password(&self.password)
            .dbname(&self.dbname)
            .connect_timeout(self.connect_timeout)
            .application_name("query-bench");
        pg
    }
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("dbname", &self.dbname)
            .field("connect_timeout", &self.connect_timeout)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}
