//! Query executor implementations for query-bench
//!
//! This crate provides implementations of the `QueryExecutor` trait:
//!
//! - PostgreSQL / TimescaleDB, running the per-minute CPU usage aggregation

#![warn(missing_docs)]
#![warn(clippy::all)]

mod config;
mod postgres;

pub use config::{StoreConfig, StoreConfigError};
pub use postgres::{PostgresExecutor, CPU_USAGE_QUERY};
