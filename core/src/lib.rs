//! query-bench-core: host-routed query dispatch and latency aggregation
//!
//! This crate provides the concurrency pipeline behind query-bench:
//!
//! - Request types and the `QueryExecutor` trait
//! - The dispatcher, which pins every host to one worker of a fixed pool
//! - Workers, which time queries one at a time per host
//! - The latency collector and completion tracking that gate shutdown
//! - The statistics finalizer producing the aggregate report
//! - Error handling and configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod collector;
pub mod completion;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod report;
pub mod request;
pub mod traits;
pub mod worker;

pub use channel::ChannelConfig;
pub use collector::LatencyCollector;
pub use completion::{CompletionCounter, ResolveGuard};
pub use config::{ConfigError, SessionConfig};
pub use dispatcher::{
    run_session, AggregatedStats, Dispatcher, DispatcherBuilder, HostRouter, ReportReceiver,
    RequestSubmitter,
};
pub use error::*;
pub use report::{finalize, LatencyReport};
pub use request::{PendingRequest, QueryRequest};
pub use traits::{ExecutorError, QueryExecutor};
pub use worker::{Worker, WorkerBuilder, WorkerStats};
