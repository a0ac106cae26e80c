//! Dispatcher for host-routed query sessions
//!
//! The Dispatcher coordinates one complete session:
//! - Spawning the worker pool and the latency collector
//! - Pinning each host to one worker, round-robin by first sighting
//! - Waiting for every submitted request to resolve once input ends
//! - Tearing down channels and delivering exactly one report
//!
//! # Example
//!
//! ```ignore
//! use query_bench_core::DispatcherBuilder;
//!
//! let (dispatcher, submitter) = DispatcherBuilder::new()
//!     .pool_size(4)
//!     .executor(executor)
//!     .build()?;
//!
//! let report_rx = dispatcher.spawn();
//! for request in requests {
//!     submitter.submit(request).await?;
//! }
//! drop(submitter);
//!
//! let report = report_rx.recv().await?;
//! ```

mod aggregator;
mod builder;
mod executor;
mod routing;

pub use aggregator::{aggregate_worker_stats, AggregatedStats};
pub use builder::DispatcherBuilder;
pub use executor::{run_session, Dispatcher, ReportReceiver, RequestSubmitter};
pub use routing::HostRouter;
