//! Worker module for executing routed queries
//!
//! A Worker is one slot of the dispatcher's pool. It owns an inbox of
//! requests for the hosts pinned to it and runs a simple loop:
//! **receive -> execute -> report -> repeat**.
//!
//! 1. Receives the next request from its inbox (FIFO)
//! 2. Times the query through the shared QueryExecutor
//! 3. Sends the latency to the collector on success
//! 4. Resolves the request directly on failure, with a diagnostic
//!    (the request's completion guard is dropped)
//! 5. Stops once the inbox is closed and drained
//!
//! # Example
//!
//! ```ignore
//! use query_bench_core::worker::WorkerBuilder;
//!
//! let worker = WorkerBuilder::new(0)
//!     .executor(executor)
//!     .inbox(inbox_rx)
//!     .samples_tx(samples_tx)
//!     .build()?;
//!
//! let stats = worker.run().await;
//! println!("Completed: {}", stats.completed);
//! ```

mod builder;
mod executor;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use stats::WorkerStats;

#[cfg(test)]
mod tests;
