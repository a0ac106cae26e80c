//! CSV request source for query-bench
//!
//! This crate turns a delimited query-parameter file into `QueryRequest`s:
//!
//! - The first row is a header and is skipped
//! - Each row needs `hostname,start_time,end_time`
//! - Timestamps use `YYYY-MM-DD HH:MM:SS` and are read as UTC
//! - Rows whose range ends before it starts are rejected
//!
//! Malformed rows surface as [`IngestError`]s so the driver can log and skip
//! them without stopping the session.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod driver;
mod error;
mod reader;

pub use driver::{feed_blocking, IngestSummary};
pub use error::IngestError;
pub use reader::{parse_timestamp, CsvRequestReader, TIMESTAMP_FORMAT};
