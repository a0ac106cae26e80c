//! Error types for query-bench-ingest

use query_bench_core::BenchError;
use thiserror::Error;

/// Errors raised while reading request rows
#[derive(Error, Debug)]
pub enum IngestError {
    /// The underlying CSV reader failed
    #[error("Error while reading input: {0}")]
    Csv(#[from] csv::Error),

    /// A row had fewer columns than required
    #[error("line {line}: expected at least {expected} columns, found {found}")]
    MissingColumns {
        /// 1-based line number in the input
        line: u64,
        /// Required column count
        expected: usize,
        /// Columns present on the row
        found: usize,
    },

    /// A row had an empty host column
    #[error("line {line}: empty hostname")]
    EmptyHost {
        /// 1-based line number in the input
        line: u64,
    },

    /// A timestamp column could not be parsed
    #[error("line {line}: could not parse {field} time {value:?}: {source}")]
    Timestamp {
        /// 1-based line number in the input
        line: u64,
        /// Which column failed ("start" or "end")
        field: &'static str,
        /// The raw value
        value: String,
        /// Parser error
        source: chrono::ParseError,
    },

    /// The end of the range precedes its start
    #[error("line {line}: end time {end} is before start time {start}")]
    InvertedRange {
        /// 1-based line number in the input
        line: u64,
        /// Parsed start
        start: String,
        /// Parsed end
        end: String,
    },

    /// The dispatcher stopped accepting requests
    #[error("Could not submit request: {0}")]
    Submit(#[from] BenchError),
}

impl IngestError {
    /// Whether reading cannot continue past this error
    ///
    /// I/O failures of the underlying reader and a closed dispatcher are
    /// fatal; every other error affects a single row.
    pub fn is_fatal(&self) -> bool {
        match self {
            IngestError::Csv(e) => e.is_io_error(),
            IngestError::Submit(_) => true,
            _ => false,
        }
    }
}
