//! Feeding parsed requests into a dispatch session

use std::io::Read;

use query_bench_core::RequestSubmitter;

use crate::error::IngestError;
use crate::reader::CsvRequestReader;

/// Outcome of feeding one input into a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Rows submitted to the dispatcher
    pub accepted: usize,
    /// Rows skipped as malformed
    pub rejected: usize,
}

impl IngestSummary {
    /// Total data rows seen
    pub fn total(&self) -> usize {
        self.accepted + self.rejected
    }
}

/// Submit every valid row of `reader` to the session
///
/// Runs on the calling thread and blocks while the request channel is full,
/// so call it from `spawn_blocking` or a plain thread. Malformed rows are
/// logged and skipped. The submitter is dropped on return, which ends the
/// session's input.
///
/// # Errors
/// Stops at the first fatal error: an I/O failure of the input or a
/// dispatcher that no longer accepts requests. Requests submitted before the
/// failure are still processed and reported.
pub fn feed_blocking<R: Read>(
    reader: CsvRequestReader<R>,
    submitter: RequestSubmitter,
) -> Result<IngestSummary, IngestError> {
    let mut summary = IngestSummary::default();

    for row in reader {
        match row {
            Ok(request) => {
                tracing::trace!(%request, "Submitting request");
                submitter.blocking_submit(request)?;
                summary.accepted += 1;
            }
            Err(e) if e.is_fatal() => {
                tracing::error!(
                    error = %e,
                    accepted = summary.accepted,
                    "Input failed, stopping ingestion"
                );
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed row");
                summary.rejected += 1;
            }
        }
    }

    tracing::debug!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "Input exhausted"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use query_bench_core::{DispatcherBuilder, ExecutorError, QueryExecutor, QueryRequest};
    use std::io;
    use std::sync::Arc;

    struct InstantExecutor;

    #[async_trait]
    impl QueryExecutor for InstantExecutor {
        fn name(&self) -> &str {
            "instant"
        }

        async fn execute(&self, _request: &QueryRequest) -> Result<(), ExecutorError> {
            Ok(())
        }
    }

    /// Yields its bytes, then fails like a broken pipe
    struct FailingReader {
        data: io::Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "input went away")),
                n => Ok(n),
            }
        }
    }

    const INPUT: &str = "hostname,start_time,end_time\n\
        host_000001,2017-01-02 13:02:02,2017-01-02 14:02:02\n\
        host_000002,2017-01-02 18:50:28,2017-01-02 19:50:28\n\
        host_000001,garbage,2017-01-02 14:02:02\n\
        host_000003,2017-01-02 15:16:25,2017-01-02 16:16:25\n";

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_feed_reports_every_valid_row() {
        let (dispatcher, submitter) = DispatcherBuilder::new()
            .pool_size(2)
            .executor(Arc::new(InstantExecutor))
            .build()
            .unwrap();
        let report_rx = dispatcher.spawn();

        let summary = tokio::task::spawn_blocking(move || {
            feed_blocking(CsvRequestReader::from_reader(INPUT.as_bytes()), submitter)
        })
        .await
        .unwrap()
        .unwrap();

        assert_eq!(summary, IngestSummary { accepted: 3, rejected: 1 });
        assert_eq!(summary.total(), 4);

        let report = report_rx.recv().await.unwrap();
        assert_eq!(report.count, 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_io_error_stops_ingestion_but_session_completes() {
        let (dispatcher, submitter) = DispatcherBuilder::new()
            .executor(Arc::new(InstantExecutor))
            .build()
            .unwrap();
        let report_rx = dispatcher.spawn();

        let input = "hostname,start_time,end_time\n\
            host_000001,2017-01-02 13:02:02,2017-01-02 14:02:02\n";
        let reader = FailingReader {
            data: io::Cursor::new(input.as_bytes().to_vec()),
        };

        let err = tokio::task::spawn_blocking(move || {
            feed_blocking(CsvRequestReader::from_reader(reader), submitter)
        })
        .await
        .unwrap()
        .unwrap_err();
        assert!(err.is_fatal());

        let report = report_rx.recv().await.unwrap();
        assert_eq!(report.count, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_closed_dispatcher_stops_ingestion() {
        let (dispatcher, submitter) = DispatcherBuilder::new()
            .executor(Arc::new(InstantExecutor))
            .build()
            .unwrap();
        drop(dispatcher);

        let err = tokio::task::spawn_blocking(move || {
            feed_blocking(CsvRequestReader::from_reader(INPUT.as_bytes()), submitter)
        })
        .await
        .unwrap()
        .unwrap_err();

        assert!(matches!(err, IngestError::Submit(_)));
    }
}
