//! CSV request reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter, Trim};
use query_bench_core::QueryRequest;

use crate::error::IngestError;

/// Layout of the start and end columns
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const REQUIRED_COLUMNS: usize = 3;

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp as UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map(|naive| naive.and_utc())
}

/// Iterator of requests read from CSV input
///
/// Yields one item per data row. Bad rows yield an error and reading
/// continues with the next row.
pub struct CsvRequestReader<R: Read> {
    records: StringRecordsIntoIter<R>,
}

impl<R: Read> CsvRequestReader<R> {
    /// Read requests from any reader; the first row is treated as a header
    pub fn from_reader(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader)
            .into_records();

        Self { records }
    }
}

impl CsvRequestReader<File> {
    /// Open a CSV file of requests
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let file = File::open(path).map_err(|e| IngestError::Csv(e.into()))?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> Iterator for CsvRequestReader<R> {
    type Item = Result<QueryRequest, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(e) => return Some(Err(e.into())),
        };
        Some(parse_record(&record))
    }
}

impl<R: Read> std::fmt::Debug for CsvRequestReader<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsvRequestReader").finish_non_exhaustive()
    }
}

fn parse_record(record: &StringRecord) -> Result<QueryRequest, IngestError> {
    let line = record.position().map(|p| p.line()).unwrap_or_default();

    if record.len() < REQUIRED_COLUMNS {
        return Err(IngestError::MissingColumns {
            line,
            expected: REQUIRED_COLUMNS,
            found: record.len(),
        });
    }

    let host = &record[0];
    if host.is_empty() {
        return Err(IngestError::EmptyHost { line });
    }

    let start = parse_column(line, "start", &record[1])?;
    let end = parse_column(line, "end", &record[2])?;

    if end < start {
        return Err(IngestError::InvertedRange {
            line,
            start: record[1].to_string(),
            end: record[2].to_string(),
        });
    }

    Ok(QueryRequest::new(host, start, end))
}

fn parse_column(line: u64, field: &'static str, value: &str) -> Result<DateTime<Utc>, IngestError> {
    parse_timestamp(value).map_err(|source| IngestError::Timestamp {
        line,
        field,
        value: value.to_string(),
        source,
    })
}
