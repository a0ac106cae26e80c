//! Report rendering for query-bench sessions
//!
//! This crate renders a [`LatencyReport`] as:
//!
//! - Plain text, for terminals
//! - JSON, with every duration in nanoseconds
//! - CSV `metric,value` rows, with every duration in nanoseconds

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::io::Write;
use std::time::Duration;

use query_bench_core::LatencyReport;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while rendering a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// Writing to the output failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Rendered bytes were not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Output format of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Aligned `label: value` lines
    #[default]
    Text,
    /// A single JSON object
    Json,
    /// `metric,value` rows with a header
    Csv,
}

impl ReportFormat {
    /// Returns the identifier string for this format
    pub fn id(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!("Unknown report format: {} (expected text, json or csv)", s)),
        }
    }
}

/// Nanosecond view of a report used by the machine-readable formats
#[derive(Debug, Serialize)]
struct ReportRecord {
    count: usize,
    total_ns: u64,
    min_ns: u64,
    median_ns: u64,
    average_ns: u64,
    max_ns: u64,
}

impl From<&LatencyReport> for ReportRecord {
    fn from(report: &LatencyReport) -> Self {
        Self {
            count: report.count,
            total_ns: nanos(report.total),
            min_ns: nanos(report.min),
            median_ns: nanos(report.median),
            average_ns: nanos(report.average),
            max_ns: nanos(report.max),
        }
    }
}

fn nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// Write `report` to `out` in the given format
pub fn write_report<W: Write>(
    report: &LatencyReport,
    format: ReportFormat,
    mut out: W,
) -> Result<(), ReportError> {
    match format {
        ReportFormat::Text => write_text(report, &mut out)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &ReportRecord::from(report))?;
            writeln!(out)?;
        }
        ReportFormat::Csv => write_csv(report, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

/// Render `report` to a string in the given format
pub fn render(report: &LatencyReport, format: ReportFormat) -> Result<String, ReportError> {
    let mut buf = Vec::new();
    write_report(report, format, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}

fn write_text<W: Write>(report: &LatencyReport, out: &mut W) -> Result<(), ReportError> {
    writeln!(out, "Queries processed: {}", report.count)?;
    writeln!(out, "Total time:        {:?}", report.total)?;
    writeln!(out, "Minimum:           {:?}", report.min)?;
    writeln!(out, "Median:            {:?}", report.median)?;
    writeln!(out, "Average:           {:?}", report.average)?;
    writeln!(out, "Maximum:           {:?}", report.max)?;
    Ok(())
}

fn write_csv<W: Write>(report: &LatencyReport, out: &mut W) -> Result<(), ReportError> {
    let record = ReportRecord::from(report);
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["metric", "value"])?;
    wtr.write_record(["count", &record.count.to_string()])?;
    wtr.write_record(["total_ns", &record.total_ns.to_string()])?;
    wtr.write_record(["min_ns", &record.min_ns.to_string()])?;
    wtr.write_record(["median_ns", &record.median_ns.to_string()])?;
    wtr.write_record(["average_ns", &record.average_ns.to_string()])?;
    wtr.write_record(["max_ns", &record.max_ns.to_string()])?;

    wtr.flush()?;
    Ok(())
}
