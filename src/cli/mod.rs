//! CLI argument parsing and session wiring

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use query_bench_core::{ChannelConfig, DispatcherBuilder, SessionConfig};
use query_bench_executors::{PostgresExecutor, StoreConfig};
use query_bench_ingest::{feed_blocking, CsvRequestReader};
use query_bench_report::{write_report, ReportFormat};

/// Query Bench - per-host query latency benchmarking for time-series stores
#[derive(Parser, Debug)]
#[command(name = "query-bench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// CSV file of `hostname,start_time,end_time` rows (first row is a header)
    pub input: PathBuf,

    /// Number of workers; every host is pinned to one of them
    #[arg(short, long, default_value = "1")]
    pub workers: usize,

    /// Database host
    #[arg(long, env = "PGHOST", default_value = "127.0.0.1")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "PGPORT", default_value = "5432")]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "PGUSER", default_value = "postgres")]
    pub db_user: String,

    /// Database password
    #[arg(long, env = "PGPASSWORD", default_value = "password", hide_env_values = true)]
    pub db_password: String,

    /// Database name
    #[arg(long, env = "PGDATABASE", default_value = "homework")]
    pub db_name: String,

    /// Connection timeout in seconds
    #[arg(long, default_value = "10")]
    pub connect_timeout: u64,

    /// Maximum open database connections
    #[arg(long, default_value = "10")]
    pub max_connections: usize,

    /// Per-worker queue depth
    #[arg(long, default_value = "16")]
    pub inbox_buffer: usize,

    /// Report format (text, json, csv)
    #[arg(short, long, default_value = "text")]
    pub format: ReportFormat,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    fn session_config(&self) -> SessionConfig {
        SessionConfig::new(self.workers)
    }

    fn channel_config(&self) -> ChannelConfig {
        ChannelConfig::default().with_inbox_buffer(self.inbox_buffer)
    }

    fn store_config(&self) -> StoreConfig {
        StoreConfig::default()
            .with_host(&self.db_host)
            .with_port(self.db_port)
            .with_user(&self.db_user)
            .with_password(&self.db_password)
            .with_dbname(&self.db_name)
            .with_connect_timeout(Duration::from_secs(self.connect_timeout))
            .with_max_connections(self.max_connections)
    }

    /// Run one benchmark session and print its report to stdout
    pub async fn run(&self) -> Result<()> {
        // Reject bad settings before touching the store or the input.
        let session = self.session_config();
        session.validate().context("Invalid number of workers")?;
        let channels = self.channel_config();
        channels.validate().context("Invalid channel configuration")?;

        tracing::info!(
            input = %self.input.display(),
            workers = session.pool_size,
            format = %self.format,
            "Starting query-bench"
        );

        if session.pool_size > self.max_connections {
            tracing::warn!(
                workers = session.pool_size,
                max_connections = self.max_connections,
                "More workers than connections; latencies include time waiting for a connection"
            );
        }

        let executor = PostgresExecutor::connect(&self.store_config())
            .await
            .context("Unable to connect to database")?;

        let reader = CsvRequestReader::from_path(&self.input).with_context(|| {
            format!("Provided file cannot be opened: {}", self.input.display())
        })?;

        let (dispatcher, submitter) = DispatcherBuilder::new()
            .config(session)
            .channel_config(channels)
            .executor(Arc::new(executor))
            .build()?;
        let report_rx = dispatcher.spawn();

        let ingest = tokio::task::spawn_blocking(move || feed_blocking(reader, submitter));
        match ingest.await.context("Ingestion task failed")? {
            Ok(summary) => {
                tracing::info!(
                    accepted = summary.accepted,
                    rejected = summary.rejected,
                    "Input read"
                );
            }
            Err(e) => {
                // Requests already submitted are still reported.
                tracing::error!(error = %e, "Ingestion stopped early");
            }
        }

        let report = report_rx.recv().await?;
        write_report(&report, self.format, std::io::stdout().lock())
            .context("Failed to write report")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["query-bench", "query_params.csv"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("query_params.csv"));
        assert_eq!(cli.workers, 1);
        assert_eq!(cli.format, ReportFormat::Text);
        assert_eq!(cli.channel_config().inbox_buffer, 16);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_workers_and_format() {
        let cli =
            Cli::try_parse_from(["query-bench", "-w", "4", "--format", "json", "in.csv"]).unwrap();
        assert_eq!(cli.session_config().pool_size, 4);
        assert_eq!(cli.format, ReportFormat::Json);
    }

    #[test]
    fn test_cli_rejects_negative_workers() {
        assert!(Cli::try_parse_from(["query-bench", "-w", "-2", "in.csv"]).is_err());
    }

    #[test]
    fn test_cli_zero_workers_fails_validation() {
        let cli = Cli::try_parse_from(["query-bench", "-w", "0", "in.csv"]).unwrap();
        assert!(cli.session_config().validate().is_err());
    }

    #[test]
    fn test_cli_max_connections() {
        let cli =
            Cli::try_parse_from(["query-bench", "--max-connections", "4", "in.csv"]).unwrap();
        assert_eq!(cli.store_config().max_connections, 4);
        assert!(cli.store_config().validate().is_ok());

        let cli =
            Cli::try_parse_from(["query-bench", "--max-connections", "0", "in.csv"]).unwrap();
        assert!(cli.store_config().validate().is_err());
    }

    #[test]
    fn test_cli_requires_input() {
        assert!(Cli::try_parse_from(["query-bench"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["query-bench", "--format", "xlsx", "in.csv"]).is_err());
    }

    #[test]
    fn test_store_config_from_flags() {
        let cli = Cli::try_parse_from([
            "query-bench",
            "--db-host",
            "tsdb",
            "--db-port",
            "6432",
            "--connect-timeout",
            "3",
            "in.csv",
        ])
        .unwrap();
        let store = cli.store_config();
        assert_eq!(store.host, "tsdb");
        assert_eq!(store.port, 6432);
        assert_eq!(store.connect_timeout, Duration::from_secs(3));
        assert_eq!(store.max_connections, 10);
    }
}
