//! PostgreSQL / TimescaleDB executor

use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, PoolError, RecyclingMethod};
use query_bench_core::{ExecutorError, QueryExecutor, QueryRequest};
use tokio_postgres::NoTls;

use crate::config::StoreConfig;

/// Per-minute max and min CPU usage of one host over a time range
pub const CPU_USAGE_QUERY: &str = "SELECT time_bucket('1 minute', ts) AS one_min, \
     max(usage), min(usage) \
     FROM cpu_usage \
     WHERE host = $1 AND ts >= $2 AND ts <= $3 \
     GROUP BY one_min \
     ORDER BY one_min";

/// Executor running [`CPU_USAGE_QUERY`] over a connection pool
///
/// Each query checks a connection out for its duration, so workers never
/// queue behind each other on one backend as long as the pool holds at
/// least one connection per worker. Returned rows are discarded.
pub struct PostgresExecutor {
    pool: Pool,
}

impl PostgresExecutor {
    /// Open every pooled connection and prepare the query on each
    ///
    /// Connections are established up front so connection setup never
    /// shows up in measured latencies.
    ///
    /// # Errors
    /// Returns `ExecutorError::Config` for an invalid configuration,
    /// `ExecutorError::Connection` if the store is unreachable, and
    /// `ExecutorError::Query` if the statement cannot be prepared.
    pub async fn connect(config: &StoreConfig) -> Result<Self, ExecutorError> {
        let pool = build_pool(config)?;

        let target = config.display_target();
        tracing::debug!(
            store = %target,
            max_connections = config.max_connections,
            "Connecting to store"
        );

        let mut warm = Vec::with_capacity(config.max_connections);
        for _ in 0..config.max_connections {
            let client = pool
                .get()
                .await
                .map_err(|e| ExecutorError::Connection(format!("{target}: {e}")))?;
            client
                .prepare_cached(CPU_USAGE_QUERY)
                .await
                .map_err(map_pg_error)?;
            warm.push(client);
        }
        drop(warm);

        tracing::info!(
            store = %target,
            connections = pool.status().size,
            "Connected to store"
        );
        Ok(Self { pool })
    }

    async fn checkout(&self) -> Result<Object, ExecutorError> {
        self.pool.get().await.map_err(|e| match e {
            PoolError::Backend(e) => map_pg_error(e),
            other => ExecutorError::Connection(other.to_string()),
        })
    }
}

fn build_pool(config: &StoreConfig) -> Result<Pool, ExecutorError> {
    config
        .validate()
        .map_err(|e| ExecutorError::Config(e.to_string()))?;

    let manager = Manager::from_config(
        config.to_pg_config(),
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );

    Pool::builder(manager)
        .max_size(config.max_connections)
        .build()
        .map_err(|e| ExecutorError::Config(e.to_string()))
}

#[async_trait]
impl QueryExecutor for PostgresExecutor {
    fn name(&self) -> &str {
        "postgres"
    }

    async fn execute(&self, request: &QueryRequest) -> Result<(), ExecutorError> {
        let client = self.checkout().await?;
        let statement = client
            .prepare_cached(CPU_USAGE_QUERY)
            .await
            .map_err(map_pg_error)?;

        let rows = client
            .query(&statement, &[&request.host, &request.start, &request.end])
            .await
            .map_err(map_pg_error)?;

        tracing::trace!(host = %request.host, rows = rows.len(), "Query returned");
        Ok(())
    }
}

impl std::fmt::Debug for PostgresExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.pool.status();
        f.debug_struct("PostgresExecutor")
            .field("max_connections", &status.max_size)
            .field("open", &status.size)
            .field("idle", &status.available)
            .finish()
    }
}

fn map_pg_error(e: tokio_postgres::Error) -> ExecutorError {
    if e.is_closed() {
        ExecutorError::Connection(e.to_string())
    } else {
        ExecutorError::Query(e.to_string())
    }
}
