//! Query execution behind a trait seam.
//!
//! The dataset pipeline only ever hands an executor gate-approved, sanitized
//! `SELECT` text. Executors never re-validate it.
//!
//! | Driver                              | Executor            |
//! |-------------------------------------|---------------------|
//! | `sqlite`                            | [`SqliteExecutor`] (in-process) |
//! | `duckdb`, `mssql`, `postgres`, `mysql` | [`WorkerExecutor`] (query worker) |

mod sqlite;
mod worker;

pub use sqlite::SqliteExecutor;
pub use worker::WorkerExecutor;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Settings, SettingsError};
use crate::dataset::Record;
use crate::worker::{WorkerClient, WorkerError};

/// Result type for query execution.
pub type ExecutorResult<T> = Result<T, ExecutorError>;

/// Errors raised while executing a query.
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Worker(#[from] WorkerError),

    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error("connection failed: {0}")]
    Connection(String),
}

/// A result column with its database-reported type, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultColumn {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
}

impl ResultColumn {
    pub fn new(name: impl Into<String>, data_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Rows returned by a query, keyed by column name in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Record>,
    pub row_count: usize,
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn new(columns: Vec<ResultColumn>, rows: Vec<Record>, elapsed: Duration) -> Self {
        Self {
            columns,
            row_count: rows.len(),
            rows,
            execution_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Database type reported for `column`.
    pub fn column_type(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|c| c.name == column)
            .and_then(|c| c.data_type.as_deref())
    }
}

/// The query execution collaborator.
///
/// `Ok(None)` means the statement produced no result set at all; an empty
/// result set is `Ok(Some(..))` with no rows. No timeout is applied by
/// callers; implementations own that concern.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `sql` with positional `params`.
    async fn execute(
        &self,
        sql: &str,
        params: &[serde_json::Value],
    ) -> ExecutorResult<Option<QueryResult>>;

    /// Driver name, for logging.
    fn driver(&self) -> &str;
}

/// Build an executor for a configured connection.
///
/// `name` selects a connection; `None` picks the default one. SQLite opens
/// in-process; other drivers spawn the query worker.
pub async fn connect(
    settings: &Settings,
    name: Option<&str>,
) -> ExecutorResult<Arc<dyn QueryExecutor>> {
    let (name, conn) = settings.resolve_connection(name)?;
    let driver = conn.driver_type()?;
    let connection_string = conn.resolved_connection_string()?;

    debug!(connection = name, %driver, "opening query executor");

    if !driver.requires_worker() {
        return Ok(Arc::new(SqliteExecutor::open(&connection_string)?));
    }

    let client = WorkerClient::spawn_with_settings(&settings.worker).await?;
    Ok(Arc::new(WorkerExecutor::new(
        Arc::new(client),
        driver.as_str(),
        connection_string,
    )))
}
