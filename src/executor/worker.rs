//! Executor backed by the external query worker.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use super::{ExecutorResult, QueryExecutor, QueryResult, ResultColumn};
use crate::dataset::Record;
use crate::worker::protocol::{ConnectionParams, ExecuteQueryResponse};
use crate::worker::WorkerClient;

/// QueryExecutor that sends `query.execute` requests to the worker.
///
/// Several executors may share one client; each carries its own connection.
pub struct WorkerExecutor {
    client: Arc<WorkerClient>,
    connection: ConnectionParams,
}

impl WorkerExecutor {
    pub fn new(
        client: Arc<WorkerClient>,
        driver: impl Into<String>,
        connection_string: impl Into<String>,
    ) -> Self {
        Self {
            client,
            connection: ConnectionParams {
                driver: driver.into(),
                connection_string: connection_string.into(),
            },
        }
    }
}

#[async_trait]
impl QueryExecutor for WorkerExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> ExecutorResult<Option<QueryResult>> {
        let started = Instant::now();
        let response = self
            .client
            .execute_query(&self.connection, sql, params)
            .await?;
        Ok(into_query_result(response, started))
    }

    fn driver(&self) -> &str {
        &self.connection.driver
    }
}

/// Zip positional worker rows into records keyed by column name.
fn into_query_result(response: ExecuteQueryResponse, started: Instant) -> Option<QueryResult> {
    let rows = response.rows?;
    let columns: Vec<ResultColumn> = response
        .columns
        .into_iter()
        .map(|c| ResultColumn::new(c.name, c.data_type))
        .collect();

    let records = rows
        .into_iter()
        .map(|values| {
            columns
                .iter()
                .map(|c| c.name.clone())
                .zip(values)
                .collect::<Record>()
        })
        .collect();

    let mut result = QueryResult::new(columns, records, started.elapsed());
    if let Some(ms) = response.execution_time_ms {
        result.execution_time_ms = ms;
    }
    Some(result)
}
