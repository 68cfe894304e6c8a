//! Shared test fixtures.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use folio::dataset::Record;
use folio::executor::{ExecutorError, ExecutorResult, QueryExecutor, QueryResult, ResultColumn};
use folio::worker::WorkerError;
use serde_json::Value;

#[derive(Clone)]
enum Scripted {
    Rows(Vec<Record>),
    NoResult,
    Fail(String),
}

/// In-memory executor answering scripted SQL text.
///
/// Unscripted SQL fails with a query error.
#[derive(Default)]
pub struct MockExecutor {
    responses: Mutex<HashMap<String, Scripted>>,
    delays: Mutex<HashMap<String, Duration>>,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, sql: &str, rows: Vec<Value>) -> Self {
        let rows = rows.into_iter().map(record).collect();
        self.script(sql, Scripted::Rows(rows))
    }

    pub fn with_no_result(self, sql: &str) -> Self {
        self.script(sql, Scripted::NoResult)
    }

    pub fn with_failure(self, sql: &str, message: &str) -> Self {
        self.script(sql, Scripted::Fail(message.to_string()))
    }

    pub fn with_delay(self, sql: &str, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(sql.to_string(), delay);
        self
    }

    /// SQL texts executed so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Most executions observed running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn script(self, sql: &str, response: Scripted) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(sql.to_string(), response);
        self
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn execute(&self, sql: &str, _params: &[Value]) -> ExecutorResult<Option<QueryResult>> {
        self.calls.lock().unwrap().push(sql.to_string());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = self.delays.lock().unwrap().get(sql).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let response = self.responses.lock().unwrap().get(sql).cloned();
        match response {
            Some(Scripted::Rows(rows)) => {
                let columns = rows
                    .first()
                    .map(|row| row.keys().map(|k| ResultColumn::new(k, None)).collect())
                    .unwrap_or_default();
                Ok(Some(QueryResult::new(columns, rows, Duration::ZERO)))
            }
            Some(Scripted::NoResult) => Ok(None),
            Some(Scripted::Fail(message)) => {
                Err(ExecutorError::Worker(WorkerError::QueryFailed(message)))
            }
            None => Err(ExecutorError::Connection(format!("unscripted query: {sql}"))),
        }
    }

    fn driver(&self) -> &str {
        "mock"
    }
}

/// Build a record from a JSON object literal.
pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
