//! In-process SQLite executor.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::Connection;
use serde_json::Value;

use super::{ExecutorError, ExecutorResult, QueryExecutor, QueryResult, ResultColumn};
use crate::dataset::Record;

/// Runs queries on a local SQLite database.
///
/// The connection sits behind a mutex. Queries run on the blocking pool, so
/// a slow query never stalls the async runtime or other datasets in flight.
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteExecutor {
    /// Open a database file, or an in-memory database for `:memory:`.
    pub fn open(path: &str) -> ExecutorResult<Self> {
        let conn = if path == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(Path::new(path))?
        };
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> ExecutorResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run raw statements, bypassing the result path. Used for fixtures and
    /// schema setup, never for dataset queries.
    pub fn execute_batch(&self, sql: &str) -> ExecutorResult<()> {
        self.lock()?.execute_batch(sql)?;
        Ok(())
    }

    fn lock(&self) -> ExecutorResult<std::sync::MutexGuard<'_, Connection>> {
        lock(&self.conn)
    }
}

fn lock(conn: &Mutex<Connection>) -> ExecutorResult<std::sync::MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| ExecutorError::Connection("sqlite connection lock poisoned".to_string()))
}

fn run_query(
    conn: &Mutex<Connection>,
    sql: &str,
    params: &[Value],
) -> ExecutorResult<Option<QueryResult>> {
    let started = Instant::now();
    let conn = lock(conn)?;
    let mut stmt = conn.prepare(sql)?;

    if stmt.column_count() == 0 {
        return Ok(None);
    }

    let columns: Vec<ResultColumn> = stmt
        .columns()
        .iter()
        .map(|c| ResultColumn::new(c.name(), c.decl_type().map(str::to_string)))
        .collect();

    let bound: Vec<SqlValue> = params.iter().map(json_to_sql).collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(bound.iter()))?;

    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Record::new();
        for (i, column) in columns.iter().enumerate() {
            record.insert(column.name.clone(), sql_to_json(row.get_ref(i)?));
        }
        records.push(record);
    }

    Ok(Some(QueryResult::new(columns, records, started.elapsed())))
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn execute(&self, sql: &str, params: &[Value]) -> ExecutorResult<Option<QueryResult>> {
        let conn = Arc::clone(&self.conn);
        let sql = sql.to_string();
        let params = params.to_vec();
        tokio::task::spawn_blocking(move || run_query(&conn, &sql, &params))
            .await
            .map_err(|e| ExecutorError::Connection(format!("sqlite query task failed: {e}")))?
    }

    fn driver(&self) -> &str {
        "sqlite"
    }
}

fn json_to_sql(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => n.as_f64().map_or(SqlValue::Null, SqlValue::Real),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(bytes.iter().map(|b| format!("{b:02x}")).collect()),
    }
}
