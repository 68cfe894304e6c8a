//! Async client for the external query worker process.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, warn};

use super::error::{WorkerError, WorkerResult};
use super::protocol::{
    methods, ConnectionParams, ErrorInfo, ExecuteQueryParams, ExecuteQueryResponse,
    RequestEnvelope, ResponseEnvelope,
};
use crate::config::WorkerSettings;

type PendingMap = Arc<Mutex<HashMap<String, oneshot::Sender<ResponseEnvelope>>>>;

/// Async client for the query worker.
///
/// The worker runs as a child process speaking NDJSON over stdin/stdout.
/// Each request carries a unique id, so several dataset queries can be in
/// flight at once. The request timeout lives here; the dataset pipeline
/// itself never times out a query.
pub struct WorkerClient {
    stdin: Arc<Mutex<BufWriter<ChildStdin>>>,
    pending: PendingMap,
    _child: Child,
    reader_task: tokio::task::JoinHandle<()>,
    timeout: Duration,
}

impl WorkerClient {
    /// Spawn the worker described by `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::NotFound`] if no binary can be located, or
    /// [`WorkerError::SpawnFailed`] if it cannot be started.
    pub async fn spawn_with_settings(settings: &WorkerSettings) -> WorkerResult<Self> {
        let path = settings.resolved_path().ok_or(WorkerError::NotFound)?;
        Self::spawn(
            &path,
            &settings.args,
            Duration::from_secs(settings.timeout_secs),
        )
        .await
    }

    /// Spawn a worker binary with arguments and a request timeout.
    pub async fn spawn<P: AsRef<Path>>(
        worker_path: P,
        args: &[String],
        timeout: Duration,
    ) -> WorkerResult<Self> {
        let mut child = Command::new(worker_path.as_ref())
            .args(args)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(WorkerError::SpawnFailed)?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| WorkerError::SpawnFailed(io::Error::other("stdin not captured")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| WorkerError::SpawnFailed(io::Error::other("stdout not captured")))?;

        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let reader_task = Self::spawn_reader_task(stdout, pending.clone());

        debug!(path = %worker_path.as_ref().display(), "query worker spawned");

        Ok(Self {
            stdin: Arc::new(Mutex::new(BufWriter::new(stdin))),
            pending,
            _child: child,
            reader_task,
            timeout,
        })
    }

    /// Background task routing response lines to waiting callers.
    fn spawn_reader_task(stdout: ChildStdout, pending: PendingMap) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => match serde_json::from_str::<ResponseEnvelope>(&line) {
                        Ok(resp) => {
                            if let Some(tx) = pending.lock().await.remove(&resp.id) {
                                let _ = tx.send(resp);
                            }
                        }
                        Err(e) => warn!(error = %e, "worker: unparseable response line"),
                    },
                    Err(e) => {
                        warn!(error = %e, "worker: read error");
                        break;
                    }
                }
            }

            // Worker gone: fail everything still waiting.
            let mut pending = pending.lock().await;
            for (id, tx) in pending.drain() {
                let _ = tx.send(ResponseEnvelope {
                    id,
                    success: false,
                    result: None,
                    error: Some(ErrorInfo {
                        code: "WORKER_EXITED".to_string(),
                        message: "Worker process exited unexpectedly".to_string(),
                    }),
                });
            }
        })
    }

    /// Send a request and wait for the matching response.
    ///
    /// # Errors
    ///
    /// Fails on serialization, write, timeout, a worker error response, or a
    /// response that does not deserialize into `R`.
    pub async fn request<P, R>(&self, method: &str, params: P) -> WorkerResult<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = uuid::Uuid::new_v4().to_string();

        let request = RequestEnvelope {
            id: id.clone(),
            method: method.to_string(),
            params: serde_json::to_value(params).map_err(WorkerError::SerializeFailed)?,
        };
        let line = serde_json::to_string(&request).map_err(WorkerError::SerializeFailed)? + "\n";

        // Registered before writing so a fast response cannot be dropped.
        let (tx, rx) = oneshot::channel();
        self.pending.lock().await.insert(id.clone(), tx);

        if let Err(e) = self.write_line(&line).await {
            self.pending.lock().await.remove(&id);
            return Err(WorkerError::WriteFailed(e));
        }

        let response = match tokio::time::timeout(self.timeout, rx).await {
            Ok(resp) => resp?,
            Err(_) => {
                self.pending.lock().await.remove(&id);
                return Err(WorkerError::Timeout(self.timeout.as_secs()));
            }
        };

        if response.success {
            let result = response.result.unwrap_or(serde_json::Value::Null);
            serde_json::from_value(result).map_err(WorkerError::DeserializeFailed)
        } else {
            let error = response.error.unwrap_or_else(|| ErrorInfo {
                code: "UNKNOWN".to_string(),
                message: "Unknown error".to_string(),
            });
            Err(Self::classify_error(&error.code, &error.message))
        }
    }

    async fn write_line(&self, line: &str) -> io::Result<()> {
        let mut stdin = self.stdin.lock().await;
        stdin.write_all(line.as_bytes()).await?;
        stdin.flush().await
    }

    /// Map a worker error code onto a specific error variant.
    fn classify_error(code: &str, message: &str) -> WorkerError {
        match code {
            "DRIVER_NOT_FOUND" => WorkerError::DriverNotFound(message.to_string()),
            "CONNECTION_FAILED" => WorkerError::ConnectionFailed(message.to_string()),
            "QUERY_FAILED" => WorkerError::QueryFailed(message.to_string()),
            "WORKER_EXITED" => WorkerError::ChannelClosed,
            _ => WorkerError::remote(code, message),
        }
    }

    /// Run a query through `query.execute`.
    pub async fn execute_query(
        &self,
        connection: &ConnectionParams,
        sql: &str,
        args: &[serde_json::Value],
    ) -> WorkerResult<ExecuteQueryResponse> {
        self.request(
            methods::EXECUTE_QUERY,
            ExecuteQueryParams {
                connection: connection.clone(),
                sql: sql.to_string(),
                args: args.to_vec(),
            },
        )
        .await
    }
}

impl Drop for WorkerClient {
    fn drop(&mut self) {
        self.reader_task.abort();
    }
}
