//! Wire types for the query worker.
//!
//! One JSON object per line in each direction. Requests carry an id that the
//! worker echoes back so responses can be matched to callers out of order.

use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Envelope
// ============================================================================

/// Request envelope sent to the worker.
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Unique request ID for correlation.
    pub id: String,
    /// Method name (e.g., "query.execute").
    pub method: String,
    /// Method-specific parameters.
    pub params: serde_json::Value,
}

/// Response envelope received from the worker.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Request ID this response corresponds to.
    pub id: String,
    /// Whether the request succeeded.
    pub success: bool,
    /// Result data (present if success = true).
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    /// Error information (present if success = false).
    #[serde(default)]
    pub error: Option<ErrorInfo>,
}

/// Error information in a failed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

// ============================================================================
// Parameters
// ============================================================================

/// Database connection parameters, sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// Database driver name (e.g., "mysql", "postgres").
    pub driver: String,
    /// Driver-specific connection string.
    pub connection_string: String,
}

/// Parameters for `query.execute`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteQueryParams {
    #[serde(flatten)]
    pub connection: ConnectionParams,
    /// Gate-approved, sanitized SQL.
    pub sql: String,
    /// Positional parameters, bound by the worker.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<serde_json::Value>,
}

// ============================================================================
// Responses
// ============================================================================

/// Column information in query results.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResultColumn {
    /// Column name or alias.
    pub name: String,
    /// Database-specific type.
    #[serde(default)]
    pub data_type: Option<String>,
}

/// Response from `query.execute`.
///
/// `rows` is absent when the statement produced no result set.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteQueryResponse {
    #[serde(default)]
    pub columns: Vec<QueryResultColumn>,
    #[serde(default)]
    pub rows: Option<Vec<Vec<serde_json::Value>>>,
    #[serde(default)]
    pub execution_time_ms: Option<u64>,
}

// ============================================================================
// Method Names
// ============================================================================

pub mod methods {
    pub const EXECUTE_QUERY: &str = "query.execute";
}
