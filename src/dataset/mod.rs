//! Datasets: named SQL queries, their execution pipeline, and result cache.
//!
//! ```text
//! execute_dataset(id, params)
//!     │
//!     ├─ resolve params (caller values, then declared defaults)
//!     ├─ substitute @name placeholders (textual)
//!     ├─ SQL gate: validate, then sanitize
//!     ├─ QueryExecutor::execute
//!     └─ cache rows + fields, infer field types
//! ```
//!
//! Failures never escape as panics: each one is recorded against the dataset
//! id (see [`DatasetRegistry::get_dataset_error`]) and also returned.

mod infer;
mod params;
mod registry;
mod types;

pub use infer::{infer_field_type, infer_fields};
pub use params::{resolve_params, substitute_params};
pub use registry::{DatasetRegistry, ExecutionSummary};
pub use types::{
    Dataset, DatasetCache, DatasetDef, DatasetField, DatasetPatch, FieldType, QueryParameter,
};

use crate::sql::GateError;

/// One result row, keyed by column name in column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Named parameter values for `@name` substitution.
pub type QueryParams = serde_json::Map<String, serde_json::Value>;

/// Result type for dataset operations.
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Errors recorded against a dataset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Gate(#[from] GateError),

    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("{0}")]
    Execution(String),

    #[error("No result returned")]
    NoResultReturned,
}
