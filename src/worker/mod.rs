//! Communication with an external query worker.
//!
//! Databases other than SQLite are reached through a long-running worker
//! process that owns the drivers and connection pools. Folio only ever sends
//! it gate-approved `SELECT` text.
//!
//! ```text
//! ┌──────────────────────────────┐   stdin (NDJSON)   ┌─────────────────┐
//! │ WorkerClient (Tokio)         │ ─────────────────► │  query worker   │
//! │  - request ids for concurrent│                    │  (any language) │
//! │    dataset executions        │ ◄───────────────── │                 │
//! └──────────────────────────────┘   stdout (NDJSON)  └─────────────────┘
//! ```

mod client;
mod error;
pub mod protocol;

pub use client::WorkerClient;
pub use error::{WorkerError, WorkerResult};
