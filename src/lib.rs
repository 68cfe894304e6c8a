//! # Folio
//!
//! The core of a banded report designer: a canvas of typed elements with
//! snapshot undo/redo, bound to SQL datasets that pass a read-only gate
//! before they run.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 ReportSession (per report)               │
//! └─────────────────────────────────────────────────────────┘
//!          │                                   │
//!          ▼                                   ▼
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │  Canvas + History    │        │  DatasetRegistry          │
//! │  (elements, undo)    │ ─ id ─►│  (defs, cache, errors)    │
//! └──────────────────────┘        └──────────────────────────┘
//!          │                                   │
//!          ▼                                   ▼ [params → gate]
//! ┌──────────────────────┐        ┌──────────────────────────┐
//! │  Element model       │        │  QueryExecutor            │
//! │  (text/number/list/  │        │  (SQLite | query worker)  │
//! │   chart)             │        └──────────────────────────┘
//! └──────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │         ReportLayout (pageSettings, datasets, bands)     │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod canvas;
pub mod config;
pub mod dataset;
pub mod element;
pub mod executor;
pub mod logging;
pub mod report;
pub mod session;
pub mod sql;
pub mod worker;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::canvas::{Canvas, CanvasState, History};
    pub use crate::config::Settings;
    pub use crate::dataset::{
        Dataset, DatasetDef, DatasetError, DatasetPatch, DatasetRegistry, QueryParams, Record,
    };
    pub use crate::element::{
        create_element, ElementBody, ElementError, ElementKind, ElementPatch, Position,
        ReportElement, Size,
    };
    pub use crate::executor::{QueryExecutor, QueryResult, SqliteExecutor};
    pub use crate::report::{Band, BandType, PageSettings, ReportLayout};
    pub use crate::session::ReportSession;
    pub use crate::sql::{gate_query, sanitize_query, validate_select_query, GateError};
}

pub use session::ReportSession;
