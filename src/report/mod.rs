//! Report assembly: the persisted document that ties page settings,
//! datasets and banded elements together.
//!
//! ```json
//! {
//!   "version": "1.0",
//!   "pageSettings": { "width": 210, "height": 297, "orientation": "portrait",
//!                     "margins": { "top": 20, "right": 15, "bottom": 20, "left": 15 },
//!                     "backgroundColor": "#ffffff" },
//!   "datasets": [ ... ],
//!   "bands": [ { "id": "...", "type": "detail", "height": 257, "elements": [ ... ] } ]
//! }
//! ```

mod layout;
mod page;

pub use layout::{Band, BandType, ReportLayout, LAYOUT_VERSION};
pub use page::{Margins, Orientation, PageSettings};

/// Result type for document operations.
pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Failed to read or write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid report JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported report version: {0}")]
    UnsupportedVersion(String),
}
