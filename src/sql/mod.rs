//! SQL handling for user-authored dataset queries.
//!
//! - [`gate`] - read-only validation and normalization applied before any execution

pub mod gate;

pub use gate::{
    gate_query, sanitize_query, validate_select_query, GateError, GateReport, GateResult,
    FORBIDDEN_KEYWORDS,
};
