//! Conservative read-only gate for user-authored SQL.
//!
//! This is a textual allow/deny heuristic, not a parser. It cannot see
//! inside string literals, so a deny-listed word quoted in a literal is still
//! rejected.
//!
//! Rules (all must pass):
//!
//! 1. The trimmed text starts with `SELECT` (case-insensitive).
//! 2. No comment markers: `--`, `/*`, `*/`.
//! 3. At most one `;`, and only as the final character.
//! 4. No deny-listed keyword as a whole word.
//!
//! `UNION [ALL] SELECT` passes but is flagged on the returned [`GateReport`].

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

/// Keywords rejected anywhere in a query, matched as whole words.
pub const FORBIDDEN_KEYWORDS: &[&str] = &[
    // Mutation / DDL
    "DROP",
    "DELETE",
    "TRUNCATE",
    "ALTER",
    "CREATE",
    "INSERT",
    "UPDATE",
    "GRANT",
    "REVOKE",
    "EXEC",
    "EXECUTE",
    "CALL",
    // File side effects
    "INTO OUTFILE",
    "INTO DUMPFILE",
    "LOAD_FILE",
    // Timing / DoS
    "BENCHMARK",
    "SLEEP",
    // Metadata schemas
    "INFORMATION_SCHEMA",
    "PERFORMANCE_SCHEMA",
    "MYSQL.",
];

static FORBIDDEN_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    FORBIDDEN_KEYWORDS
        .iter()
        .map(|keyword| (*keyword, keyword_regex(keyword)))
        .collect()
});

static UNION_SELECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bUNION\s+(?:ALL\s+)?SELECT\b").expect("static regex"));

fn keyword_regex(keyword: &str) -> Regex {
    let body = keyword
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");
    // `MYSQL.` ends in a non-word char; keep the leading boundary only there.
    let pattern = if keyword.ends_with('.') {
        format!(r"(?i)\b{body}")
    } else {
        format!(r"(?i)\b{body}\b")
    };
    Regex::new(&pattern).expect("keyword patterns are static")
}

/// Why a query was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Query is empty")]
    Empty,

    #[error("Only SELECT queries are allowed")]
    NotAReadQuery,

    #[error("Keyword \"{0}\" is not allowed")]
    ForbiddenKeyword(String),

    #[error("Comments are not allowed")]
    CommentsNotAllowed,

    #[error("Multiple statements are not allowed")]
    MultipleStatements,
}

pub type GateResult<T> = Result<T, GateError>;

/// Observations about a query that passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GateReport {
    /// The query contains `UNION [ALL] SELECT` and should be monitored.
    pub union_select: bool,
}

/// Check that `sql` is a single, comment-free, read-only query.
///
/// # Errors
///
/// Returns the first rule the query breaks.
pub fn validate_select_query(sql: &str) -> GateResult<GateReport> {
    let trimmed = sql.trim();
    if trimmed.is_empty() {
        return Err(GateError::Empty);
    }

    if !trimmed.to_uppercase().starts_with("SELECT") {
        return Err(GateError::NotAReadQuery);
    }

    if sql.contains("--") || sql.contains("/*") || sql.contains("*/") {
        return Err(GateError::CommentsNotAllowed);
    }

    let semicolons = sql.matches(';').count();
    if semicolons > 1 || (semicolons == 1 && !trimmed.ends_with(';')) {
        return Err(GateError::MultipleStatements);
    }

    if let Some((keyword, _)) = FORBIDDEN_PATTERNS.iter().find(|(_, re)| re.is_match(sql)) {
        return Err(GateError::ForbiddenKeyword((*keyword).to_string()));
    }

    let union_select = UNION_SELECT.is_match(sql);
    if union_select {
        warn!(sql = trimmed, "query contains UNION SELECT; flagged for monitoring");
    }

    Ok(GateReport { union_select })
}

/// Trim whitespace and drop a single trailing `;`. No other rewriting.
pub fn sanitize_query(sql: &str) -> String {
    let trimmed = sql.trim();
    trimmed
        .strip_suffix(';')
        .map(str::trim_end)
        .unwrap_or(trimmed)
        .to_string()
}

/// Validate, then sanitize. The form every executor receives.
pub fn gate_query(sql: &str) -> GateResult<(String, GateReport)> {
    let report = validate_select_query(sql)?;
    Ok((sanitize_query(sql), report))
}
