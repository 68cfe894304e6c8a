//! Read-only SQL gate behaviour.

use folio::sql::{gate_query, sanitize_query, validate_select_query, GateError, FORBIDDEN_KEYWORDS};

#[test]
fn test_plain_select_passes() {
    let report = validate_select_query("SELECT * FROM t").unwrap();
    assert!(!report.union_select);
}

#[test]
fn test_leading_keyword_must_be_select() {
    assert_eq!(
        validate_select_query("DROP TABLE t"),
        Err(GateError::NotAReadQuery)
    );
    assert_eq!(
        validate_select_query("WITH x AS (SELECT 1) SELECT * FROM x"),
        Err(GateError::NotAReadQuery)
    );
    assert!(validate_select_query("  select 1").is_ok());
}

#[test]
fn test_stacked_statements_rejected() {
    assert_eq!(
        validate_select_query("SELECT * FROM t; DROP TABLE t;"),
        Err(GateError::MultipleStatements)
    );
    assert_eq!(
        validate_select_query("SELECT 1; SELECT 2"),
        Err(GateError::MultipleStatements)
    );
}

#[test]
fn test_single_trailing_semicolon_tolerated() {
    assert!(validate_select_query("SELECT 1;").is_ok());
    assert!(validate_select_query("SELECT 1;   ").is_ok());
    assert_eq!(sanitize_query("  SELECT 1;  "), "SELECT 1");
}

#[test]
fn test_comments_rejected() {
    for sql in ["SELECT 1 -- comment", "SELECT /* x */ 1", "SELECT 1 */"] {
        assert_eq!(
            validate_select_query(sql),
            Err(GateError::CommentsNotAllowed),
            "{sql}"
        );
    }
}

#[test]
fn test_every_forbidden_keyword_rejected() {
    for keyword in FORBIDDEN_KEYWORDS {
        let sql = format!("SELECT * FROM t WHERE x = {} y", keyword.to_lowercase());
        assert_eq!(
            validate_select_query(&sql),
            Err(GateError::ForbiddenKeyword((*keyword).to_string())),
            "{sql}"
        );
    }
}

#[test]
fn test_keywords_match_whole_words_only() {
    assert!(validate_select_query("SELECT updated_at, created_by FROM t").is_ok());
    assert!(validate_select_query("SELECT dropped FROM t").is_ok());
    assert!(validate_select_query("SELECT mysql_version FROM t").is_ok());
}

#[test]
fn test_multi_word_keywords_span_whitespace() {
    assert_eq!(
        validate_select_query("SELECT * FROM t INTO\n  OUTFILE '/tmp/x'"),
        Err(GateError::ForbiddenKeyword("INTO OUTFILE".to_string()))
    );
    assert_eq!(
        validate_select_query("SELECT user FROM mysql.user"),
        Err(GateError::ForbiddenKeyword("MYSQL.".to_string()))
    );
}

#[test]
fn test_keyword_inside_literal_still_rejected() {
    assert_eq!(
        validate_select_query("SELECT * FROM notes WHERE body = 'please delete me'"),
        Err(GateError::ForbiddenKeyword("DELETE".to_string()))
    );
}

#[test]
fn test_union_select_allowed_but_flagged() {
    let report = validate_select_query("SELECT a FROM t UNION ALL SELECT b FROM u").unwrap();
    assert!(report.union_select);
    let report = validate_select_query("SELECT a FROM t union select b FROM u").unwrap();
    assert!(report.union_select);
}

#[test]
fn test_empty_rejected() {
    assert_eq!(validate_select_query("   "), Err(GateError::Empty));
}

#[test]
fn test_gate_query_returns_sanitized_text() {
    let (sql, _) = gate_query("  SELECT region FROM sales;\n").unwrap();
    assert_eq!(sql, "SELECT region FROM sales");
    assert!(gate_query("DELETE FROM sales").is_err());
}

#[test]
fn test_error_messages() {
    insta::assert_snapshot!(
        GateError::ForbiddenKeyword("DROP".to_string()).to_string(),
        @r#"Keyword "DROP" is not allowed"#
    );
    insta::assert_snapshot!(GateError::MultipleStatements.to_string(), @"Multiple statements are not allowed");
}
