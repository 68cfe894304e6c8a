//! Datasets executed end to end against in-memory SQLite.

use std::sync::Arc;

use folio::dataset::{DatasetDef, DatasetError, DatasetRegistry, FieldType, QueryParams};
use folio::executor::SqliteExecutor;
use serde_json::json;

fn sales_db() -> Arc<SqliteExecutor> {
    let executor = SqliteExecutor::open_in_memory().unwrap();
    executor
        .execute_batch(
            "CREATE TABLE sales (region TEXT, amount REAL, sold_on DATE, paid BOOLEAN);
             INSERT INTO sales VALUES ('north', 120.5, '2024-01-03', 1);
             INSERT INTO sales VALUES ('south', 80.0, '2024-01-09', 0);
             INSERT INTO sales VALUES ('north', 42.0, '2024-02-11', 1);",
        )
        .unwrap();
    Arc::new(executor)
}

#[tokio::test]
async fn test_grouped_query_round_trip() {
    let mut registry = DatasetRegistry::new(sales_db());
    let id = registry
        .add_dataset(DatasetDef::new(
            "By region",
            "SELECT region, SUM(amount) AS total FROM sales GROUP BY region ORDER BY region;",
        ))
        .id
        .clone();

    let cache = registry.execute_dataset(&id, None).await.unwrap();
    assert_eq!(cache.fields, ["region", "total"]);
    assert_eq!(cache.rows[0]["region"], json!("north"));
    assert_eq!(cache.rows[0]["total"], json!(162.5));
    assert_eq!(cache.rows[1]["total"], json!(80.0));
}

#[tokio::test]
async fn test_field_inference_uses_column_types() {
    let mut registry = DatasetRegistry::new(sales_db());
    let id = registry
        .add_dataset(DatasetDef::new(
            "Raw",
            "SELECT region, amount, sold_on FROM sales ORDER BY sold_on",
        ))
        .id
        .clone();
    registry.execute_dataset(&id, None).await.unwrap();

    let fields = registry.get_dataset(&id).unwrap().fields.clone().unwrap();
    let types: Vec<_> = fields.iter().map(|f| f.field_type).collect();
    assert_eq!(types, [FieldType::String, FieldType::Number, FieldType::Date]);
}

#[tokio::test]
async fn test_parameters_reach_sqlite() {
    let mut registry = DatasetRegistry::new(sales_db());
    let id = registry
        .add_dataset(DatasetDef::new(
            "Big sales",
            "SELECT region, amount FROM sales WHERE amount >= @min ORDER BY amount DESC",
        ))
        .id
        .clone();

    let mut params = QueryParams::new();
    params.insert("min".to_string(), json!(50));
    let cache = registry.execute_dataset(&id, Some(&params)).await.unwrap();
    assert_eq!(cache.rows.len(), 2);
    assert_eq!(cache.rows[0]["amount"], json!(120.5));
}

#[tokio::test]
async fn test_empty_result_is_cached() {
    let mut registry = DatasetRegistry::new(sales_db());
    let id = registry
        .add_dataset(DatasetDef::new("None", "SELECT * FROM sales WHERE 1 = 0"))
        .id
        .clone();

    let cache = registry.execute_dataset(&id, None).await.unwrap();
    assert!(cache.rows.is_empty());
    assert!(cache.fields.is_empty());
    assert!(registry.get_dataset(&id).unwrap().fields.is_none());
}

#[tokio::test]
async fn test_sqlite_errors_are_recorded() {
    let mut registry = DatasetRegistry::new(sales_db());
    let id = registry
        .add_dataset(DatasetDef::new("Broken", "SELECT missing_column FROM sales"))
        .id
        .clone();

    let err = registry.execute_dataset(&id, None).await.unwrap_err();
    assert!(matches!(err, DatasetError::Execution(ref msg) if msg.contains("missing_column")));
    assert_eq!(registry.get_dataset_error(&id), Some(&err));
}

#[tokio::test]
async fn test_execute_all_on_one_connection() {
    let mut registry = DatasetRegistry::new(sales_db());
    registry.add_dataset(DatasetDef::new("Count", "SELECT COUNT(*) AS n FROM sales"));
    registry.add_dataset(DatasetDef::new("Max", "SELECT MAX(amount) AS top FROM sales"));

    let summaries = registry.execute_all_datasets(None).await;
    assert!(summaries.iter().all(|s| s.outcome == Ok(1)));

    let count_id = &registry.datasets()[0].id;
    assert_eq!(registry.get_dataset_data(count_id)[0]["n"], json!(3));
}
