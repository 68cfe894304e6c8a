//! Field type inference from a sample row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

use super::types::{DatasetField, FieldType};
use super::Record;
use crate::executor::ResultColumn;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"];

/// One field per name, typed from the first row's values.
pub fn infer_fields(
    names: &[String],
    first_row: Option<&Record>,
    columns: &[ResultColumn],
) -> Vec<DatasetField> {
    names
        .iter()
        .map(|name| {
            let value = first_row.and_then(|row| row.get(name)).unwrap_or(&Value::Null);
            let column_type = columns
                .iter()
                .find(|c| &c.name == name)
                .and_then(|c| c.data_type.as_deref());
            DatasetField::new(name.clone(), infer_field_type(value, column_type))
        })
        .collect()
}

/// Numbers and booleans map directly. Anything else is a date if the
/// database says so or the text parses as one, else a string.
pub fn infer_field_type(value: &Value, column_type: Option<&str>) -> FieldType {
    match value {
        Value::Number(_) => FieldType::Number,
        Value::Bool(_) => FieldType::Boolean,
        _ if column_type.is_some_and(is_date_column_type) => FieldType::Date,
        Value::String(s) if looks_like_date(s) => FieldType::Date,
        _ => FieldType::String,
    }
}

fn is_date_column_type(data_type: &str) -> bool {
    let upper = data_type.to_ascii_uppercase();
    upper.contains("DATE") || upper.contains("TIME")
}

fn looks_like_date(s: &str) -> bool {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || DATETIME_FORMATS
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
}
