use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Record;

/// A named SQL query definition.
///
/// `sql_query` is a template; `@name` placeholders are filled from query
/// parameters at execution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub id: String,
    pub name: String,
    pub sql_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<QueryParameter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<DatasetField>>,
}

impl Dataset {
    /// Declared or inferred field names.
    pub fn field_names(&self) -> Vec<String> {
        self.fields
            .iter()
            .flatten()
            .map(|f| f.name.clone())
            .collect()
    }
}

/// Everything needed to register a dataset except its id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDef {
    pub name: String,
    pub sql_query: String,
    #[serde(default)]
    pub parameters: Option<Vec<QueryParameter>>,
    #[serde(default)]
    pub fields: Option<Vec<DatasetField>>,
}

impl DatasetDef {
    pub fn new(name: impl Into<String>, sql_query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_query: sql_query.into(),
            parameters: None,
            fields: None,
        }
    }

    pub fn with_parameters(mut self, parameters: Vec<QueryParameter>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_fields(mut self, fields: Vec<DatasetField>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub(crate) fn into_dataset(self, id: String) -> Dataset {
        Dataset {
            id,
            name: self.name,
            sql_query: self.sql_query,
            parameters: self.parameters,
            fields: self.fields,
        }
    }
}

/// Partial update for a dataset. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetPatch {
    pub name: Option<String>,
    pub sql_query: Option<String>,
    pub parameters: Option<Vec<QueryParameter>>,
    pub fields: Option<Vec<DatasetField>>,
}

impl DatasetPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_sql_query(mut self, sql: impl Into<String>) -> Self {
        self.sql_query = Some(sql.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<QueryParameter>) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_fields(mut self, fields: Vec<DatasetField>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub(crate) fn apply_to(self, dataset: &mut Dataset) {
        if let Some(name) = self.name {
            dataset.name = name;
        }
        if let Some(sql) = self.sql_query {
            dataset.sql_query = sql;
        }
        if let Some(parameters) = self.parameters {
            dataset.parameters = Some(parameters);
        }
        if let Some(fields) = self.fields {
            dataset.fields = Some(fields);
        }
    }
}

/// A declared query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,
    #[serde(default)]
    pub required: bool,
}

impl QueryParameter {
    pub fn new(name: impl Into<String>, param_type: FieldType) -> Self {
        Self {
            name: name.into(),
            param_type,
            default_value: None,
            required: false,
        }
    }

    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Value type of a field or parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Date,
    Boolean,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetField {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl DatasetField {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Cached result of the last successful execution of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetCache {
    pub rows: Vec<Record>,
    /// Keys of the first row; empty when no rows came back.
    pub fields: Vec<String>,
    pub executed_at: DateTime<Utc>,
}

impl DatasetCache {
    pub(crate) fn new(rows: Vec<Record>) -> Self {
        let fields = rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default();
        Self {
            rows,
            fields,
            executed_at: Utc::now(),
        }
    }
}
