//! Query parameter resolution and `@name` substitution.
//!
//! Substitution is plain text replacement. Values are not quoted or
//! escaped, so a value can change the meaning of the query; the SQL gate
//! runs on the substituted text.

use serde_json::Value;

use super::types::QueryParameter;
use super::{DatasetError, DatasetResult, QueryParams};

/// Merge caller params with declared defaults.
///
/// Caller values win. A declared parameter with no caller value falls back
/// to its default; if it has none and is required, resolution fails.
pub fn resolve_params(
    declared: Option<&[QueryParameter]>,
    supplied: Option<&QueryParams>,
) -> DatasetResult<QueryParams> {
    let mut resolved = supplied.cloned().unwrap_or_default();

    for param in declared.unwrap_or_default() {
        if resolved.contains_key(&param.name) {
            continue;
        }
        match &param.default_value {
            Some(value) => {
                resolved.insert(param.name.clone(), value.clone());
            }
            None if param.required => {
                return Err(DatasetError::MissingParameter(param.name.clone()));
            }
            None => {}
        }
    }

    Ok(resolved)
}

/// Replace every `@name` in `sql` with the text of `params[name]`.
///
/// Longer names go first so `@region_id` is not clobbered by `@region`.
pub fn substitute_params(sql: &str, params: &QueryParams) -> String {
    let mut names: Vec<&String> = params.keys().collect();
    names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

    let mut out = sql.to_string();
    for name in names {
        let placeholder = format!("@{name}");
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &value_text(&params[name.as_str()]));
        }
    }
    out
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
