//! Number rendering and field aggregation for data-bound elements.

use serde::{Deserialize, Serialize};

use super::types::NumberProperties;
use crate::dataset::Record;

/// Upper bound on rendered fraction digits.
pub const MAX_DECIMAL_PLACES: u32 = 20;

/// Aggregation applied to a bound field across all cached rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Sum,
    Avg,
    Count,
    Min,
    Max,
}

impl Aggregation {
    /// Aggregate `field` over `rows`.
    ///
    /// Only numeric values (or strings that parse as numbers) take part in
    /// `sum`/`avg`/`min`/`max`. `count` counts non-null values. Returns `None`
    /// when there is nothing to average or compare.
    pub fn apply(self, rows: &[Record], field: &str) -> Option<f64> {
        let values = || rows.iter().filter_map(|row| numeric_value(row.get(field)?));

        match self {
            Aggregation::Count => Some(
                rows.iter()
                    .filter(|row| row.get(field).is_some_and(|v| !v.is_null()))
                    .count() as f64,
            ),
            Aggregation::Sum => Some(values().sum()),
            Aggregation::Avg => {
                let (total, n) = values().fold((0.0, 0usize), |(t, n), v| (t + v, n + 1));
                (n > 0).then(|| total / n as f64)
            }
            Aggregation::Min => values().reduce(f64::min),
            Aggregation::Max => values().reduce(f64::max),
        }
    }
}

/// Numeric reading of a JSON value; numeric strings count.
pub fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

impl NumberProperties {
    /// Render `value` with this element's separators, precision and affixes.
    ///
    /// ```ignore
    /// // defaults: 2 decimals, "." thousands, "," decimals
    /// assert_eq!(props.format(1234567.891), "1.234.567,89");
    /// ```
    pub fn format(&self, value: f64) -> String {
        let places = self.decimal_places.min(MAX_DECIMAL_PLACES) as usize;
        let fixed = format!("{:.*}", places, value.abs());
        let (int_part, frac_part) = match fixed.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (fixed.as_str(), None),
        };

        let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');

        let mut out = String::new();
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix);
        }
        if negative {
            out.push('-');
        }
        out.push_str(&group_thousands(int_part, &self.thousands_separator));
        if let Some(frac) = frac_part {
            out.push_str(&self.decimal_separator);
            out.push_str(frac);
        }
        if let Some(suffix) = &self.suffix {
            out.push_str(suffix);
        }
        out
    }
}

fn group_thousands(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
