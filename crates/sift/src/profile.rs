//! Per-column statistics and type inference.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dataset::{Row, Value};

/// ISO calendar dates (YYYY-MM-DD). Anything fancier is left to the
/// reasoning collaborator's audit enrichment.
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

/// Inferred type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Every non-missing value is a number.
    Numeric,
    /// Discrete, non-numeric values.
    Categorical,
    /// Every non-missing value is an ISO date.
    Date,
    /// No non-missing values to infer from.
    Unknown,
}

impl ColumnType {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Categorical => "categorical",
            ColumnType::Date => "date",
            ColumnType::Unknown => "unknown",
        }
    }
}

/// Statistics for one column of one dataset snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnStats {
    /// Column name.
    pub column: String,
    /// Inferred data type.
    pub inferred_type: ColumnType,
    /// Number of distinct non-missing values.
    pub unique_count: usize,
    /// Number of missing values (null, absent, or empty string).
    pub missing_count: usize,
    /// Minimum (numeric columns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum (numeric columns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Mean (numeric columns only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg: Option<f64>,
    /// Outlier count, when the reasoning collaborator has supplied one.
    /// Never computed locally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outlier_count: Option<usize>,
}

/// Compute one [`ColumnStats`] per header, in header order.
///
/// A pure function of its inputs: re-profiling an unchanged record set
/// always yields identical output. Missing means `Value::Missing`, an
/// absent key, or an empty string.
pub fn profile_columns(headers: &[String], records: &[Row]) -> Vec<ColumnStats> {
    headers
        .iter()
        .map(|header| profile_column(header, records))
        .collect()
}

fn profile_column(name: &str, records: &[Row]) -> ColumnStats {
    let total = records.len();
    let mut distinct: HashSet<String> = HashSet::new();
    let mut numbers: Vec<f64> = Vec::new();
    let mut text_count = 0usize;
    let mut all_dates = true;
    let mut non_missing = 0usize;

    for row in records {
        let value = match row.get(name) {
            None | Some(Value::Missing) => continue,
            Some(Value::Text(t)) if t.is_empty() => continue,
            Some(v) => v,
        };
        non_missing += 1;
        distinct.insert(value.to_string());
        match value {
            Value::Number(n) => numbers.push(*n),
            Value::Text(t) => {
                text_count += 1;
                if !ISO_DATE.is_match(t) {
                    all_dates = false;
                }
            }
            Value::Missing => unreachable!(),
        }
    }

    // Strict all-or-nothing rule: one non-numeric value makes the whole
    // column categorical. No "mostly numeric" threshold exists.
    let inferred_type = if non_missing == 0 {
        ColumnType::Unknown
    } else if numbers.len() == non_missing {
        ColumnType::Numeric
    } else if text_count == non_missing && all_dates {
        ColumnType::Date
    } else {
        ColumnType::Categorical
    };

    let (min, max, avg) = if inferred_type == ColumnType::Numeric {
        let min = numbers.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let avg = numbers.iter().sum::<f64>() / numbers.len() as f64;
        (Some(min), Some(max), Some(avg))
    } else {
        (None, None, None)
    };

    ColumnStats {
        column: name.to_string(),
        inferred_type,
        unique_count: distinct.len(),
        missing_count: total - non_missing,
        min,
        max,
        avg,
        outlier_count: None,
    }
}
