//! Typed cell values and the row model.

use std::fmt;

use indexmap::IndexMap;
use serde::de::{Deserialize, Deserializer};
use serde::ser::{Serialize, Serializer};

/// A single cell value.
///
/// Every cell is one of three variants so that type inference and
/// missingness checks stay exhaustive. An empty string is a real `Text`
/// value at the parsing level; only the profiler treats it as missing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A finite numeric value.
    Number(f64),
    /// A text value (possibly empty).
    Text(String),
    /// An explicitly missing value (JSON null or absent key).
    Missing,
}

impl Value {
    /// Coerce a raw field into a typed value.
    ///
    /// A field becomes a number only when its trimmed form is non-empty and
    /// parses fully as a finite `f64`. Everything else stays text, including
    /// the empty string.
    pub fn parse_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            if let Ok(n) = trimmed.parse::<f64>() {
                if n.is_finite() {
                    return Value::Number(n);
                }
            }
        }
        Value::Text(raw.to_string())
    }

    /// Whether this value is the missing marker.
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric view of this value, when it has one.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(t) => write!(f, "{}", t),
            Value::Missing => Ok(()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::Text(t) => serializer.serialize_str(t),
            Value::Missing => serializer.serialize_unit(),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // The reasoning collaborator speaks JSON; anything it sends that is
        // not a scalar degrades to text rather than failing the whole row.
        let raw = serde_json::Value::deserialize(deserializer)?;
        Ok(match raw {
            serde_json::Value::Null => Value::Missing,
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => Value::Number(f),
                _ => Value::Text(n.to_string()),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Bool(b) => Value::Text(b.to_string()),
            other => Value::Text(other.to_string()),
        })
    }
}

/// A record keyed by column name, in header order.
pub type Row = IndexMap<String, Value>;

/// Drop any keys a collaborator response invented that are not dataset
/// headers. Keeps the record-key-subset invariant intact for rows that
/// round-trip through the reasoning service.
pub fn conform_rows(rows: Vec<Row>, headers: &[String]) -> Vec<Row> {
    rows.into_iter()
        .map(|mut row| {
            row.retain(|key, _| headers.iter().any(|h| h == key));
            row
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_numeric() {
        assert_eq!(Value::parse_field("42"), Value::Number(42.0));
        assert_eq!(Value::parse_field(" 3.5 "), Value::Number(3.5));
        assert_eq!(Value::parse_field("-1e3"), Value::Number(-1000.0));
    }

    #[test]
    fn test_parse_field_text() {
        assert_eq!(Value::parse_field("abc"), Value::Text("abc".to_string()));
        assert_eq!(Value::parse_field("12ab"), Value::Text("12ab".to_string()));
        // Booleans are text, not numbers.
        assert_eq!(Value::parse_field("true"), Value::Text("true".to_string()));
    }

    #[test]
    fn test_parse_field_empty_is_text() {
        assert_eq!(Value::parse_field(""), Value::Text(String::new()));
    }

    #[test]
    fn test_parse_field_non_finite_stays_text() {
        assert_eq!(Value::parse_field("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::parse_field("NaN"), Value::Text("NaN".to_string()));
    }

    #[test]
    fn test_value_json_roundtrip() {
        let json = r#"{"a": 1, "b": "x", "c": null, "d": true}"#;
        let row: Row = serde_json::from_str(json).unwrap();
        assert_eq!(row["a"], Value::Number(1.0));
        assert_eq!(row["b"], Value::Text("x".to_string()));
        assert_eq!(row["c"], Value::Missing);
        assert_eq!(row["d"], Value::Text("true".to_string()));
    }

    #[test]
    fn test_conform_rows_drops_unknown_keys() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let mut row = Row::new();
        row.insert("a".to_string(), Value::Number(1.0));
        row.insert("invented".to_string(), Value::Text("x".to_string()));

        let rows = conform_rows(vec![row], &headers);
        assert_eq!(rows[0].len(), 1);
        assert!(rows[0].contains_key("a"));
    }
}
