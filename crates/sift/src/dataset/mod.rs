//! Dataset snapshot model and ingestion.

mod parser;
mod row;

pub use parser::parse_delimited;
pub use row::{conform_rows, Row, Value};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::profile::{profile_columns, ColumnStats};

/// An immutable snapshot of a tabular dataset.
///
/// A dataset is created once on ingestion; every mutation goes through the
/// cleaning session's explicit commit, which produces a brand-new snapshot.
/// Invariants: every record's key set is a subset of `headers`, and
/// `column_stats` pairs 1:1 with `headers` in order.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    /// Display name (typically the source file name).
    pub name: String,
    /// Ordered, unique column names.
    pub headers: Vec<String>,
    /// Records keyed by header.
    pub records: Vec<Row>,
    /// One stats entry per header, in header order.
    pub column_stats: Vec<ColumnStats>,
    /// SHA-256 fingerprint of the snapshot contents.
    pub fingerprint: String,
    /// When this snapshot was created.
    pub created_at: DateTime<Utc>,
}

impl Dataset {
    /// Ingest raw comma-separated text into a profiled dataset.
    pub fn ingest(name: impl Into<String>, text: &str) -> Result<Self> {
        let (headers, records) = parse_delimited(text)?;
        let column_stats = profile_columns(&headers, &records);

        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let fingerprint = format!("sha256:{:x}", hasher.finalize());

        Ok(Self {
            name: name.into(),
            headers,
            records,
            column_stats,
            fingerprint,
            created_at: Utc::now(),
        })
    }

    /// Build a new snapshot from already-typed records, re-profiling stats.
    ///
    /// Used by the cleaning session when committing a working copy.
    pub fn from_records(name: String, headers: Vec<String>, records: Vec<Row>) -> Self {
        let column_stats = profile_columns(&headers, &records);
        let fingerprint = fingerprint_records(&records);

        Self {
            name,
            headers,
            records,
            column_stats,
            fingerprint,
            created_at: Utc::now(),
        }
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Stats for a column by name.
    pub fn stats_for(&self, column: &str) -> Option<&ColumnStats> {
        self.column_stats.iter().find(|s| s.column == column)
    }
}

/// Deterministic content fingerprint over typed records.
fn fingerprint_records(records: &[Row]) -> String {
    let mut hasher = Sha256::new();
    for row in records {
        for (key, value) in row {
            hasher.update(key.as_bytes());
            hasher.update([0x1f]);
            hasher.update(value.to_string().as_bytes());
            hasher.update([0x1e]);
        }
        hasher.update([0x1d]);
    }
    format!("sha256:{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ColumnType;

    #[test]
    fn test_ingest_profiles_every_header() {
        let dataset = Dataset::ingest("orders.csv", "id,amount\n1,9.5\n2,12\n").unwrap();
        assert_eq!(dataset.column_stats.len(), dataset.headers.len());
        assert_eq!(dataset.row_count(), 2);
        assert!(dataset.fingerprint.starts_with("sha256:"));
        assert_eq!(dataset.stats_for("amount").unwrap().inferred_type, ColumnType::Numeric);
    }

    #[test]
    fn test_from_records_recomputes_stats() {
        let original = Dataset::ingest("t", "a\n1\n2\n").unwrap();
        let mut records = original.records.clone();
        records.push(Row::from_iter([("a".to_string(), Value::Text("x".to_string()))]));

        let rebuilt = Dataset::from_records(
            original.name.clone(),
            original.headers.clone(),
            records,
        );
        assert_eq!(rebuilt.row_count(), 3);
        assert_eq!(rebuilt.stats_for("a").unwrap().inferred_type, ColumnType::Categorical);
        assert_ne!(rebuilt.fingerprint, original.fingerprint);
    }

    #[test]
    fn test_fingerprint_is_content_addressed() {
        let a = Dataset::ingest("a", "x\n1\n").unwrap();
        let b = Dataset::ingest("b", "x\n1\n").unwrap();
        assert_eq!(a.fingerprint, b.fingerprint);
    }
}
