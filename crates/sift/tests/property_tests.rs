//! Property-based tests for the parser, profiler, and cleaning session.
//!
//! These verify the invariants that hold for any input:
//! 1. **No panics**: parsing and profiling never crash
//! 2. **Determinism**: same input always produces the same output
//! 3. **Schema containment**: record keys never escape the header set
//! 4. **Bounded payloads**: rows past the sample window are never altered

use proptest::prelude::*;

use sift::dataset::{parse_delimited, Dataset, Value};
use sift::profile::profile_columns;
use sift::{CleaningSession, ColumnType, SAMPLE_WINDOW};

/// Arbitrary text, including control characters and quotes.
fn any_text() -> impl Strategy<Value = String> {
    "[ -~\\n\\t\"]{0,200}"
}

/// A plausible CSV field without structural characters.
fn plain_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_. -]{0,12}"
}

/// A well-formed CSV document: fixed-width header plus data rows. Row
/// counts straddle the sample window so window-boundary behavior is hit.
fn csv_document() -> impl Strategy<Value = String> {
    (2usize..6).prop_flat_map(|width| {
        let header: Vec<String> = (0..width).map(|i| format!("col{}", i)).collect();
        prop::collection::vec(
            prop::collection::vec(plain_field(), width),
            1..SAMPLE_WINDOW + 20,
        )
        .prop_map(
            move |rows| {
                let mut text = header.join(",");
                text.push('\n');
                for row in rows {
                    text.push_str(&row.join(","));
                    text.push('\n');
                }
                text
            },
        )
    })
}

proptest! {
    #[test]
    fn parse_never_panics(text in any_text()) {
        let _ = parse_delimited(&text);
    }

    #[test]
    fn parse_is_deterministic(text in any_text()) {
        let first = parse_delimited(&text);
        let second = parse_delimited(&text);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "parse determinism violated"),
        }
    }

    #[test]
    fn record_keys_stay_within_headers(text in any_text()) {
        if let Ok((headers, records)) = parse_delimited(&text) {
            for row in &records {
                for key in row.keys() {
                    prop_assert!(headers.contains(key));
                }
            }
        }
    }

    #[test]
    fn field_typing_is_deterministic(field in plain_field()) {
        prop_assert_eq!(Value::parse_field(&field), Value::parse_field(&field));
    }

    #[test]
    fn numeric_fields_round_trip(n in -1e9f64..1e9f64) {
        let parsed = Value::parse_field(&n.to_string());
        match parsed {
            Value::Number(v) => prop_assert!((v - n).abs() < 1e-6 * n.abs().max(1.0)),
            other => prop_assert!(false, "expected number, got {:?}", other),
        }
    }

    #[test]
    fn profile_counts_are_bounded(text in csv_document()) {
        let (headers, records) = parse_delimited(&text).unwrap();
        let stats = profile_columns(&headers, &records);

        prop_assert_eq!(stats.len(), headers.len());
        for s in &stats {
            prop_assert!(s.unique_count <= records.len());
            prop_assert!(s.missing_count <= records.len());
            if s.inferred_type == ColumnType::Numeric {
                let (min, max) = (s.min.unwrap(), s.max.unwrap());
                prop_assert!(min <= max);
                // Summation rounding can push the mean a hair past the bounds.
                let tolerance = min.abs().max(max.abs()).max(1.0) * 1e-9;
                let avg = s.avg.unwrap();
                prop_assert!(min - tolerance <= avg && avg <= max + tolerance);
            } else {
                prop_assert!(s.min.is_none() && s.max.is_none() && s.avg.is_none());
            }
        }
    }

    #[test]
    fn profiling_is_idempotent(text in csv_document()) {
        let (headers, records) = parse_delimited(&text).unwrap();
        prop_assert_eq!(
            profile_columns(&headers, &records),
            profile_columns(&headers, &records)
        );
    }

    #[test]
    fn fingerprint_depends_only_on_content(text in csv_document()) {
        let a = Dataset::ingest("a.csv", &text).unwrap();
        let b = Dataset::ingest("b.csv", &text).unwrap();
        prop_assert_eq!(a.fingerprint, b.fingerprint);
    }

    #[test]
    fn rows_beyond_sample_window_survive_any_apply(
        text in csv_document(),
        replacement_len in 0usize..10,
    ) {
        let mut session = CleaningSession::new(Dataset::ingest("p.csv", &text).unwrap());
        let tail_before: Vec<_> = session
            .working()
            .iter()
            .skip(SAMPLE_WINDOW)
            .cloned()
            .collect();

        let response: sift::clean::AuditResponse = serde_json::from_str(
            r#"{"actions": [{"title": "t", "suggestedTransform": "x"}]}"#,
        ).unwrap();
        let (ticket, _) = session.begin_audit();
        session.finish_audit(ticket, Ok(response)).unwrap();

        let id = session.actions()[0].id.clone();
        let rows = serde_json::json!({
            "rows": (0..replacement_len).map(|i| serde_json::json!({"col0": i})).collect::<Vec<_>>()
        });
        let (ticket, _) = session.begin_apply(&id).unwrap();
        session
            .finish_apply(ticket, &id, Ok(serde_json::from_value(rows).unwrap()))
            .unwrap();

        let tail_after: Vec<_> = session
            .working()
            .iter()
            .skip(session.working().len().saturating_sub(tail_before.len()))
            .cloned()
            .collect();
        prop_assert_eq!(tail_after, tail_before);
    }
}
