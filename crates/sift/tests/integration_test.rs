//! End-to-end tests for the full ingest / audit / apply / commit cycle
//! against a scripted provider.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tempfile::NamedTempFile;

use sift::gateway::ProviderError;
use sift::{
    ApplyOutcome, AuditOutcome, CleaningSession, ColumnType, CommitOutcome, Dataset, Gateway,
    MockProvider, QueryExecutor, QueryMode, RetryPolicy, UsageCounters, Value,
};

const PEOPLE_CSV: &str = "name,age,joined\n\
                          alice ,34,2021-03-01\n\
                          bob,,2020-11-15\n\
                          carol,29,2022-07-09\n";

fn audit_reply() -> &'static str {
    r#"{
        "actions": [{
            "kind": "formatting",
            "title": "Trim names",
            "description": "Column 'name' has trailing whitespace",
            "affectedRowCount": 1,
            "suggestedTransform": "trim whitespace from the name column"
        }],
        "insights": [{"title": "One missing age", "importance": "medium"}],
        "validationRules": [{"column": "age", "kind": "range", "params": {"min": 0, "max": 120}}]
    }"#
}

#[test]
fn test_full_audit_apply_commit_cycle() {
    let mock = MockProvider::new()
        .reply_with(audit_reply())
        .reply_with(
            r#"{"rows": [
                {"name": "alice", "age": 34, "joined": "2021-03-01"},
                {"name": "bob", "age": null, "joined": "2020-11-15"},
                {"name": "carol", "age": 29, "joined": "2022-07-09"}
            ]}"#,
        );
    let gateway = Gateway::new(mock.clone());
    let mut usage = UsageCounters::default();

    let mut session = CleaningSession::ingest("people.csv", PEOPLE_CSV, &mut usage).unwrap();
    assert_eq!(session.committed().row_count(), 3);
    assert_eq!(
        session.committed().stats_for("joined").unwrap().inferred_type,
        ColumnType::Date
    );

    let outcome = session.run_audit(&gateway, &mut usage).unwrap();
    assert_eq!(outcome, AuditOutcome::Completed { actions: 1, insights: 1 });
    assert_eq!(session.rules().len(), 1);

    let action_id = session.actions()[0].id.clone();
    let outcome = session.apply_action(&action_id, &gateway, &mut usage).unwrap();
    assert_eq!(outcome, ApplyOutcome::Applied { rows_replaced: 3 });

    // Preview changed the working copy, not the committed snapshot.
    assert_eq!(session.working()[0]["name"], Value::Text("alice".to_string()));
    assert_eq!(
        session.committed().records[0]["name"],
        Value::Text("alice ".to_string())
    );

    let fingerprint_before = session.committed().fingerprint.clone();
    assert_eq!(session.commit(), CommitOutcome::Committed);
    assert_ne!(session.committed().fingerprint, fingerprint_before);
    assert!(session.last_cleaned_at().is_some());

    assert_eq!(mock.operations(), vec!["audit", "clean"]);
    assert_eq!(usage.rows_processed, 3);
    assert_eq!(usage.ai_calls, 2);
}

#[test]
fn test_audit_survives_transient_provider_failures() {
    let mock = MockProvider::new()
        .fail_with(ProviderError::RateLimited("429".to_string()))
        .fail_with(ProviderError::Transient("connection reset".to_string()))
        .reply_with(audit_reply());

    let delays = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&delays);
    let gateway = Gateway::new(mock.clone())
        .with_policy(RetryPolicy::new(3, Duration::from_millis(5)))
        .with_sleep_fn(move |d| recorded.lock().unwrap().push(d));
    let mut usage = UsageCounters::default();

    let mut session = CleaningSession::ingest("people.csv", PEOPLE_CSV, &mut usage).unwrap();
    let outcome = session.run_audit(&gateway, &mut usage).unwrap();

    assert_eq!(outcome, AuditOutcome::Completed { actions: 1, insights: 1 });
    assert_eq!(mock.call_count(), 3);
    assert_eq!(
        *delays.lock().unwrap(),
        vec![Duration::from_millis(5), Duration::from_millis(10)]
    );
    // Retries are one logical call.
    assert_eq!(usage.ai_calls, 1);
}

#[test]
fn test_markdown_fenced_audit_reply_parses() {
    let mock = MockProvider::new().reply_with(format!("```json\n{}\n```", audit_reply()));
    let gateway = Gateway::new(mock);
    let mut usage = UsageCounters::default();

    let mut session = CleaningSession::ingest("people.csv", PEOPLE_CSV, &mut usage).unwrap();
    let outcome = session.run_audit(&gateway, &mut usage).unwrap();
    assert_eq!(outcome, AuditOutcome::Completed { actions: 1, insights: 1 });
}

#[test]
fn test_conversational_reply_degrades_to_empty_audit() {
    let mock = MockProvider::new().reply_with("Sorry, I cannot audit this data.");
    let gateway = Gateway::new(mock);
    let mut usage = UsageCounters::default();

    let mut session = CleaningSession::ingest("people.csv", PEOPLE_CSV, &mut usage).unwrap();
    let outcome = session.run_audit(&gateway, &mut usage).unwrap();

    // Malformed-but-reachable is "nothing to suggest", not an error.
    assert_eq!(outcome, AuditOutcome::Completed { actions: 0, insights: 0 });
    assert!(session.actions().is_empty());
}

#[test]
fn test_in_flight_audit_discarded_when_new_dataset_loads() {
    let gateway = Gateway::new(MockProvider::new().reply_with(audit_reply()));
    let mut usage = UsageCounters::default();

    let mut session = CleaningSession::ingest("people.csv", PEOPLE_CSV, &mut usage).unwrap();
    let (ticket, request) = session.begin_audit();
    let response = gateway.execute(&request);

    // A different dataset arrives while the audit is in flight.
    session.load(Dataset::ingest("other.csv", "x\n1\n2\n").unwrap());

    let outcome = session.finish_audit(ticket, response).unwrap();
    assert_eq!(outcome, AuditOutcome::Stale);
    assert!(session.actions().is_empty());
    assert_eq!(session.committed().name, "other.csv");
}

#[test]
fn test_query_with_chart_suggestion() {
    let mock = MockProvider::new()
        .reply_with(r#"{"rows": [{"name": "alice", "age": 34}, {"name": "carol", "age": 29}]}"#)
        .reply_with(r#"{"type": "bar", "title": "Ages", "xAxis": "name", "yAxis": "age"}"#);
    let gateway = Gateway::new(mock.clone());
    let mut usage = UsageCounters::default();

    let session = CleaningSession::ingest("people.csv", PEOPLE_CSV, &mut usage).unwrap();
    let result = QueryExecutor::new(&gateway)
        .run(&session, "rows with a known age", QueryMode::NaturalLanguage, &mut usage)
        .unwrap();

    assert_eq!(result.rows.len(), 2);
    let chart = result.chart.unwrap();
    assert_eq!(chart.chart_type, "bar");
    assert_eq!(chart.x_axis, "name");
    assert_eq!(mock.operations(), vec!["query", "chart"]);
}

#[test]
fn test_exhausted_retries_surface_as_gateway_error() {
    let mock = MockProvider::new()
        .fail_with(ProviderError::Transient("down".to_string()))
        .fail_with(ProviderError::Transient("down".to_string()))
        .fail_with(ProviderError::Transient("still down".to_string()));
    let gateway = Gateway::new(mock)
        .with_policy(RetryPolicy::new(3, Duration::from_millis(1)))
        .with_sleep_fn(|_| {});
    let mut usage = UsageCounters::default();

    let mut session = CleaningSession::ingest("people.csv", PEOPLE_CSV, &mut usage).unwrap();
    let result = session.run_audit(&gateway, &mut usage);

    match result {
        Err(sift::SiftError::Gateway { attempts, message }) => {
            assert_eq!(attempts, 3);
            assert!(message.contains("still down"));
        }
        other => panic!("expected gateway error, got {:?}", other),
    }
    // The session is reviewable (with nothing to review), not stuck.
    assert_eq!(session.phase(), sift::Phase::Reviewing);
}

#[test]
fn test_ingest_from_file_on_disk() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(PEOPLE_CSV.as_bytes()).unwrap();

    let text = std::fs::read_to_string(file.path()).unwrap();
    let dataset = Dataset::ingest("people.csv", &text).unwrap();

    assert_eq!(dataset.row_count(), 3);
    assert_eq!(dataset.headers, vec!["name", "age", "joined"]);
    assert_eq!(dataset.stats_for("age").unwrap().missing_count, 1);
}
