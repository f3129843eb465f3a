//! Query execution over a bounded sample of the working copy.
//!
//! Queries are evaluated by the reasoning collaborator, not locally; the
//! engine's job is bounding the payload, shaping the request, and
//! degrading gracefully when the optional chart suggestion fails.
//!
//! Queries carry no session state. A caller racing queries against
//! dataset loads should tag each launch with
//! [`CleaningSession::ticket`](crate::clean::CleaningSession::ticket) and
//! drop results whose ticket is no longer current.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::clean::{CleaningSession, SAMPLE_WINDOW};
use crate::dataset::Row;
use crate::error::Result;
use crate::gateway::{CompletionRequest, Gateway, ResponseShape};
use crate::prompts;
use crate::usage::UsageCounters;

/// Result sets larger than this never get a chart suggestion.
pub const CHART_ROW_LIMIT: usize = 30;

/// How a query string should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    NaturalLanguage,
    Sql,
}

impl QueryMode {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            QueryMode::NaturalLanguage => "natural language",
            QueryMode::Sql => "SQL",
        }
    }
}

/// Query response wire shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// A chart recommendation for a result set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSuggestion {
    /// One of "bar", "line", "pie", "scatter".
    #[serde(rename = "type")]
    pub chart_type: String,
    /// Display title.
    #[serde(default)]
    pub title: String,
    /// Column for the x axis.
    #[serde(default)]
    pub x_axis: String,
    /// Column for the y axis.
    #[serde(default)]
    pub y_axis: String,
}

impl ChartSuggestion {
    fn is_usable(&self) -> bool {
        matches!(self.chart_type.as_str(), "bar" | "line" | "pie" | "scatter")
    }
}

/// Rows returned by a query, with an optional chart recommendation.
///
/// Result rows are free-standing: aggregations may introduce columns the
/// dataset never had, so no header conformance is applied.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub rows: Vec<Row>,
    pub chart: Option<ChartSuggestion>,
}

/// Runs queries against a session's working copy through a gateway.
pub struct QueryExecutor<'a> {
    gateway: &'a Gateway,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// Evaluate a query against the sampled working copy.
    ///
    /// Chart suggestion is strictly best-effort: any failure on that
    /// second call leaves `chart` as `None` without failing the query.
    pub fn run(
        &self,
        session: &CleaningSession,
        query: &str,
        mode: QueryMode,
        usage: &mut UsageCounters,
    ) -> Result<QueryResult> {
        let working = session.working();
        let sample = &working[..working.len().min(SAMPLE_WINDOW)];

        let request = CompletionRequest::new(
            "query",
            prompts::query_prompt(query, mode),
            json!({ "rows": sample }),
            ResponseShape::Object,
        );
        usage.record_ai_call();
        let response = self.gateway.execute::<QueryResponse>(&request)?;

        let chart = if response.rows.is_empty() || response.rows.len() > CHART_ROW_LIMIT {
            debug!(rows = response.rows.len(), "skipping chart suggestion");
            None
        } else {
            self.suggest_chart(&response.rows, usage)
        };

        Ok(QueryResult { rows: response.rows, chart })
    }

    fn suggest_chart(&self, rows: &[Row], usage: &mut UsageCounters) -> Option<ChartSuggestion> {
        let columns: Vec<String> = rows[0].keys().cloned().collect();
        let request = CompletionRequest::new(
            "chart",
            prompts::chart_prompt(&columns),
            json!({ "record": &rows[0] }),
            ResponseShape::Object,
        );
        usage.record_ai_call();

        match self.gateway.execute::<ChartSuggestion>(&request) {
            Ok(chart) if chart.is_usable() => Some(chart),
            Ok(chart) => {
                debug!(chart_type = %chart.chart_type, "unusable chart suggestion dropped");
                None
            }
            Err(error) => {
                warn!(%error, "chart suggestion failed, continuing without one");
                None
            }
        }
    }
}
