//! Session usage counters.

use serde::Serialize;

/// Counters an external billing/quota display can read.
///
/// Passed explicitly (`&mut`) into the orchestrator and query executor
/// rather than living in ambient global state. `rows_processed` bumps once
/// per successful ingestion; `ai_calls` bumps once per gateway invocation,
/// never per retry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageCounters {
    /// Total rows ingested this session.
    pub rows_processed: u64,
    /// Reasoning-service invocations issued this session.
    pub ai_calls: u64,
}

impl UsageCounters {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful ingestion of `rows` rows.
    pub fn record_ingestion(&mut self, rows: usize) {
        self.rows_processed += rows as u64;
    }

    /// Record one reasoning-service invocation.
    pub fn record_ai_call(&mut self) {
        self.ai_calls += 1;
    }
}
