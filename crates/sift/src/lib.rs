//! Sift: AI-assisted profiling and cleaning engine for tabular datasets.
//!
//! Sift ingests delimited text into typed datasets, profiles every column,
//! and runs an audit/review/commit cycle where an external reasoning
//! service proposes cleaning actions and the user decides which to apply.
//!
//! # Core Principles
//!
//! - **Committed data is canonical**: transforms preview against a working
//!   copy; nothing replaces the committed snapshot until an explicit commit
//! - **Bounded payloads**: at most the first 50 working rows ever leave the
//!   process; everything beyond that window is reattached untouched
//! - **Degrade, don't destroy**: an unreachable service is an error, but a
//!   malformed response is an empty result and never mutates data
//!
//! # Example
//!
//! ```no_run
//! use sift::{CleaningSession, Gateway, MockProvider, UsageCounters};
//!
//! let mut usage = UsageCounters::default();
//! let mut session =
//!     CleaningSession::ingest("people.csv", "name,age\nalice,34\nbob,\n", &mut usage).unwrap();
//!
//! let gateway = Gateway::new(MockProvider::new());
//! let outcome = session.run_audit(&gateway, &mut usage);
//! println!("{:?}, {} pending actions", outcome, session.pending_actions().len());
//! ```

pub mod clean;
pub mod dataset;
pub mod error;
pub mod gateway;
pub mod profile;
pub mod prompts;
pub mod query;
pub mod usage;

pub use clean::{
    ActionStatus, AnalysisInsight, ApplyOutcome, AuditOutcome, CleaningAction, CleaningSession,
    CommitOutcome, Importance, Phase, RequestTicket, RuleKind, RuleSeverity, ValidationRule,
    SAMPLE_WINDOW,
};
pub use dataset::{Dataset, Row, Value};
pub use error::{Result, SiftError};
pub use gateway::{
    AnthropicProvider, Gateway, MockProvider, ProviderConfig, ReasoningProvider, RetryPolicy,
};
pub use profile::{ColumnStats, ColumnType};
pub use query::{ChartSuggestion, QueryExecutor, QueryMode, QueryResult, CHART_ROW_LIMIT};
pub use usage::UsageCounters;
