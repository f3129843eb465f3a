//! AI-assisted cleaning: audits, actions, insights, rules, and the
//! session that orchestrates them over a working copy of the dataset.

mod action;
mod insight;
mod rule;
mod session;

pub use action::{ActionProposal, ActionStatus, CleaningAction};
pub use insight::{AnalysisInsight, Importance};
pub use rule::{RuleKind, RuleProposal, RuleSeverity, ValidationRule};
pub use session::{
    ApplyOutcome, AuditOutcome, AuditResponse, CleanResponse, CleaningSession, CommitOutcome,
    Phase, RequestTicket, SAMPLE_WINDOW,
};
