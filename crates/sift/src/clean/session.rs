//! The cleaning session: working copy, action queue, commit semantics.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::dataset::{conform_rows, Dataset, Row};
use crate::error::{Result, SiftError};
use crate::gateway::{CompletionRequest, Gateway, ResponseShape};
use crate::profile::profile_columns;
use crate::prompts;
use crate::usage::UsageCounters;

use super::action::{ActionProposal, ActionStatus, CleaningAction};
use super::insight::AnalysisInsight;
use super::rule::{RuleProposal, ValidationRule};

/// Maximum rows forwarded to the reasoning collaborator per operation.
///
/// Rows beyond this window are never transmitted and are reattached
/// unmodified after every clean operation.
pub const SAMPLE_WINDOW: usize = 50;

/// Where a session is in the audit/review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No audit requested yet.
    Idle,
    /// Audit request in flight.
    Auditing,
    /// Actions available for review (possibly zero).
    Reviewing,
}

/// Identity tag captured when a request launches.
///
/// Completion paths validate the ticket against the session's current
/// epoch; a mismatch means the dataset changed while the request was in
/// flight and the response must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    epoch: u64,
}

impl RequestTicket {
    /// Epoch at launch time.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Audit response wire shape.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResponse {
    #[serde(default)]
    pub actions: Vec<ActionProposal>,
    #[serde(default)]
    pub insights: Vec<AnalysisInsight>,
    #[serde(default)]
    pub validation_rules: Vec<RuleProposal>,
}

/// Clean response wire shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CleanResponse {
    #[serde(default)]
    pub rows: Vec<Row>,
}

/// Result of completing an audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Actions and insights installed.
    Completed { actions: usize, insights: usize },
    /// Response arrived for a dataset no longer active; discarded.
    Stale,
}

/// Result of completing an apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Sampled prefix replaced with transformed rows.
    Applied { rows_replaced: usize },
    /// Collaborator had nothing to change; working copy untouched and the
    /// action(s) still pending.
    NoChange,
    /// Response arrived for a dataset no longer active; discarded.
    Stale,
}

/// Result of a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new committed snapshot was produced.
    Committed,
    /// Working copy already equals the committed dataset; nothing to do.
    Unchanged,
}

enum ApplyTarget {
    One(String),
    AllPending,
}

/// Owns one dataset's canonical snapshot and its in-progress working copy.
///
/// The session is the only mutator of either; the profiler and gateway are
/// stateless collaborators. All gateway traffic is bounded to the first
/// [`SAMPLE_WINDOW`] rows of the working copy.
pub struct CleaningSession {
    committed: Dataset,
    working: Vec<Row>,
    actions: Vec<CleaningAction>,
    insights: Vec<AnalysisInsight>,
    rules: Vec<ValidationRule>,
    phase: Phase,
    epoch: u64,
    last_cleaned_at: Option<DateTime<Utc>>,
}

impl CleaningSession {
    /// Start a session around an already-ingested dataset.
    pub fn new(dataset: Dataset) -> Self {
        let working = dataset.records.clone();
        Self {
            committed: dataset,
            working,
            actions: Vec::new(),
            insights: Vec::new(),
            rules: Vec::new(),
            phase: Phase::Idle,
            epoch: 1,
            last_cleaned_at: None,
        }
    }

    /// Ingest raw text and start a session, recording the ingestion in the
    /// usage counters.
    pub fn ingest(
        name: impl Into<String>,
        text: &str,
        usage: &mut UsageCounters,
    ) -> Result<Self> {
        let dataset = Dataset::ingest(name, text)?;
        usage.record_ingestion(dataset.row_count());
        Ok(Self::new(dataset))
    }

    /// Replace the active dataset.
    ///
    /// Bumps the epoch so that any response still in flight for the
    /// previous dataset is discarded on arrival.
    pub fn load(&mut self, dataset: Dataset) {
        self.working = dataset.records.clone();
        self.committed = dataset;
        self.actions.clear();
        self.insights.clear();
        self.rules.clear();
        self.phase = Phase::Idle;
        self.epoch += 1;
        self.last_cleaned_at = None;
    }

    // Accessors

    /// The canonical committed snapshot.
    pub fn committed(&self) -> &Dataset {
        &self.committed
    }

    /// The uncommitted working copy.
    pub fn working(&self) -> &[Row] {
        &self.working
    }

    /// All actions, in audit order.
    pub fn actions(&self) -> &[CleaningAction] {
        &self.actions
    }

    /// Actions still awaiting a decision.
    pub fn pending_actions(&self) -> Vec<&CleaningAction> {
        self.actions
            .iter()
            .filter(|a| a.status == ActionStatus::Pending)
            .collect()
    }

    /// Insights from the last audit.
    pub fn insights(&self) -> &[AnalysisInsight] {
        &self.insights
    }

    /// Validation rules from the last audit.
    pub fn rules(&self) -> &[ValidationRule] {
        &self.rules
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Timestamp of the last commit that changed data.
    pub fn last_cleaned_at(&self) -> Option<DateTime<Utc>> {
        self.last_cleaned_at
    }

    /// Tag for a request launched now.
    pub fn ticket(&self) -> RequestTicket {
        RequestTicket { epoch: self.epoch }
    }

    /// Whether a ticket still refers to the active dataset.
    pub fn is_current(&self, ticket: RequestTicket) -> bool {
        ticket.epoch == self.epoch
    }

    /// Flip a validation rule's active state.
    pub fn toggle_rule(&mut self, rule_id: &str) -> Result<()> {
        let rule = self
            .rules
            .iter_mut()
            .find(|r| r.id == rule_id)
            .ok_or_else(|| SiftError::Action(format!("rule '{}' not found", rule_id)))?;
        rule.toggle();
        Ok(())
    }

    fn sample(&self) -> &[Row] {
        &self.working[..self.working.len().min(SAMPLE_WINDOW)]
    }

    // Audit

    /// Launch an audit: moves to Auditing and builds the request.
    pub fn begin_audit(&mut self) -> (RequestTicket, CompletionRequest) {
        self.phase = Phase::Auditing;
        let stats = profile_columns(&self.committed.headers, &self.working);
        let sample = self.sample();
        let request = CompletionRequest::new(
            "audit",
            prompts::audit_prompt(self.working.len(), sample.len()),
            json!({
                "headers": &self.committed.headers,
                "columnStats": stats,
                "sample": sample,
            }),
            ResponseShape::Object,
        );
        (self.ticket(), request)
    }

    /// Complete an audit with the gateway's result.
    ///
    /// A stale ticket discards the response without touching state. A
    /// gateway error still moves the session to Reviewing (with empty
    /// queues) before propagating, so the UI is never stuck in Auditing.
    pub fn finish_audit(
        &mut self,
        ticket: RequestTicket,
        response: Result<AuditResponse>,
    ) -> Result<AuditOutcome> {
        if !self.is_current(ticket) {
            debug!(ticket_epoch = ticket.epoch, epoch = self.epoch, "discarding stale audit response");
            return Ok(AuditOutcome::Stale);
        }

        self.phase = Phase::Reviewing;
        match response {
            Err(error) => {
                self.actions.clear();
                self.insights.clear();
                self.rules.clear();
                Err(error)
            }
            Ok(parsed) => {
                self.actions = parsed
                    .actions
                    .into_iter()
                    .map(CleaningAction::from_proposal)
                    .collect();
                self.insights = parsed.insights;
                self.rules = parsed
                    .validation_rules
                    .into_iter()
                    .filter_map(|proposal| {
                        let column = proposal.column.clone();
                        let rule = ValidationRule::from_proposal(proposal);
                        if rule.is_none() {
                            warn!(column, "discarding malformed validation rule proposal");
                        }
                        rule
                    })
                    .collect();

                Ok(AuditOutcome::Completed {
                    actions: self.actions.len(),
                    insights: self.insights.len(),
                })
            }
        }
    }

    /// Audit in one blocking step: launch, call the gateway, complete.
    pub fn run_audit(
        &mut self,
        gateway: &Gateway,
        usage: &mut UsageCounters,
    ) -> Result<AuditOutcome> {
        let (ticket, request) = self.begin_audit();
        usage.record_ai_call();
        let response = gateway.execute::<AuditResponse>(&request);
        self.finish_audit(ticket, response)
    }

    // Apply

    /// Launch an apply for one pending action.
    pub fn begin_apply(&self, action_id: &str) -> Result<(RequestTicket, CompletionRequest)> {
        let action = self.pending_action(action_id)?;
        let request = CompletionRequest::new(
            "clean",
            prompts::clean_prompt(&action.suggested_transform),
            json!({ "rows": self.sample() }),
            ResponseShape::Object,
        );
        Ok((self.ticket(), request))
    }

    /// Complete an apply for one action.
    pub fn finish_apply(
        &mut self,
        ticket: RequestTicket,
        action_id: &str,
        response: Result<CleanResponse>,
    ) -> Result<ApplyOutcome> {
        self.finish_apply_inner(ticket, ApplyTarget::One(action_id.to_string()), response)
    }

    /// Apply one action in one blocking step.
    ///
    /// On a gateway error the action stays pending and the working copy is
    /// untouched.
    pub fn apply_action(
        &mut self,
        action_id: &str,
        gateway: &Gateway,
        usage: &mut UsageCounters,
    ) -> Result<ApplyOutcome> {
        let (ticket, request) = self.begin_apply(action_id)?;
        usage.record_ai_call();
        let response = gateway.execute::<CleanResponse>(&request);
        self.finish_apply_inner(ticket, ApplyTarget::One(action_id.to_string()), response)
    }

    /// Launch a smart-clean covering every pending action at once.
    pub fn begin_apply_all(&self) -> Result<(RequestTicket, CompletionRequest)> {
        let transforms: Vec<String> = self
            .pending_actions()
            .iter()
            .map(|a| a.suggested_transform.clone())
            .collect();
        if transforms.is_empty() {
            return Err(SiftError::Action("no pending actions to apply".to_string()));
        }

        let request = CompletionRequest::new(
            "smart_clean",
            prompts::smart_clean_prompt(&transforms),
            json!({ "rows": self.sample() }),
            ResponseShape::Object,
        );
        Ok((self.ticket(), request))
    }

    /// Complete a smart-clean.
    pub fn finish_apply_all(
        &mut self,
        ticket: RequestTicket,
        response: Result<CleanResponse>,
    ) -> Result<ApplyOutcome> {
        self.finish_apply_inner(ticket, ApplyTarget::AllPending, response)
    }

    /// Smart-clean in one blocking step.
    pub fn apply_all(
        &mut self,
        gateway: &Gateway,
        usage: &mut UsageCounters,
    ) -> Result<ApplyOutcome> {
        let (ticket, request) = self.begin_apply_all()?;
        usage.record_ai_call();
        let response = gateway.execute::<CleanResponse>(&request);
        self.finish_apply_inner(ticket, ApplyTarget::AllPending, response)
    }

    fn finish_apply_inner(
        &mut self,
        ticket: RequestTicket,
        target: ApplyTarget,
        response: Result<CleanResponse>,
    ) -> Result<ApplyOutcome> {
        if !self.is_current(ticket) {
            debug!(ticket_epoch = ticket.epoch, epoch = self.epoch, "discarding stale clean response");
            return Ok(ApplyOutcome::Stale);
        }

        let parsed = response?;
        if parsed.rows.is_empty() {
            // Indistinguishable from a schema-mismatch default; never
            // destroy the sampled rows on that basis.
            debug!("clean response carried no rows, leaving working copy untouched");
            return Ok(ApplyOutcome::NoChange);
        }

        let rows_replaced = self.replace_sample(parsed.rows);
        match target {
            ApplyTarget::One(action_id) => self.mark_applied(&action_id)?,
            ApplyTarget::AllPending => {
                for action in &mut self.actions {
                    if action.status == ActionStatus::Pending {
                        action.status = ActionStatus::Applied;
                    }
                }
            }
        }

        Ok(ApplyOutcome::Applied { rows_replaced })
    }

    /// Replace the sampled prefix of the working copy, reattaching every
    /// row beyond the sample boundary unmodified.
    fn replace_sample(&mut self, rows: Vec<Row>) -> usize {
        let rows = conform_rows(rows, &self.committed.headers);
        let boundary = self.working.len().min(SAMPLE_WINDOW);
        let tail = self.working.split_off(boundary);
        let replaced = rows.len();
        self.working = rows;
        self.working.extend(tail);
        replaced
    }

    // Review decisions

    /// Reject a pending action. Never mutates data.
    pub fn reject_action(&mut self, action_id: &str) -> Result<()> {
        let action = self
            .actions
            .iter_mut()
            .find(|a| a.id == action_id)
            .ok_or_else(|| SiftError::Action(format!("action '{}' not found", action_id)))?;
        if action.status.is_terminal() {
            return Err(SiftError::Action(format!(
                "action '{}' is already {}",
                action_id,
                action.status.label()
            )));
        }
        action.status = ActionStatus::Rejected;
        Ok(())
    }

    /// Commit the working copy as a new canonical snapshot.
    ///
    /// A no-op when the working copy already equals the committed records.
    /// Otherwise the new snapshot gets freshly recomputed column stats and
    /// the working copy resets to match it.
    pub fn commit(&mut self) -> CommitOutcome {
        if self.working == self.committed.records {
            return CommitOutcome::Unchanged;
        }

        let dataset = Dataset::from_records(
            self.committed.name.clone(),
            self.committed.headers.clone(),
            self.working.clone(),
        );
        info!(
            name = %dataset.name,
            rows = dataset.row_count(),
            "committed cleaned dataset"
        );
        self.working = dataset.records.clone();
        self.committed = dataset;
        self.last_cleaned_at = Some(Utc::now());
        CommitOutcome::Committed
    }

    fn pending_action(&self, action_id: &str) -> Result<&CleaningAction> {
        let action = self
            .actions
            .iter()
            .find(|a| a.id == action_id)
            .ok_or_else(|| SiftError::Action(format!("action '{}' not found", action_id)))?;
        if action.status.is_terminal() {
            return Err(SiftError::Action(format!(
                "action '{}' is already {}",
                action_id,
                action.status.label()
            )));
        }
        Ok(action)
    }

    fn mark_applied(&mut self, action_id: &str) -> Result<()> {
        let action = self
            .actions
            .iter_mut()
            .find(|a| a.id == action_id)
            .ok_or_else(|| SiftError::Action(format!("action '{}' not found", action_id)))?;
        action.status = ActionStatus::Applied;
        Ok(())
    }
}
