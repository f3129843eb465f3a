//! Cleaning actions proposed by an audit.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a cleaning action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    /// Proposed, awaiting a user decision.
    Pending,
    /// Transform applied to the working copy.
    Applied,
    /// Declined by the user; data untouched.
    Rejected,
}

impl ActionStatus {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ActionStatus::Pending => "Pending",
            ActionStatus::Applied => "Applied",
            ActionStatus::Rejected => "Rejected",
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ActionStatus::Pending)
    }
}

/// An action proposal as the reasoning collaborator sends it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProposal {
    /// Issue category (collaborator-defined, e.g. "missing_values").
    #[serde(default)]
    pub kind: String,
    /// Short title.
    pub title: String,
    /// What the issue is and what the fix does.
    #[serde(default)]
    pub description: String,
    /// Estimated affected rows.
    #[serde(default)]
    pub affected_row_count: usize,
    /// Opaque transform instruction, passed back verbatim on apply.
    pub suggested_transform: String,
}

/// A proposed cleaning transformation with its review status.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningAction {
    /// Session-unique identifier ("act_NNN").
    pub id: String,
    /// Issue category.
    pub kind: String,
    /// Short title.
    pub title: String,
    /// Description for display.
    pub description: String,
    /// Estimated affected rows.
    pub affected_row_count: usize,
    /// Review status. Mutated only by the cleaning session.
    pub status: ActionStatus,
    /// Opaque transform instruction.
    pub suggested_transform: String,
    /// When the audit produced this action.
    pub created_at: DateTime<Utc>,
}

impl CleaningAction {
    /// Promote a wire proposal into a pending action.
    pub fn from_proposal(proposal: ActionProposal) -> Self {
        Self {
            id: generate_action_id(),
            kind: proposal.kind,
            title: proposal.title,
            description: proposal.description,
            affected_row_count: proposal.affected_row_count,
            status: ActionStatus::Pending,
            suggested_transform: proposal.suggested_transform,
            created_at: Utc::now(),
        }
    }
}

/// Generate a unique action ID.
fn generate_action_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("act_{:03}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_proposal() {
        let action = CleaningAction::from_proposal(ActionProposal {
            kind: "missing_values".to_string(),
            title: "Fill blanks".to_string(),
            description: "Column 'age' has blanks".to_string(),
            affected_row_count: 4,
            suggested_transform: "replace blank age with median".to_string(),
        });

        assert!(action.id.starts_with("act_"));
        assert_eq!(action.status, ActionStatus::Pending);
        assert_eq!(action.affected_row_count, 4);
    }

    #[test]
    fn test_proposal_tolerates_sparse_wire_shape() {
        let proposal: ActionProposal = serde_json::from_str(
            r#"{"title": "Dedupe", "suggestedTransform": "drop duplicate rows"}"#,
        )
        .unwrap();
        assert_eq!(proposal.affected_row_count, 0);
        assert!(proposal.kind.is_empty());
    }

    #[test]
    fn test_status_terminality() {
        assert!(!ActionStatus::Pending.is_terminal());
        assert!(ActionStatus::Applied.is_terminal());
        assert!(ActionStatus::Rejected.is_terminal());
    }
}
