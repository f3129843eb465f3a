//! Validation rules suggested by an audit.
//!
//! Rules are created from collaborator suggestions and user-toggleable
//! thereafter. Enforcement happens presentation-side; the core only vets
//! that a rule is well-formed on intake.

use std::sync::atomic::{AtomicU64, Ordering};

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// What a rule checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Numeric range bounds.
    Range,
    /// Named format (email, phone, ...).
    Format,
    /// Regular expression match.
    Regex,
    /// Value must be present.
    Required,
    /// Values must be unique.
    Unique,
}

/// Severity of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warning,
}

impl Default for RuleSeverity {
    fn default() -> Self {
        RuleSeverity::Warning
    }
}

/// A rule suggestion as the reasoning collaborator sends it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleProposal {
    /// Column the rule applies to.
    pub column: String,
    /// What the rule checks.
    pub kind: RuleKind,
    /// Kind-specific parameters (e.g. `{"pattern": "^..$"}` for regex).
    #[serde(default)]
    pub params: Value,
    /// Severity of a violation.
    #[serde(default)]
    pub severity: RuleSeverity,
}

/// A validation rule with its toggle state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    /// Session-unique identifier ("rule_NNN").
    pub id: String,
    /// Column the rule applies to.
    pub column: String,
    /// What the rule checks.
    pub kind: RuleKind,
    /// Kind-specific parameters.
    pub params: Value,
    /// Severity of a violation.
    pub severity: RuleSeverity,
    /// Whether the rule is currently enabled.
    pub active: bool,
}

impl ValidationRule {
    /// Vet and promote a wire proposal into an active rule.
    ///
    /// Regex rules must carry a `pattern` parameter that actually
    /// compiles; malformed proposals are discarded.
    pub fn from_proposal(proposal: RuleProposal) -> Option<Self> {
        if proposal.kind == RuleKind::Regex {
            let pattern = proposal.params.get("pattern")?.as_str()?;
            Regex::new(pattern).ok()?;
        }

        Some(Self {
            id: generate_rule_id(),
            column: proposal.column,
            kind: proposal.kind,
            params: proposal.params,
            severity: proposal.severity,
            active: true,
        })
    }

    /// Flip the rule's active state.
    pub fn toggle(&mut self) {
        self.active = !self.active;
    }
}

/// Generate a unique rule ID.
fn generate_rule_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    format!("rule_{:03}", COUNTER.fetch_add(1, Ordering::SeqCst))
}
