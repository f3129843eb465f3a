//! Read-only insights produced by an audit.

use serde::{Deserialize, Serialize};

/// Importance ranking for an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

impl Default for Importance {
    fn default() -> Self {
        Importance::Medium
    }
}

impl Importance {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Importance::High => "High",
            Importance::Medium => "Medium",
            Importance::Low => "Low",
        }
    }
}

/// An observation about the dataset, for display only.
///
/// Insights have no lifecycle beyond the audit that produced them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisInsight {
    /// Short title.
    pub title: String,
    /// Longer explanation.
    #[serde(default)]
    pub description: String,
    /// How much attention this deserves.
    #[serde(default)]
    pub importance: Importance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let insight: AnalysisInsight = serde_json::from_str(
            r#"{"title": "Skewed ages", "description": "Most rows under 30", "importance": "high"}"#,
        )
        .unwrap();
        assert_eq!(insight.importance, Importance::High);
    }

    #[test]
    fn test_importance_defaults_to_medium() {
        let insight: AnalysisInsight =
            serde_json::from_str(r#"{"title": "Something"}"#).unwrap();
        assert_eq!(insight.importance, Importance::Medium);
    }
}
