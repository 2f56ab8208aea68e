//! Audit trail models.
//!
//! Every calculation stage records an [`AuditStep`] describing its inputs,
//! outputs and reasoning. Conditions worth a reviewer's attention that do not
//! stop the calculation are recorded as [`AuditWarning`]s.

use serde::{Deserialize, Serialize};

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// Severity of an [`AuditWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational.
    Low,
    /// Should be reviewed.
    Medium,
    /// Needs action.
    High,
}

/// A warning generated during calculation.
///
/// Warnings indicate conditions that don't prevent calculation but may
/// require attention, such as a billing rate below the pay rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: WarningSeverity,
}

impl AuditWarning {
    /// Creates a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: WarningSeverity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// The complete audit trace for one record's derivation.
///
/// # Example
///
/// ```
/// use arari_engine::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert!(!trace.has_warning("NEGATIVE_NET_SALARY"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns true if a warning with the given code was recorded.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serialization() {
        assert_eq!(
            serde_json::to_string(&WarningSeverity::Medium).unwrap(),
            "\"medium\""
        );
    }

    #[test]
    fn test_has_warning() {
        let trace = AuditTrace {
            steps: vec![],
            warnings: vec![AuditWarning::new(
                "NEGATIVE_RATE_SPREAD",
                "billing below pay",
                WarningSeverity::High,
            )],
        };

        assert!(trace.has_warning("NEGATIVE_RATE_SPREAD"));
        assert!(!trace.has_warning("MARGIN_BELOW_TARGET"));
    }

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "rate_card".to_string(),
            rule_name: "Rate Card Resolution".to_string(),
            input: serde_json::json!({"employee_id": "200101"}),
            output: serde_json::json!({"hourly_rate": "1000"}),
            reasoning: "resolved".to_string(),
        };

        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["rule_id"], "rate_card");
        assert_eq!(json["output"]["hourly_rate"], "1000");
    }
}
