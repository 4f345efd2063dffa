//! Per-agent review result

use super::finding::Finding;
use super::role::AgentRole;
use super::value_objects::Stance;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Outcome of one agent's review of one pull request
///
/// A failed result has no score, no stance and no findings; `failure` keeps
/// the reason so it can be reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub role: AgentRole,
    pub score: Option<f64>,
    pub stance: Option<Stance>,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rationale: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<Model>,
    #[serde(default)]
    pub elapsed_ms: u64,
}

/// Parsed content of a usable agent response
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReview {
    pub score: f64,
    pub stance: Stance,
    pub findings: Vec<Finding>,
    pub summary: String,
    pub rationale: String,
    pub next_steps: Vec<String>,
}

impl AgentReview {
    pub fn new(score: f64, stance: Stance) -> Self {
        Self {
            score,
            stance,
            findings: Vec::new(),
            summary: String::new(),
            rationale: String::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn with_findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }
}

impl AgentResult {
    pub fn success(role: AgentRole, review: AgentReview) -> Self {
        Self {
            role,
            score: Some(review.score),
            stance: Some(review.stance),
            findings: review.findings,
            failure: None,
            summary: review.summary,
            rationale: review.rationale,
            next_steps: review.next_steps,
            model: None,
            elapsed_ms: 0,
        }
    }

    pub fn failure(role: AgentRole, reason: impl Into<String>) -> Self {
        Self {
            role,
            score: None,
            stance: None,
            findings: Vec::new(),
            failure: Some(reason.into()),
            summary: String::new(),
            rationale: String::new(),
            next_steps: Vec::new(),
            model: None,
            elapsed_ms: 0,
        }
    }

    pub fn with_model(mut self, model: Model) -> Self {
        self.model = Some(model);
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    /// Score and stance of a usable result
    pub fn usable(&self) -> Option<(f64, Stance)> {
        if self.is_failed() {
            return None;
        }
        Some((self.score?, self.stance?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::value_objects::Severity;

    #[test]
    fn test_success_result() {
        let review = AgentReview::new(8.0, Stance::Approve)
            .with_findings(vec![Finding::new(Severity::Low, "naming")]);
        let result = AgentResult::success(AgentRole::SeniorEngineer, review)
            .with_model(Model::Gpt41)
            .with_elapsed_ms(1200);
        assert!(!result.is_failed());
        assert_eq!(result.usable(), Some((8.0, Stance::Approve)));
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.elapsed_ms, 1200);
    }

    #[test]
    fn test_failure_result_has_nothing_usable() {
        let result = AgentResult::failure(AgentRole::QaEngineer, "timed out after 180s");
        assert!(result.is_failed());
        assert_eq!(result.usable(), None);
        assert!(result.score.is_none());
        assert!(result.stance.is_none());
        assert!(result.findings.is_empty());
        assert_eq!(result.failure.as_deref(), Some("timed out after 180s"));
    }
}
