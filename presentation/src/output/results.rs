//! Machine-readable results document
//!
//! Written with `--results-file` and printed by `-o json`.

use chrono::{DateTime, Utc};
use review_application::{PublishReceipt, ReviewReport};
use review_domain::{AgentResult, Severity, SeverityCounts};
use serde::Serialize;

/// One agent's contribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSummary {
    pub role: &'static str,
    pub agent: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// `ok` or `failed`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<&'static str>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    pub findings: usize,
    pub elapsed_ms: u64,
}

impl From<&AgentResult> for AgentSummary {
    fn from(result: &AgentResult) -> Self {
        Self {
            role: result.role.as_str(),
            agent: result.role.agent_name(),
            model: result.model.as_ref().map(|m| m.to_string()),
            status: if result.is_failed() { "failed" } else { "ok" },
            score: result.score,
            recommendation: result.stance.map(|s| s.as_str()),
            summary: result.summary.clone(),
            failure: result.failure.clone(),
            findings: result.findings.len(),
            elapsed_ms: result.elapsed_ms,
        }
    }
}

/// Results of one review run
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResults {
    pub repository: String,
    pub pr_number: u64,
    pub title: String,
    pub final_decision: &'static str,
    pub overall_score: f64,
    pub decided_by: &'static str,
    pub auto_approve: bool,
    pub summary: String,
    pub specialist_reviews: Vec<AgentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tech_lead: Option<AgentSummary>,
    pub failed_agents: Vec<&'static str>,
    pub critical_blockers: Vec<String>,
    pub severity_counts: SeverityCounts,
    pub files_reviewed: Vec<String>,
    pub inline_comments: usize,
    pub summary_findings: usize,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<PublishReceipt>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

impl ReviewResults {
    pub fn from_report(report: &ReviewReport) -> Self {
        let outcome = &report.outcome;
        let verdict = &outcome.verdict;

        Self {
            repository: outcome.pr.repo.to_string(),
            pr_number: outcome.pr.number,
            title: outcome.pr.title.clone(),
            final_decision: verdict.stance.as_str(),
            overall_score: verdict.score,
            decided_by: verdict.basis.display_name(),
            auto_approve: verdict.auto_approve,
            summary: verdict.rationale.clone(),
            specialist_reviews: verdict
                .aggregate
                .results
                .iter()
                .map(AgentSummary::from)
                .collect(),
            tech_lead: verdict.arbiter.as_ref().map(AgentSummary::from),
            failed_agents: verdict
                .failed_roles()
                .iter()
                .map(|r| r.agent_name())
                .collect(),
            critical_blockers: verdict
                .findings
                .iter()
                .filter(|f| f.severity() == Severity::Critical)
                .map(|f| format!("{} ({}): {}", f.finding.location(), f.role.agent_name(), f.finding.message))
                .collect(),
            severity_counts: verdict.severity_counts,
            files_reviewed: outcome.diff.files.iter().map(|f| f.path.clone()).collect(),
            inline_comments: verdict.comment_plan.inline.len(),
            summary_findings: verdict.comment_plan.summary.len(),
            dry_run: report.receipt.is_none(),
            published: report.receipt.clone(),
            started_at: outcome.started_at,
            finished_at: outcome.finished_at,
            elapsed_ms: outcome.elapsed().num_milliseconds(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::console::tests::sample_report;

    #[test]
    fn test_results_document() {
        let results = ReviewResults::from_report(&sample_report(None));
        let value: serde_json::Value = serde_json::from_str(&results.to_json()).unwrap();

        assert_eq!(value["repository"], "octo/app");
        assert_eq!(value["pr_number"], 42);
        assert_eq!(value["final_decision"], "REQUEST_CHANGES");
        assert_eq!(value["decided_by"], "critical finding gate");
        assert_eq!(value["dry_run"], true);
        assert!(value.get("published").is_none());
        assert_eq!(value["files_reviewed"], serde_json::json!(["a.py"]));
        assert_eq!(value["specialist_reviews"].as_array().unwrap().len(), 2);
        assert_eq!(value["specialist_reviews"][1]["status"], "failed");
        assert_eq!(value["failed_agents"], serde_json::json!(["QAEngineer"]));
        assert_eq!(value["critical_blockers"].as_array().unwrap().len(), 1);
        assert_eq!(value["inline_comments"], 1);
    }

    #[test]
    fn test_published_receipt_is_included() {
        let receipt = PublishReceipt {
            review_id: Some(99),
            inline_posted: 1,
            approved: false,
            reaction: None,
        };
        let results = ReviewResults::from_report(&sample_report(Some(receipt)));
        assert!(!results.dry_run);
        assert_eq!(results.published.unwrap().review_id, Some(99));
    }
}
