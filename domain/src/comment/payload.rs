//! Posting payload built from a verdict

use super::mapper::InlineComment;
use super::reaction::Reaction;
use super::report::render_summary;
use crate::agent::Stance;
use crate::quorum::Verdict;
use serde::{Deserialize, Serialize};

/// Message attached to an automatic approval
pub const CONGRATULATIONS_MESSAGE: &str =
    "🎉 Excellent work! Clean code, no blocking issues found. Keep it up! 🚀✨";

/// Event of the review submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewEvent {
    Comment,
    RequestChanges,
}

impl ReviewEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewEvent::Comment => "COMMENT",
            ReviewEvent::RequestChanges => "REQUEST_CHANGES",
        }
    }
}

impl From<Stance> for ReviewEvent {
    /// Approval is never expressed through the review event; it is a
    /// separate directive so that only auto-approvable verdicts approve.
    fn from(stance: Stance) -> Self {
        match stance {
            Stance::RequestChanges => ReviewEvent::RequestChanges,
            Stance::Approve | Stance::Comment => ReviewEvent::Comment,
        }
    }
}

/// Directive to approve the pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub message: String,
}

/// Options controlling payload construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadOptions {
    pub reaction: bool,
}

impl Default for PayloadOptions {
    fn default() -> Self {
        Self { reaction: true }
    }
}

/// Everything the posting collaborator needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPayload {
    pub inline: Vec<InlineComment>,
    pub summary_body: String,
    pub event: ReviewEvent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<Approval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Reaction>,
}

impl ReviewPayload {
    pub fn from_verdict(verdict: &Verdict, options: PayloadOptions) -> Self {
        let mut summary_body = render_summary(verdict);
        let approval = verdict.auto_approve.then(|| Approval {
            message: CONGRATULATIONS_MESSAGE.to_string(),
        });
        if let Some(approval) = &approval {
            summary_body.push_str("\n\n");
            summary_body.push_str(&approval.message);
        }

        Self {
            inline: verdict.comment_plan.inline.clone(),
            summary_body,
            event: verdict.stance.into(),
            approval,
            reaction: options
                .reaction
                .then(|| Reaction::for_score(verdict.score)),
        }
    }

    pub fn is_approval(&self) -> bool {
        self.approval.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentResult, AgentReview, AgentRole, Finding, Severity};
    use crate::comment::mapper::map_findings;
    use crate::diff::Diff;
    use crate::quorum::{AggregateReport, Synthesizer};

    const DIFF: &str = "--- a/a.py
+++ b/a.py
@@ -1,1 +1,2 @@
 import os
+password = \"hunter2\"
";

    fn run(results: Vec<AgentResult>) -> Verdict {
        let diff = Diff::parse(DIFF).unwrap();
        let aggregate = AggregateReport::from_results(results).unwrap();
        let verdict = Synthesizer::default().synthesize(aggregate, None).unwrap();
        let plan = map_findings(&verdict.findings, &diff);
        verdict.with_comment_plan(plan)
    }

    #[test]
    fn test_request_changes_payload() {
        let mut results: Vec<AgentResult> = AgentRole::SPECIALISTS
            .iter()
            .map(|r| AgentResult::success(*r, AgentReview::new(9.0, Stance::Approve)))
            .collect();
        results[2] = AgentResult::success(
            AgentRole::SecurityEngineer,
            AgentReview::new(2.0, Stance::RequestChanges).with_findings(vec![
                Finding::new(Severity::Critical, "Hardcoded secret").at("a.py", 2),
            ]),
        );
        let verdict = run(results);
        let payload = ReviewPayload::from_verdict(&verdict, PayloadOptions::default());

        assert_eq!(payload.event, ReviewEvent::RequestChanges);
        assert!(!payload.is_approval());
        assert_eq!(payload.inline.len(), 1);
        assert_eq!(payload.inline[0].line, 2);
        // Mean of 9, 9, 2, 9, 9
        assert_eq!(verdict.score, 7.6);
        assert_eq!(payload.reaction, Some(Reaction::PlusOne));
    }

    #[test]
    fn test_auto_approval_payload() {
        let results = AgentRole::SPECIALISTS
            .iter()
            .map(|r| AgentResult::success(*r, AgentReview::new(10.0, Stance::Approve)))
            .collect();
        let verdict = run(results);
        let payload = ReviewPayload::from_verdict(&verdict, PayloadOptions { reaction: false });

        assert_eq!(payload.event, ReviewEvent::Comment);
        assert_eq!(
            payload.approval.as_ref().map(|a| a.message.as_str()),
            Some(CONGRATULATIONS_MESSAGE)
        );
        assert!(payload.summary_body.ends_with(CONGRATULATIONS_MESSAGE));
        assert_eq!(payload.reaction, None);
    }
}
