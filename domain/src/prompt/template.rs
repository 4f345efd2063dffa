//! Prompt templates for review agents

use crate::agent::{AgentResult, RoleProfile};
use crate::core::pull_request::PullRequest;
use crate::diff::Diff;
use crate::quorum::AggregateReport;
use std::fmt::Write;

const RESPONSE_SCHEMA: &str = r#"{
  "score": <number 0-10, higher is better>,
  "stance": "APPROVE" | "REQUEST_CHANGES" | "COMMENT",
  "summary": "<one paragraph>",
  "findings": [
    {
      "severity": "critical" | "high" | "medium" | "low" | "info",
      "category": "<short category>",
      "file": "<path exactly as shown in the diff headings>",
      "line": <new-file line number from the left gutter>,
      "message": "<what is wrong and why it matters>",
      "current_code": "<offending code, optional>",
      "suggestion": "<replacement text for that line, optional>"
    }
  ],
  "rationale": "<why this stance>",
  "next_steps": ["<optional follow-up>"]
}"#;

/// Templates for generating prompts for each role
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for a specialist reviewer
    pub fn specialist_system(profile: &RoleProfile) -> String {
        let focus = focus_list(profile);
        format!(
            r#"You are a {title} reviewing a pull request.

**Your Focus Areas:**
{focus}

Review only the changes shown. Cite findings by file path and the new-file line number
shown in the left gutter of the diff; omit "file" and "line" for general remarks.
If you find no issues, recommend APPROVE with an empty findings list.

Respond with a single JSON object and nothing else:
{schema}"#,
            title = profile.title,
            focus = focus,
            schema = RESPONSE_SCHEMA
        )
    }

    /// System prompt for the arbiter
    pub fn arbiter_system(profile: &RoleProfile) -> String {
        let focus = focus_list(profile);
        format!(
            r#"You are a {title} synthesizing the reviews of several specialists into one decision.

**Your Responsibilities:**
{focus}

Weigh the specialists' findings against each other, resolve disagreements, and
decide the final outcome. Only add findings of your own when the specialists
missed something important. Any critical finding means changes are required.

Respond with a single JSON object and nothing else:
{schema}"#,
            title = profile.title,
            focus = focus,
            schema = RESPONSE_SCHEMA
        )
    }

    /// User prompt: pull request metadata, annotated diff, optional context
    pub fn review_prompt(pr: &PullRequest, diff: &Diff, extra_context: Option<&str>) -> String {
        let (adds, removes) = diff.stats();
        let mut prompt = format!(
            "Pull request {}: {}\n",
            pr.reference(),
            if pr.title.is_empty() { "(untitled)" } else { pr.title.as_str() }
        );
        if let Some(author) = &pr.author {
            let _ = writeln!(prompt, "Author: {}", author);
        }
        let _ = writeln!(prompt, "Base: {} ← Head: {}", pr.base_ref, pr.head_ref);
        let _ = writeln!(
            prompt,
            "Changed files: {} (+{} -{})",
            diff.files.len(),
            adds,
            removes
        );
        if !pr.body.trim().is_empty() {
            let _ = write!(prompt, "\nDescription:\n{}\n", pr.body.trim());
        }

        prompt.push_str("\n## Diff\n\n");
        prompt.push_str(&diff.annotated());

        if let Some(context) = extra_context {
            prompt.push_str("\n## Specialist reviews\n\n");
            prompt.push_str(context);
        }
        prompt
    }

    /// Context handed to the arbiter: every specialist's outcome
    pub fn arbiter_context(aggregate: &AggregateReport) -> String {
        let mut out = format!(
            "Mean specialist score: {:.1}; stances: {} approve, {} comment, {} request changes.\n\n",
            aggregate.mean_score,
            aggregate.stance_tally.approve,
            aggregate.stance_tally.comment,
            aggregate.stance_tally.request_changes
        );
        for result in &aggregate.results {
            render_result(&mut out, result);
        }
        out
    }
}

fn render_result(out: &mut String, result: &AgentResult) {
    let name = result.role.agent_name();
    match result.usable() {
        None => {
            let _ = writeln!(
                out,
                "### {} (failed: {})\n",
                name,
                result.failure.as_deref().unwrap_or("unknown error")
            );
        }
        Some((score, stance)) => {
            let _ = writeln!(out, "### {} (score {:.1}, {})", name, score, stance);
            if !result.summary.is_empty() {
                let _ = writeln!(out, "{}", result.summary);
            }
            if result.findings.is_empty() {
                out.push_str("- no findings\n");
            }
            for finding in &result.findings {
                let _ = writeln!(
                    out,
                    "- [{}] {} ({}): {}",
                    finding.severity.label(),
                    finding.location(),
                    finding.category,
                    finding.message
                );
            }
            out.push('\n');
        }
    }
}

fn focus_list(profile: &RoleProfile) -> String {
    profile
        .focus
        .iter()
        .map(|area| format!("- {}", area))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentReview, AgentRole, Finding, Severity, Stance};

    #[test]
    fn test_specialist_system_contains_focus_and_schema() {
        let profile = RoleProfile::for_role(AgentRole::SecurityEngineer);
        let prompt = PromptTemplate::specialist_system(&profile);
        assert!(prompt.starts_with("You are a Security Engineer"));
        assert!(prompt.contains("- Secrets exposure"));
        assert!(prompt.contains("\"stance\": \"APPROVE\""));
    }

    #[test]
    fn test_review_prompt_includes_annotated_diff() {
        let pr = PullRequest::new("octo/app".parse().unwrap(), 7).with_title("Add login");
        let diff = Diff::parse("--- a/x.py\n+++ b/x.py\n@@ -1 +1 @@\n-a\n+b\n").unwrap();
        let prompt = PromptTemplate::review_prompt(&pr, &diff, None);
        assert!(prompt.starts_with("Pull request octo/app#7: Add login"));
        assert!(prompt.contains("### x.py (modified, +1 -1)"));
        assert!(prompt.contains("     1 +b"));
        assert!(!prompt.contains("## Specialist reviews"));
    }

    #[test]
    fn test_arbiter_context_lists_failures() {
        let aggregate = AggregateReport::from_results(vec![
            AgentResult::success(
                AgentRole::ProductOwner,
                AgentReview::new(8.0, Stance::Comment)
                    .with_findings(vec![Finding::new(Severity::Low, "typo").at("x.py", 1)]),
            ),
            AgentResult::failure(AgentRole::QaEngineer, "timeout"),
        ])
        .unwrap();
        let context = PromptTemplate::arbiter_context(&aggregate);
        assert!(context.contains("### ProductOwner (score 8.0, COMMENT)"));
        assert!(context.contains("- [LOW] x.py:1 (general): typo"));
        assert!(context.contains("### QAEngineer (failed: timeout)"));
    }
}
