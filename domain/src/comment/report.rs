//! Markdown summary body of the review

use crate::agent::{AgentResult, Severity};
use crate::core::string::{single_line, truncate};
use crate::quorum::Verdict;
use std::fmt::Write;

/// Heading shared by every summary body
pub const SUMMARY_HEADING: &str = "## 🤖 Multi-Agent Code Review";

const MAX_CELL_LEN: usize = 120;

/// Render the summary comment for a verdict
pub fn render_summary(verdict: &Verdict) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", SUMMARY_HEADING);
    let _ = writeln!(
        out,
        "**Decision:** {} {} · **Score:** {:.1}/10 · **Basis:** {}\n",
        verdict.stance.icon(),
        verdict.stance.as_str(),
        verdict.score,
        verdict.basis.display_name()
    );
    if !verdict.rationale.is_empty() {
        let _ = writeln!(out, "{}\n", verdict.rationale);
    }

    render_severity_table(&mut out, verdict);
    render_agent_table(&mut out, verdict);
    render_failed_agents(&mut out, verdict);
    render_summary_findings(&mut out, verdict);

    if let Some(arbiter) = &verdict.arbiter
        && !arbiter.next_steps.is_empty()
    {
        out.push_str("### Next steps\n\n");
        for step in &arbiter.next_steps {
            let _ = writeln!(out, "- {}", step);
        }
        out.push('\n');
    }

    out.trim_end().to_string()
}

fn render_severity_table(out: &mut String, verdict: &Verdict) {
    out.push_str("### Findings by severity\n\n");
    out.push_str("| Severity | Count |\n|---|---:|\n");
    for severity in Severity::DESCENDING {
        let label = severity.label();
        let _ = writeln!(
            out,
            "| {} {}{} | {} |",
            severity.icon(),
            &label[..1],
            label[1..].to_lowercase(),
            verdict.severity_counts.get(severity)
        );
    }
    out.push('\n');
}

fn render_agent_table(out: &mut String, verdict: &Verdict) {
    out.push_str("### Agent results\n\n");
    out.push_str("| Agent | Score | Stance | Findings |\n|---|---:|---|---:|\n");
    let rows = verdict.aggregate.results.iter().chain(verdict.arbiter.iter());
    for result in rows {
        let _ = writeln!(out, "{}", agent_row(result));
    }
    out.push('\n');
}

fn agent_row(result: &AgentResult) -> String {
    match result.usable() {
        Some((score, stance)) => format!(
            "| {} | {:.1} | {} {} | {} |",
            result.role.agent_name(),
            score,
            stance.icon(),
            stance.as_str(),
            result.findings.len()
        ),
        None => format!(
            "| {} | - | ⚠️ failed | - |",
            result.role.agent_name()
        ),
    }
}

fn render_failed_agents(out: &mut String, verdict: &Verdict) {
    let failed: Vec<&AgentResult> = verdict
        .aggregate
        .results
        .iter()
        .chain(verdict.arbiter.iter())
        .filter(|r| r.is_failed())
        .collect();
    if failed.is_empty() {
        return;
    }
    out.push_str("### ⚠️ Failed agents\n\n");
    for result in failed {
        let reason = result.failure.as_deref().unwrap_or("unknown error");
        let _ = writeln!(
            out,
            "- **{}**: {}",
            result.role.agent_name(),
            truncate(&single_line(reason), MAX_CELL_LEN)
        );
    }
    out.push('\n');
}

fn render_summary_findings(out: &mut String, verdict: &Verdict) {
    let summary = &verdict.comment_plan.summary;
    if summary.is_empty() {
        return;
    }
    out.push_str("### General findings\n\n");
    for item in summary {
        let finding = &item.finding.finding;
        let _ = write!(
            out,
            "- {} **{}** ",
            finding.severity.icon(),
            finding.severity.label()
        );
        if finding.file.is_some() {
            let _ = write!(out, "`{}` ", finding.location());
        }
        let _ = writeln!(
            out,
            "({}) {} — *{}*",
            finding.category,
            single_line(&finding.message),
            item.finding.role.agent_name()
        );
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentResult, AgentReview, AgentRole, AttributedFinding, Finding, Stance};
    use crate::comment::mapper::{SummaryFinding, SummaryReason};
    use crate::quorum::{AggregateReport, Synthesizer};

    fn verdict() -> Verdict {
        let aggregate = AggregateReport::from_results(vec![
            AgentResult::success(
                AgentRole::ProductOwner,
                AgentReview::new(9.0, Stance::Approve),
            ),
            AgentResult::success(
                AgentRole::SecurityEngineer,
                AgentReview::new(5.0, Stance::RequestChanges).with_findings(vec![
                    Finding::new(Severity::High, "Token | logged").in_file("log.py"),
                ]),
            ),
            AgentResult::failure(AgentRole::QaEngineer, "model timed out\nafter 180s"),
        ])
        .unwrap();
        let mut verdict = Synthesizer::default().synthesize(aggregate, None).unwrap();
        verdict.comment_plan.summary.push(SummaryFinding {
            finding: AttributedFinding::new(
                AgentRole::SecurityEngineer,
                Finding::new(Severity::High, "Token | logged").in_file("log.py"),
            ),
            reason: SummaryReason::NoLine,
        });
        verdict
    }

    #[test]
    fn test_summary_tables() {
        let body = render_summary(&verdict());
        assert!(body.starts_with(SUMMARY_HEADING));
        assert!(body.contains("**Decision:** ❌ REQUEST_CHANGES · **Score:** 7.0/10"));
        assert!(body.contains("| 🟠 High | 1 |"));
        assert!(body.contains("| 🔴 Critical | 0 |"));
        assert!(body.contains("| ProductOwner | 9.0 | ✅ APPROVE | 0 |"));
        assert!(body.contains("| QAEngineer | - | ⚠️ failed | - |"));
    }

    #[test]
    fn test_failed_roles_listed() {
        let body = render_summary(&verdict());
        assert!(body.contains("### ⚠️ Failed agents"));
        assert!(body.contains("- **QAEngineer**: model timed out after 180s"));
    }

    #[test]
    fn test_general_findings_listed() {
        let body = render_summary(&verdict());
        assert!(body.contains("- 🟠 **HIGH** `log.py` (general) Token \\| logged — *SecurityEngineer*"));
    }
}
