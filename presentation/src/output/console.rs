//! Console output formatter for review reports

use crate::output::formatter::OutputFormatter;
use crate::output::results::ReviewResults;
use colored::Colorize;
use review_application::ReviewReport;
use review_domain::{AgentResult, Severity, Stance, Verdict};

/// Formats review reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete report
    pub fn format(report: &ReviewReport) -> String {
        let mut output = Self::format_summary(report);
        let verdict = &report.outcome.verdict;

        if !verdict.comment_plan.inline.is_empty() {
            output.push_str(&Self::section_header("Inline Comments"));
            for comment in &verdict.comment_plan.inline {
                output.push_str(&format!(
                    "  {} {}:{} {}\n",
                    comment.severity.icon(),
                    comment.path,
                    comment.line,
                    format!("({})", comment.role.agent_name()).dimmed()
                ));
                output.push_str(&Self::indent(&comment.body, "      "));
                output.push('\n');
            }
        }

        if !verdict.comment_plan.summary.is_empty() {
            output.push_str(&Self::section_header("Summary Findings"));
            for item in &verdict.comment_plan.summary {
                let finding = &item.finding.finding;
                output.push_str(&format!(
                    "  {} {} {} {}\n",
                    finding.severity.icon(),
                    Self::severity_label(finding.severity),
                    finding.location(),
                    format!("({}, {})", item.finding.role.agent_name(), item.reason.description())
                        .dimmed()
                ));
                output.push_str(&format!("      {}\n", finding.message));
            }
        }

        if let Some(arbiter) = &verdict.arbiter
            && !arbiter.next_steps.is_empty()
        {
            output.push_str(&Self::section_header("Next Steps"));
            for step in &arbiter.next_steps {
                output.push_str(&format!("  * {}\n", step));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format verdict and agent table only
    pub fn format_summary(report: &ReviewReport) -> String {
        let outcome = &report.outcome;
        let verdict = &outcome.verdict;
        let mut output = String::new();

        output.push_str(&Self::header(&format!("PR Review: {}", outcome.pr.reference())));
        output.push('\n');

        if !outcome.pr.title.is_empty() {
            output.push_str(&format!("{} {}\n", "Title:".cyan().bold(), outcome.pr.title));
        }
        let (added, removed) = outcome.diff.stats();
        output.push_str(&format!(
            "{} {} files, {} {}\n\n",
            "Diff:".cyan().bold(),
            outcome.diff.files.len(),
            format!("+{}", added).green(),
            format!("-{}", removed).red()
        ));

        output.push_str(&format!(
            "{} {} {} (score {:.1}/10, {})\n",
            "Verdict:".cyan().bold(),
            verdict.stance.icon(),
            Self::stance_label(verdict.stance),
            verdict.score,
            verdict.basis.display_name()
        ));
        if !verdict.rationale.is_empty() {
            output.push_str(&format!("{}\n", verdict.rationale));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Auto-approve:".cyan().bold(),
            if verdict.auto_approve { "yes".green() } else { "no".normal() }
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Findings:".cyan().bold(),
            Self::severity_line(verdict)
        ));

        output.push_str(&Self::section_header("Specialists"));
        for result in &verdict.aggregate.results {
            output.push_str(&Self::agent_line(result));
        }
        if let Some(arbiter) = &verdict.arbiter {
            output.push_str(&Self::section_header("Tech Lead"));
            output.push_str(&Self::agent_line(arbiter));
        }

        output.push('\n');
        output.push_str(&Self::publish_line(report));
        output
    }

    /// The summary body exactly as posted
    pub fn format_markdown(report: &ReviewReport) -> String {
        report.outcome.payload.summary_body.clone()
    }

    /// Format as JSON
    pub fn format_json(report: &ReviewReport) -> String {
        ReviewResults::from_report(report).to_json()
    }

    fn agent_line(result: &AgentResult) -> String {
        let name = format!("{:<18}", result.role.title());
        match (&result.failure, result.score, result.stance) {
            (None, Some(score), Some(stance)) => format!(
                "  {} {} {:>4.1}  {:<16} {} {}\n",
                "v".green(),
                name.bold(),
                score,
                stance.as_str(),
                format!("{} findings", result.findings.len()).dimmed(),
                Self::model_and_time(result).dimmed()
            ),
            (failure, _, _) => format!(
                "  {} {} {} {}\n",
                "x".red(),
                name.bold(),
                format!("failed: {}", failure.as_deref().unwrap_or("no result")).red(),
                Self::model_and_time(result).dimmed()
            ),
        }
    }

    fn model_and_time(result: &AgentResult) -> String {
        let seconds = result.elapsed_ms as f64 / 1000.0;
        match &result.model {
            Some(model) => format!("[{}, {:.1}s]", model, seconds),
            None => format!("[{:.1}s]", seconds),
        }
    }

    fn publish_line(report: &ReviewReport) -> String {
        match &report.receipt {
            None => format!("{}\n", "Dry run: nothing was posted".yellow()),
            Some(receipt) => {
                let mut line = format!(
                    "{} {} inline comments",
                    "Posted review".green().bold(),
                    receipt.inline_posted
                );
                if let Some(id) = receipt.review_id {
                    line.push_str(&format!(" (review {})", id));
                }
                if receipt.approved {
                    line.push_str(", approved");
                }
                if let Some(reaction) = receipt.reaction {
                    line.push_str(&format!(", reacted {}", reaction.emoji()));
                }
                line.push('\n');
                line
            }
        }
    }

    fn severity_line(verdict: &Verdict) -> String {
        Severity::DESCENDING
            .iter()
            .map(|s| format!("{} {}", s.icon(), verdict.severity_counts.get(*s)))
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn stance_label(stance: Stance) -> colored::ColoredString {
        match stance {
            Stance::Approve => stance.display_name().green().bold(),
            Stance::Comment => stance.display_name().yellow().bold(),
            Stance::RequestChanges => stance.display_name().red().bold(),
        }
    }

    fn severity_label(severity: Severity) -> colored::ColoredString {
        match severity {
            Severity::Critical | Severity::High => severity.label().red().bold(),
            Severity::Medium => severity.label().yellow().bold(),
            Severity::Low | Severity::Info => severity.label().normal(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, report: &ReviewReport) -> String {
        Self::format(report)
    }

    fn format_summary(&self, report: &ReviewReport) -> String {
        Self::format_summary(report)
    }

    fn format_markdown(&self, report: &ReviewReport) -> String {
        Self::format_markdown(report)
    }

    fn format_json(&self, report: &ReviewReport) -> String {
        Self::format_json(report)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use review_application::{PublishReceipt, ReviewOutcome};
    use review_domain::{
        AgentResult, AgentReview, AgentRole, AggregateReport, Diff, Finding, Model, OutputFormat,
        PayloadOptions, PullRequest, QuorumRule, ReviewPayload, SynthesisPolicy, Synthesizer,
        map_findings,
    };

    const DIFF: &str = "--- a/a.py\n+++ b/a.py\n@@ -1 +1,2 @@\n import os\n+eval(input())\n";

    /// Security flags a critical issue on a.py:2, QA times out, no arbiter
    pub(crate) fn sample_report(receipt: Option<PublishReceipt>) -> ReviewReport {
        let diff = Diff::parse(DIFF).unwrap();
        let security = AgentResult::success(
            AgentRole::SecurityEngineer,
            AgentReview::new(3.0, Stance::RequestChanges).with_findings(vec![
                Finding::new(Severity::Critical, "eval on user input").at("a.py", 2),
                Finding::new(Severity::Low, "module docstring missing"),
            ]),
        )
        .with_model(Model::Gpt41)
        .with_elapsed_ms(1500);
        let qa = AgentResult::failure(AgentRole::QaEngineer, "model call timed out after 180s");

        let aggregate = AggregateReport::from_results(vec![security, qa]).unwrap();
        let verdict = Synthesizer::new(SynthesisPolicy {
            quorum: QuorumRule::AtLeast(1),
            auto_approve: true,
        })
        .synthesize(aggregate, None)
        .unwrap();
        let plan = map_findings(&verdict.findings, &diff);
        let verdict = verdict.with_comment_plan(plan);
        let payload = ReviewPayload::from_verdict(&verdict, PayloadOptions::default());

        ReviewReport {
            outcome: ReviewOutcome {
                pr: PullRequest::new("octo/app".parse().unwrap(), 42).with_title("Add eval"),
                diff,
                verdict,
                payload,
                started_at: Utc::now(),
                finished_at: Utc::now(),
            },
            receipt,
        }
    }

    #[test]
    fn test_summary_output() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format_summary(&sample_report(None));

        assert!(output.contains("PR Review: octo/app#42"));
        assert!(output.contains("Title: Add eval"));
        assert!(output.contains("Request changes"));
        assert!(output.contains("critical finding gate"));
        assert!(output.contains("failed: model call timed out after 180s"));
        assert!(output.contains("[gpt-4.1, 1.5s]"));
        assert!(output.contains("Dry run: nothing was posted"));
        assert!(!output.contains("Inline Comments"));
    }

    #[test]
    fn test_full_output_lists_every_finding() {
        colored::control::set_override(false);
        let output = ConsoleFormatter::format(&sample_report(None));

        assert!(output.contains("Inline Comments"));
        assert!(output.contains("a.py:2"));
        assert!(output.contains("Summary Findings"));
        assert!(output.contains("module docstring missing"));
    }

    #[test]
    fn test_publish_line() {
        colored::control::set_override(false);
        let report = sample_report(Some(PublishReceipt {
            review_id: Some(7),
            inline_posted: 1,
            approved: false,
            reaction: Some(review_domain::Reaction::Confused),
        }));
        let output = ConsoleFormatter.render(&report, OutputFormat::Summary);
        assert!(output.contains("Posted review 1 inline comments (review 7), reacted 😕"));
    }

    #[test]
    fn test_markdown_is_posted_body() {
        let report = sample_report(None);
        assert_eq!(
            ConsoleFormatter.render(&report, OutputFormat::Markdown),
            report.outcome.payload.summary_body
        );
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
