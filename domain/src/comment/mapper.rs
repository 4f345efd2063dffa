//! Placement of findings onto diff coordinates
//!
//! A finding becomes an inline comment only when its `(file, line)` is an
//! added or context line of the diff. Everything else is kept as a
//! summary-level finding with the reason it could not be placed; nothing is
//! dropped.

use crate::agent::{AgentRole, AttributedFinding, Severity};
use crate::diff::{Diff, FileChange, LineKind};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Comment anchored on a new-file line of the diff
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineComment {
    pub path: String,
    pub line: u32,
    pub body: String,
    pub severity: Severity,
    pub role: AgentRole,
}

/// Why a finding was not placed inline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryReason {
    /// No file given
    NoLocation,
    /// File given but no line
    NoLine,
    FileNotInDiff,
    /// File is in the diff but has no hunks (rename, binary)
    NoHunks,
    /// Line is not an anchor but equals the old-file number of a removed
    /// line; findings cite new-file numbers, so this is a best-effort label
    RemovedLine,
    LineOutsideHunks,
}

impl SummaryReason {
    pub fn description(&self) -> &'static str {
        match self {
            SummaryReason::NoLocation => "general",
            SummaryReason::NoLine => "no line given",
            SummaryReason::FileNotInDiff => "file not in diff",
            SummaryReason::NoHunks => "file has no content changes",
            SummaryReason::RemovedLine => "line matches a removed line",
            SummaryReason::LineOutsideHunks => "line outside changed hunks",
        }
    }
}

/// Finding reported in the summary body only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryFinding {
    #[serde(flatten)]
    pub finding: AttributedFinding,
    pub reason: SummaryReason,
}

/// Resolved placement of every finding
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPlan {
    /// Ordered by (path, line); ties keep role order
    pub inline: Vec<InlineComment>,
    /// Ordered by severity descending, then role
    pub summary: Vec<SummaryFinding>,
}

impl CommentPlan {
    pub fn len(&self) -> usize {
        self.inline.len() + self.summary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Whether `line`, read as an old-file number, is one of the removed lines
fn matches_removed_line(change: &FileChange, line: u32) -> bool {
    change
        .hunks
        .iter()
        .flat_map(|h| h.lines.iter())
        .any(|l| l.kind == LineKind::Removed && l.old_line == Some(line))
}

/// Map findings (in role order) onto the diff
pub fn map_findings(findings: &[AttributedFinding], diff: &Diff) -> CommentPlan {
    let anchors = diff.anchors();
    let mut plan = CommentPlan::default();

    for attributed in findings {
        let finding = &attributed.finding;
        let placement = match (&finding.file, finding.line) {
            (None, _) => Err(SummaryReason::NoLocation),
            (Some(file), line) => {
                let path = normalize_path(file);
                match (diff.file(path), line) {
                    (None, _) => Err(SummaryReason::FileNotInDiff),
                    (Some(change), _) if change.hunks.is_empty() => Err(SummaryReason::NoHunks),
                    (Some(_), None) => Err(SummaryReason::NoLine),
                    (Some(_), Some(line)) if anchors.contains(path, line) => Ok((path, line)),
                    (Some(change), Some(line)) if matches_removed_line(change, line) => {
                        Err(SummaryReason::RemovedLine)
                    }
                    (Some(_), Some(_)) => Err(SummaryReason::LineOutsideHunks),
                }
            }
        };

        match placement {
            Ok((path, line)) => plan.inline.push(InlineComment {
                path: path.to_string(),
                line,
                body: inline_body(attributed),
                severity: finding.severity,
                role: attributed.role,
            }),
            Err(reason) => plan.summary.push(SummaryFinding {
                finding: attributed.clone(),
                reason,
            }),
        }
    }

    // Stable sorts: ties keep the incoming role order
    plan.inline
        .sort_by(|a, b| a.path.cmp(&b.path).then(a.line.cmp(&b.line)));
    plan.summary.sort_by(|a, b| {
        b.finding
            .severity()
            .cmp(&a.finding.severity())
            .then(a.finding.role.cmp(&b.finding.role))
    });

    plan
}

/// Markdown body of an inline comment
pub fn inline_body(attributed: &AttributedFinding) -> String {
    let finding = &attributed.finding;
    let mut body = format!(
        "**{} {}** · {}\n\n{}\n",
        finding.severity.icon(),
        finding.severity.label(),
        finding.category,
        finding.message
    );
    if let Some(current) = &finding.current_code {
        let _ = write!(body, "\n**Current:**\n```\n{}\n```\n", current);
    }
    if let Some(recommendation) = &finding.recommendation {
        let _ = write!(body, "\n**Recommendation:** {}\n", recommendation);
    }
    if let Some(suggestion) = &finding.suggestion {
        let _ = write!(body, "\n```suggestion\n{}\n```\n", suggestion);
    }
    let _ = write!(body, "\n*— {}*", attributed.role.agent_name());
    body
}

fn normalize_path(path: &str) -> &str {
    let path = path.trim();
    let path = path.strip_prefix("./").unwrap_or(path);
    path.strip_prefix('/').unwrap_or(path)
}
