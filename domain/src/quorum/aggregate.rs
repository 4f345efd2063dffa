//! Aggregation of specialist results

use crate::agent::{AgentResult, AgentRole, AttributedFinding, Severity, Stance};
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Number of findings per severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a AttributedFinding>) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            counts.add(finding.severity());
        }
        counts
    }

    pub fn add(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::High => self.high += 1,
            Severity::Medium => self.medium += 1,
            Severity::Low => self.low += 1,
            Severity::Info => self.info += 1,
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low + self.info
    }

    /// Critical plus High findings
    pub fn blocking(&self) -> usize {
        self.critical + self.high
    }
}

/// Stance votes among usable agents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StanceTally {
    pub approve: usize,
    pub comment: usize,
    pub request_changes: usize,
}

impl StanceTally {
    pub fn add(&mut self, stance: Stance) {
        match stance {
            Stance::Approve => self.approve += 1,
            Stance::Comment => self.comment += 1,
            Stance::RequestChanges => self.request_changes += 1,
        }
    }

    pub fn get(&self, stance: Stance) -> usize {
        match stance {
            Stance::Approve => self.approve,
            Stance::Comment => self.comment,
            Stance::RequestChanges => self.request_changes,
        }
    }

    pub fn total(&self) -> usize {
        self.approve + self.comment + self.request_changes
    }

    /// Most common stance; ties go to the more conservative stance
    pub fn majority(&self) -> Option<Stance> {
        [Stance::RequestChanges, Stance::Comment, Stance::Approve]
            .into_iter()
            .filter(|s| self.get(*s) > 0)
            .fold(None, |best: Option<Stance>, s| match best {
                Some(b) if self.get(b) >= self.get(s) => Some(b),
                _ => Some(s),
            })
    }
}

/// Overall success state of the invoked agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentHealth {
    AllSucceeded,
    PartialFailure,
    AllFailed,
}

impl AgentHealth {
    fn from_counts(failed: usize, invoked: usize) -> Self {
        match failed {
            0 => AgentHealth::AllSucceeded,
            f if f >= invoked => AgentHealth::AllFailed,
            _ => AgentHealth::PartialFailure,
        }
    }
}

/// Combined view of all specialist results for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub severity_counts: SeverityCounts,
    /// Mean of usable scores, one decimal
    pub mean_score: f64,
    pub stance_tally: StanceTally,
    /// Union of usable agents' findings in role order
    pub findings: Vec<AttributedFinding>,
    /// Every specialist result, failed ones included, in role order
    pub results: Vec<AgentResult>,
    pub failed_roles: Vec<AgentRole>,
    pub health: AgentHealth,
}

impl AggregateReport {
    /// Aggregate specialist results
    ///
    /// Arbiter results are ignored. Fails with
    /// [`DomainError::NoUsableAgentResults`] when no specialist is usable.
    pub fn from_results(results: Vec<AgentResult>) -> Result<Self, DomainError> {
        let mut results: Vec<AgentResult> = results
            .into_iter()
            .filter(|r| !r.role.is_arbiter())
            .collect();
        results.sort_by_key(|r| r.role);

        let invoked = results.len();
        let mut stance_tally = StanceTally::default();
        let mut scores = Vec::new();
        let mut findings = Vec::new();
        let mut failed_roles = Vec::new();

        for result in &results {
            match result.usable() {
                Some((score, stance)) => {
                    scores.push(score);
                    stance_tally.add(stance);
                    findings.extend(
                        result
                            .findings
                            .iter()
                            .cloned()
                            .map(|f| AttributedFinding::new(result.role, f)),
                    );
                }
                None => failed_roles.push(result.role),
            }
        }

        if scores.is_empty() {
            return Err(DomainError::NoUsableAgentResults { invoked });
        }

        let mean_score = round1(scores.iter().sum::<f64>() / scores.len() as f64);

        Ok(Self {
            severity_counts: SeverityCounts::from_findings(&findings),
            mean_score,
            stance_tally,
            findings,
            health: AgentHealth::from_counts(failed_roles.len(), invoked),
            failed_roles,
            results,
        })
    }

    /// Number of specialists that were invoked
    pub fn invoked(&self) -> usize {
        self.results.len()
    }

    /// Number of specialists with a usable result
    pub fn usable(&self) -> usize {
        self.invoked() - self.failed_roles.len()
    }

    pub fn result_for(&self, role: AgentRole) -> Option<&AgentResult> {
        self.results.iter().find(|r| r.role == role)
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
