//! Final-decision policy
//!
//! Turns the aggregate of specialist results plus the optional arbiter result
//! into one [`Verdict`]. Decision order:
//!
//! 1. any Critical finding (specialists or arbiter) forces `RequestChanges`
//! 2. otherwise a usable arbiter's stance is authoritative
//! 3. otherwise the majority stance of usable specialists, ties going to the
//!    more conservative stance
//!
//! A usable arbiter's score always replaces the specialists' mean.

use super::aggregate::{AggregateReport, SeverityCounts, round1};
use super::rule::QuorumRule;
use crate::agent::{AgentResult, AgentRole, AttributedFinding, Severity, Stance};
use crate::comment::CommentPlan;
use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Which rule of the policy decided the stance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionBasis {
    CriticalGate,
    Arbiter,
    Majority,
}

impl DecisionBasis {
    pub fn display_name(&self) -> &'static str {
        match self {
            DecisionBasis::CriticalGate => "critical finding gate",
            DecisionBasis::Arbiter => "tech lead decision",
            DecisionBasis::Majority => "specialist majority",
        }
    }
}

/// Tunable parts of the decision policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisPolicy {
    pub quorum: QuorumRule,
    /// When false, auto-approval is never signalled
    pub auto_approve: bool,
}

impl Default for SynthesisPolicy {
    fn default() -> Self {
        Self {
            quorum: QuorumRule::default(),
            auto_approve: true,
        }
    }
}

/// The single decision handed to posting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub stance: Stance,
    pub score: f64,
    pub rationale: String,
    pub basis: DecisionBasis,
    pub auto_approve: bool,
    pub aggregate: AggregateReport,
    /// Arbiter result when the arbiter was invoked (failed or not)
    pub arbiter: Option<AgentResult>,
    /// Specialist findings followed by the arbiter's
    pub findings: Vec<AttributedFinding>,
    pub severity_counts: SeverityCounts,
    #[serde(default)]
    pub comment_plan: CommentPlan,
}

impl Verdict {
    pub fn with_comment_plan(mut self, plan: CommentPlan) -> Self {
        self.comment_plan = plan;
        self
    }

    /// Roles whose agent failed, arbiter included
    pub fn failed_roles(&self) -> Vec<AgentRole> {
        let mut roles = self.aggregate.failed_roles.clone();
        if let Some(arbiter) = &self.arbiter
            && arbiter.is_failed()
        {
            roles.push(arbiter.role);
        }
        roles
    }

    /// Whether every invoked agent (arbiter included) succeeded
    pub fn all_agents_succeeded(&self) -> bool {
        self.failed_roles().is_empty()
    }
}

/// Applies the decision policy
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    policy: SynthesisPolicy,
}

impl Synthesizer {
    pub fn new(policy: SynthesisPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SynthesisPolicy {
        &self.policy
    }

    pub fn synthesize(
        &self,
        aggregate: AggregateReport,
        arbiter: Option<AgentResult>,
    ) -> Result<Verdict, DomainError> {
        let arbiter = arbiter.filter(|a| a.role.is_arbiter());
        let arbiter_usable = arbiter.as_ref().and_then(|a| a.usable());

        let invoked = aggregate.invoked();
        let usable = aggregate.usable();
        if usable == 0 && arbiter_usable.is_none() {
            return Err(self.no_quorum(usable, invoked));
        }
        if !self.policy.quorum.is_satisfied(usable, invoked) {
            return Err(self.no_quorum(usable, invoked));
        }

        let mut findings = aggregate.findings.clone();
        if let Some(result) = arbiter.as_ref().filter(|a| !a.is_failed()) {
            findings.extend(
                result
                    .findings
                    .iter()
                    .cloned()
                    .map(|f| AttributedFinding::new(result.role, f)),
            );
        }
        let severity_counts = SeverityCounts::from_findings(&findings);

        let (stance, basis) = if severity_counts.critical > 0 {
            (Stance::RequestChanges, DecisionBasis::CriticalGate)
        } else if let Some((_, stance)) = arbiter_usable {
            (stance, DecisionBasis::Arbiter)
        } else {
            let stance = aggregate
                .stance_tally
                .majority()
                .ok_or_else(|| self.no_quorum(usable, invoked))?;
            (stance, DecisionBasis::Majority)
        };

        let score = match arbiter_usable {
            Some((score, _)) => round1(score),
            None => aggregate.mean_score,
        };

        let arbiter_ok = arbiter.as_ref().is_none_or(|a| !a.is_failed());
        let auto_approve = self.policy.auto_approve
            && stance == Stance::Approve
            && severity_counts.blocking() == 0
            && aggregate.failed_roles.is_empty()
            && arbiter_ok;

        let rationale = build_rationale(
            basis,
            stance,
            score,
            &aggregate,
            arbiter.as_ref(),
            &findings,
        );

        Ok(Verdict {
            stance,
            score,
            rationale,
            basis,
            auto_approve,
            aggregate,
            arbiter,
            findings,
            severity_counts,
            comment_plan: CommentPlan::default(),
        })
    }

    fn no_quorum(&self, usable: usize, invoked: usize) -> DomainError {
        DomainError::NoQuorum {
            usable,
            invoked,
            rule: self.policy.quorum.description(),
        }
    }
}

fn build_rationale(
    basis: DecisionBasis,
    stance: Stance,
    score: f64,
    aggregate: &AggregateReport,
    arbiter: Option<&AgentResult>,
    findings: &[AttributedFinding],
) -> String {
    let mut parts = Vec::new();

    match basis {
        DecisionBasis::CriticalGate => {
            let mut roles: Vec<AgentRole> = findings
                .iter()
                .filter(|f| f.severity() == Severity::Critical)
                .map(|f| f.role)
                .collect();
            roles.dedup();
            let names: Vec<&str> = roles.iter().map(|r| r.agent_name()).collect();
            let count = findings
                .iter()
                .filter(|f| f.severity() == Severity::Critical)
                .count();
            parts.push(format!(
                "{} critical finding(s) raised by {}; changes are required regardless of the other votes.",
                count,
                names.join(", ")
            ));
        }
        DecisionBasis::Arbiter => {
            parts.push(format!(
                "Tech lead decided {} with score {:.1}.",
                stance.display_name().to_lowercase(),
                score
            ));
            if let Some(text) = arbiter
                .map(|a| if a.rationale.is_empty() { &a.summary } else { &a.rationale })
                .filter(|t| !t.is_empty())
            {
                parts.push(text.clone());
            }
        }
        DecisionBasis::Majority => {
            let tally = &aggregate.stance_tally;
            parts.push(format!(
                "Majority of {} usable specialist(s): {} approve, {} comment, {} request changes.",
                aggregate.usable(),
                tally.approve,
                tally.comment,
                tally.request_changes
            ));
        }
    }

    if let Some(arbiter) = arbiter
        && let Some(reason) = &arbiter.failure
    {
        parts.push(format!("Tech lead synthesis unavailable: {}.", reason));
    }
    if !aggregate.failed_roles.is_empty() {
        let names: Vec<&str> = aggregate
            .failed_roles
            .iter()
            .map(|r| r.agent_name())
            .collect();
        parts.push(format!("Failed agents: {}.", names.join(", ")));
    }

    parts.join(" ")
}
