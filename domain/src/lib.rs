//! Domain layer for pr-quorum
//!
//! This crate contains the review engine's business logic, entities, and
//! value objects. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Diff
//!
//! A raw unified diff is normalized into an addressable [`Diff`] whose added
//! and context lines carry new-file line numbers: the coordinates inline
//! comments are anchored to.
//!
//! ## Review quorum
//!
//! - **Specialists**: independent agents, one per [`AgentRole`], each returning
//!   a score, a stance and findings
//! - **Aggregate**: severity counts, mean score and stance tally of the usable
//!   specialists
//! - **Synthesis**: critical-finding gate, then the arbiter's decision, then the
//!   specialist majority
//!
//! ## Comments
//!
//! Findings that hit a diff anchor become inline comments; all others are
//! listed in the summary body. Nothing is dropped.

pub mod agent;
pub mod comment;
pub mod config;
pub mod core;
pub mod diff;
pub mod prompt;
pub mod quorum;

// Re-export commonly used types
pub use agent::{
    AgentResult, AgentReview, AgentRole, AttributedFinding, Finding, ResponseError, RoleProfile,
    Severity, Stance, parse_agent_response,
};
pub use comment::{
    CommentPlan, InlineComment, PayloadOptions, REACTION_TABLE, Reaction, ReviewEvent,
    ReviewPayload, SummaryFinding, SummaryReason, map_findings,
};
pub use config::{ConfigIssue, ConfigIssueCode, IssueLevel, OutputFormat};
pub use core::{
    error::DomainError,
    model::Model,
    pull_request::{PullRequest, RepoId},
};
pub use diff::{
    AnchorIndex, ChangeKind, Diff, DiffLine, FileChange, Hunk, LineKind, parse_unified_diff,
    validate_files,
};
pub use prompt::PromptTemplate;
pub use quorum::{
    AgentHealth, AggregateReport, DecisionBasis, QuorumRule, SeverityCounts, StanceTally,
    SynthesisPolicy, Synthesizer, Verdict,
};
