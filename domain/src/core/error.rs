//! Domain error types

use thiserror::Error;

/// Domain-level errors
///
/// Every variant except [`DomainError::InvalidRepository`] is fatal for a review
/// run: the caller must not post anything to the pull request.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Malformed diff at line {line}: {reason}")]
    MalformedDiff { line: usize, reason: String },

    #[error("No usable agent results: all {invoked} specialist agents failed")]
    NoUsableAgentResults { invoked: usize },

    #[error("No quorum: {usable} of {invoked} agents usable, rule requires {rule}")]
    NoQuorum {
        usable: usize,
        invoked: usize,
        rule: String,
    },

    #[error("Invalid repository identifier: {0}")]
    InvalidRepository(String),
}

impl DomainError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        DomainError::MalformedDiff {
            line,
            reason: reason.into(),
        }
    }

    /// Check if this error is caused by insufficient successful agents
    pub fn is_quorum_failure(&self) -> bool {
        matches!(
            self,
            DomainError::NoUsableAgentResults { .. } | DomainError::NoQuorum { .. }
        )
    }
}
