//! Pull request source port
//!
//! Read-only access to PR metadata and diff content on a source-control host.

use async_trait::async_trait;
use review_domain::{Diff, DomainError, FileChange, PullRequest, RepoId, validate_files};
use thiserror::Error;

/// Errors raised while retrieving a pull request
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Pull request not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Diff content as delivered by a source
///
/// Either raw unified diff text or file changes the host already
/// structured. Both go through the same validation.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffContent {
    Unified(String),
    Files(Vec<FileChange>),
}

impl DiffContent {
    /// Normalize into the addressable diff model
    pub fn normalize(self) -> Result<Diff, DomainError> {
        match self {
            DiffContent::Unified(text) => Diff::parse(&text),
            DiffContent::Files(files) => validate_files(files),
        }
    }
}

impl From<String> for DiffContent {
    fn from(text: String) -> Self {
        DiffContent::Unified(text)
    }
}

/// Source of pull requests under review
#[async_trait]
pub trait PullRequestSource: Send + Sync {
    /// Fetch metadata of one pull request
    async fn fetch_pull_request(
        &self,
        repo: &RepoId,
        number: u64,
    ) -> Result<PullRequest, SourceError>;

    /// Fetch the diff of a pull request
    async fn fetch_diff(&self, pr: &PullRequest) -> Result<DiffContent, SourceError>;
}
