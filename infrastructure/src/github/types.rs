//! GitHub REST API wire types.

use review_domain::{PullRequest, RepoId, ReviewPayload};
use serde::{Deserialize, Serialize};

/// `GET /repos/{owner}/{repo}/pulls/{number}` (only the fields we read)
#[derive(Debug, Clone, Deserialize)]
pub struct PullResponse {
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub user: Option<UserRef>,
    pub base: BranchRef,
    pub head: BranchRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub login: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BranchRef {
    #[serde(rename = "ref")]
    pub ref_name: String,
    pub sha: String,
}

impl PullResponse {
    pub fn into_pull_request(self, repo: RepoId) -> PullRequest {
        PullRequest {
            repo,
            number: self.number,
            title: self.title,
            body: self.body.unwrap_or_default(),
            author: self.user.map(|u| u.login),
            base_ref: self.base.ref_name,
            head_ref: self.head.ref_name,
            head_sha: Some(self.head.sha),
        }
    }
}

/// Inline comment of a review, anchored on the new side of the diff
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewCommentRequest {
    pub path: String,
    pub line: u32,
    pub side: &'static str,
    pub body: String,
}

/// `POST /repos/{owner}/{repo}/pulls/{number}/reviews`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_id: Option<String>,
    pub body: String,
    pub event: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<ReviewCommentRequest>,
}

impl CreateReviewRequest {
    /// Review carrying the summary and every inline comment
    pub fn from_payload(payload: &ReviewPayload, commit_id: Option<String>) -> Self {
        Self {
            commit_id,
            body: payload.summary_body.clone(),
            event: payload.event.as_str(),
            comments: payload
                .inline
                .iter()
                .map(|c| ReviewCommentRequest {
                    path: c.path.clone(),
                    line: c.line,
                    side: "RIGHT",
                    body: c.body.clone(),
                })
                .collect(),
        }
    }

    /// Separate approving review
    pub fn approval(message: &str, commit_id: Option<String>) -> Self {
        Self {
            commit_id,
            body: message.to_string(),
            event: "APPROVE",
            comments: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewResponse {
    pub id: u64,
}

/// `POST /repos/{owner}/{repo}/issues/{number}/reactions`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateReactionRequest {
    pub content: &'static str,
}

/// Error body of the REST API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorResponse {
    pub fn describe(&self) -> String {
        match self.errors.iter().find_map(|e| e.message.as_deref()) {
            Some(detail) if !detail.is_empty() => format!("{}: {}", self.message, detail),
            _ => self.message.clone(),
        }
    }
}
