//! Review publisher port
//!
//! Posts a finished review back to the source-control host.

use async_trait::async_trait;
use review_domain::{PullRequest, Reaction, ReviewPayload};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while posting a review
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rejected by host: {0}")]
    Rejected(String),
}

/// What the host accepted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<u64>,
    pub inline_posted: usize,
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Reaction>,
}

/// Posting collaborator
#[async_trait]
pub trait ReviewPublisher: Send + Sync {
    /// Post inline comments, the summary, the optional approval and reaction
    async fn publish(
        &self,
        pr: &PullRequest,
        payload: &ReviewPayload,
    ) -> Result<PublishReceipt, PublishError>;
}
