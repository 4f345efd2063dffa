//! GitHub REST client.

use super::types::{
    ApiErrorResponse, CreateReactionRequest, CreateReviewRequest, PullResponse, ReviewResponse,
};
use crate::http::{build_client, sanitize_error_body};
use async_trait::async_trait;
use review_application::{
    DiffContent, PublishError, PublishReceipt, PullRequestSource, ReviewPublisher, SourceError,
};
use review_domain::{PullRequest, RepoId, ReviewPayload};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("pr-quorum/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const DIFF_MEDIA_TYPE: &str = "application/vnd.github.v3.diff";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Failure of a single REST call
#[derive(Debug)]
enum GitHubError {
    Client(reqwest::Error),
    Status { status: u16, message: String },
    Parse(String),
}

impl From<reqwest::Error> for GitHubError {
    fn from(e: reqwest::Error) -> Self {
        GitHubError::Client(e)
    }
}

impl From<GitHubError> for SourceError {
    fn from(e: GitHubError) -> Self {
        match e {
            GitHubError::Status {
                status: 401 | 403,
                message,
            } => SourceError::Unauthorized(message),
            GitHubError::Status {
                status: 404,
                message,
            } => SourceError::NotFound(message),
            GitHubError::Status { status, message } => {
                SourceError::RequestFailed(format!("HTTP {}: {}", status, message))
            }
            GitHubError::Client(e) => SourceError::RequestFailed(e.to_string()),
            GitHubError::Parse(e) => SourceError::InvalidResponse(e),
        }
    }
}

impl From<GitHubError> for PublishError {
    fn from(e: GitHubError) -> Self {
        match e {
            GitHubError::Status {
                status: 401 | 403,
                message,
            } => PublishError::Unauthorized(message),
            GitHubError::Status {
                status: 422,
                message,
            } => PublishError::Rejected(message),
            GitHubError::Status { status, message } => {
                PublishError::RequestFailed(format!("HTTP {}: {}", status, message))
            }
            GitHubError::Client(e) => PublishError::RequestFailed(e.to_string()),
            GitHubError::Parse(e) => PublishError::RequestFailed(e),
        }
    }
}

/// Human-readable message from an error response body
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(error) => sanitize_error_body(&error.describe()),
        Err(_) => sanitize_error_body(body),
    }
}

/// Client for the pull request and review endpoints
#[derive(Clone)]
pub struct GitHubClient {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    /// Create a client; without a token only public data can be read
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(REQUEST_TIMEOUT, USER_AGENT)?,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn pull_url(&self, repo: &RepoId, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/pulls/{}",
            self.api_url,
            repo.owner(),
            repo.name(),
            number
        )
    }

    fn reviews_url(&self, repo: &RepoId, number: u64) -> String {
        format!("{}/reviews", self.pull_url(repo, number))
    }

    fn reactions_url(&self, repo: &RepoId, number: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/reactions",
            self.api_url,
            repo.owner(),
            repo.name(),
            number
        )
    }

    fn request(&self, method: reqwest::Method, url: &str, accept: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, url)
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => builder.header("Authorization", format!("Bearer {}", token)),
            None => builder,
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, GitHubError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GitHubError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, GitHubError> {
        debug!("GET {}", url);
        let body = self
            .send(self.request(reqwest::Method::GET, url, JSON_MEDIA_TYPE))
            .await?;
        serde_json::from_str(&body).map_err(|e| GitHubError::Parse(e.to_string()))
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        payload: &B,
    ) -> Result<T, GitHubError> {
        debug!("POST {}", url);
        let body = self
            .send(self.request(reqwest::Method::POST, url, JSON_MEDIA_TYPE).json(payload))
            .await?;
        serde_json::from_str(&body).map_err(|e| GitHubError::Parse(e.to_string()))
    }
}

#[async_trait]
impl PullRequestSource for GitHubClient {
    async fn fetch_pull_request(
        &self,
        repo: &RepoId,
        number: u64,
    ) -> Result<PullRequest, SourceError> {
        let response: PullResponse = self.get_json(&self.pull_url(repo, number)).await?;
        Ok(response.into_pull_request(repo.clone()))
    }

    async fn fetch_diff(&self, pr: &PullRequest) -> Result<DiffContent, SourceError> {
        let url = self.pull_url(&pr.repo, pr.number);
        debug!("GET {} (diff)", url);
        let text = self
            .send(self.request(reqwest::Method::GET, &url, DIFF_MEDIA_TYPE))
            .await?;
        Ok(DiffContent::Unified(text))
    }
}

#[async_trait]
impl ReviewPublisher for GitHubClient {
    async fn publish(
        &self,
        pr: &PullRequest,
        payload: &ReviewPayload,
    ) -> Result<PublishReceipt, PublishError> {
        if self.token.is_none() {
            return Err(PublishError::Unauthorized(
                "a GitHub token is required to post reviews".to_string(),
            ));
        }

        let reviews_url = self.reviews_url(&pr.repo, pr.number);
        let review: ReviewResponse = self
            .post_json(
                &reviews_url,
                &CreateReviewRequest::from_payload(payload, pr.head_sha.clone()),
            )
            .await?;
        info!(
            "Posted {} review {} with {} inline comments",
            payload.event.as_str(),
            review.id,
            payload.inline.len()
        );

        let mut receipt = PublishReceipt {
            review_id: Some(review.id),
            inline_posted: payload.inline.len(),
            ..Default::default()
        };

        // The review is already posted; approval and reaction are best effort
        if let Some(approval) = &payload.approval {
            let request = CreateReviewRequest::approval(&approval.message, pr.head_sha.clone());
            match self
                .post_json::<_, ReviewResponse>(&reviews_url, &request)
                .await
            {
                Ok(_) => receipt.approved = true,
                Err(e) => warn!("Approval of {} failed: {}", pr.reference(), PublishError::from(e)),
            }
        }

        if let Some(reaction) = payload.reaction {
            let request = CreateReactionRequest {
                content: reaction.content(),
            };
            match self
                .post_json::<_, serde_json::Value>(&self.reactions_url(&pr.repo, pr.number), &request)
                .await
            {
                Ok(_) => receipt.reaction = Some(reaction),
                Err(e) => warn!("Reaction on {} failed: {}", pr.reference(), PublishError::from(e)),
            }
        }

        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GitHubClient {
        GitHubClient::new("https://api.github.com/", Some("ghp_test".to_string())).unwrap()
    }

    #[test]
    fn test_endpoint_urls() {
        let client = client();
        let repo: RepoId = "octo/app".parse().unwrap();
        assert_eq!(
            client.pull_url(&repo, 7),
            "https://api.github.com/repos/octo/app/pulls/7"
        );
        assert_eq!(
            client.reviews_url(&repo, 7),
            "https://api.github.com/repos/octo/app/pulls/7/reviews"
        );
        assert_eq!(
            client.reactions_url(&repo, 7),
            "https://api.github.com/repos/octo/app/issues/7/reactions"
        );
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let client = GitHubClient::new("https://api.github.com", Some("  ".to_string())).unwrap();
        assert!(!client.has_token());
        assert!(self::client().has_token());
    }

    #[test]
    fn test_request_headers() {
        let request = client()
            .request(
                reqwest::Method::GET,
                "https://api.github.com/repos/octo/app/pulls/7",
                DIFF_MEDIA_TYPE,
            )
            .build()
            .unwrap();
        let headers = request.headers();
        assert_eq!(headers["Accept"], DIFF_MEDIA_TYPE);
        assert_eq!(headers["X-GitHub-Api-Version"], API_VERSION);
        assert_eq!(headers["Authorization"], "Bearer ghp_test");
    }

    #[test]
    fn test_status_mapping() {
        let status = |status| GitHubError::Status {
            status,
            message: "nope".to_string(),
        };
        assert!(matches!(
            SourceError::from(status(404)),
            SourceError::NotFound(_)
        ));
        assert!(matches!(
            SourceError::from(status(403)),
            SourceError::Unauthorized(_)
        ));
        assert!(matches!(
            SourceError::from(status(500)),
            SourceError::RequestFailed(_)
        ));
        assert!(matches!(
            PublishError::from(status(401)),
            PublishError::Unauthorized(_)
        ));
        assert!(matches!(
            PublishError::from(status(422)),
            PublishError::Rejected(_)
        ));
    }

    #[test]
    fn test_error_message() {
        assert_eq!(
            error_message(r#"{"message":"Not Found","documentation_url":"https://docs.github.com"}"#),
            "Not Found"
        );
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
    }

    #[tokio::test]
    async fn test_publish_requires_token() {
        let client = GitHubClient::new("https://api.github.com", None).unwrap();
        let pr = PullRequest::new("octo/app".parse().unwrap(), 7);
        let payload = ReviewPayload {
            inline: vec![],
            summary_body: "## Summary".to_string(),
            event: review_domain::ReviewEvent::Comment,
            approval: None,
            reaction: None,
        };
        let err = client.publish(&pr, &payload).await.unwrap_err();
        assert!(matches!(err, PublishError::Unauthorized(_)));
    }
}
