//! Review Pull Request use case
//!
//! End to end: fetch the pull request, run the review, post the result.
//! Nothing is posted when the review fails or in a dry run.

use super::run_review::{ReviewOutcome, RunReviewError, RunReviewInput, RunReviewUseCase};
use crate::config::ReviewParams;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::pull_request_source::{PullRequestSource, SourceError};
use crate::ports::review_publisher::{PublishError, PublishReceipt, ReviewPublisher};
use review_domain::RepoId;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during an end-to-end review
#[derive(Error, Debug)]
pub enum ReviewPullRequestError {
    #[error("Failed to fetch pull request: {0}")]
    Source(#[from] SourceError),

    #[error(transparent)]
    Review(#[from] RunReviewError),

    #[error("Failed to publish review: {0}")]
    Publish(#[from] PublishError),
}

/// Input for the ReviewPullRequest use case
#[derive(Debug, Clone)]
pub struct ReviewPullRequestInput {
    pub repo: RepoId,
    pub number: u64,
    pub params: ReviewParams,
    /// Review without posting anything
    pub dry_run: bool,
}

impl ReviewPullRequestInput {
    pub fn new(repo: RepoId, number: u64, params: ReviewParams) -> Self {
        Self {
            repo,
            number,
            params,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// Result of an end-to-end review
#[derive(Debug, Clone)]
pub struct ReviewReport {
    pub outcome: ReviewOutcome,
    /// `None` in a dry run
    pub receipt: Option<PublishReceipt>,
}

/// Use case wiring the source, the review engine and the publisher
pub struct ReviewPullRequestUseCase<G: LlmGateway + 'static> {
    source: Arc<dyn PullRequestSource>,
    publisher: Arc<dyn ReviewPublisher>,
    review: RunReviewUseCase<G>,
}

impl<G: LlmGateway + 'static> ReviewPullRequestUseCase<G> {
    pub fn new(
        source: Arc<dyn PullRequestSource>,
        publisher: Arc<dyn ReviewPublisher>,
        review: RunReviewUseCase<G>,
    ) -> Self {
        Self {
            source,
            publisher,
            review,
        }
    }

    pub async fn execute(
        &self,
        input: ReviewPullRequestInput,
    ) -> Result<ReviewReport, ReviewPullRequestError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: ReviewPullRequestInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ReviewReport, ReviewPullRequestError> {
        let pr = self
            .source
            .fetch_pull_request(&input.repo, input.number)
            .await?;
        let diff = self.source.fetch_diff(&pr).await?;
        info!("Fetched {}: {}", pr.reference(), pr.title);

        let outcome = self
            .review
            .execute_with_progress(RunReviewInput::new(pr, diff, input.params), progress)
            .await?;

        if input.dry_run {
            info!("Dry run: not posting review to {}", outcome.pr.reference());
            return Ok(ReviewReport {
                outcome,
                receipt: None,
            });
        }

        let receipt = self.publisher.publish(&outcome.pr, &outcome.payload).await?;
        info!(
            "Posted review to {}: {} inline comments, approved: {}",
            outcome.pr.reference(),
            receipt.inline_posted,
            receipt.approved
        );
        Ok(ReviewReport {
            outcome,
            receipt: Some(receipt),
        })
    }
}
