//! Application layer for pr-quorum
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ReviewParams;
pub use ports::{
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{NoProgress, ProgressNotifier, ReviewPhase},
    pull_request_source::{DiffContent, PullRequestSource, SourceError},
    review_publisher::{PublishError, PublishReceipt, ReviewPublisher},
    transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::agent_runner::{AgentRunner, AgentTask};
pub use use_cases::review_pull_request::{
    ReviewPullRequestError, ReviewPullRequestInput, ReviewPullRequestUseCase, ReviewReport,
};
pub use use_cases::run_review::{ReviewOutcome, RunReviewError, RunReviewInput, RunReviewUseCase};
