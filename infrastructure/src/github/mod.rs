//! GitHub REST adapter
//!
//! One client serves both sides of the review: [`PullRequestSource`] for
//! metadata and diff, [`ReviewPublisher`] for the review, the approval and
//! the reaction.
//!
//! [`PullRequestSource`]: review_application::PullRequestSource
//! [`ReviewPublisher`]: review_application::ReviewPublisher

pub mod client;
pub mod types;

pub use client::GitHubClient;
