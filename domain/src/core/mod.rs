//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`]: LLM models that can serve a review agent
//! - [`pull_request::PullRequest`]: metadata of the pull request under review
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod model;
pub mod pull_request;
pub mod string;
