//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod agent_runner;
pub mod review_pull_request;
pub mod run_review;
