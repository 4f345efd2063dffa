//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod llm_gateway;
pub mod progress;
pub mod pull_request_source;
pub mod review_publisher;
pub mod transcript_logger;
