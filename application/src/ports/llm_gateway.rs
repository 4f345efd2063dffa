//! LLM Gateway port
//!
//! How review agents reach a hosted model: one session per agent, opened
//! with the role's system prompt, then a single user turn carrying the
//! annotated diff. Every error surfaces to the runner as an agent failure.

use async_trait::async_trait;
use review_domain::Model;
use thiserror::Error;

/// Errors that can occur while invoking a model
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout")]
    Timeout,
}

/// Gateway for model invocation
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Open a session for `model` primed with a role's system prompt
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An open model session
#[async_trait]
pub trait LlmSession: Send + Sync {
    /// The model serving this session
    fn model(&self) -> &Model;

    /// Send one user turn and return the raw response text
    async fn send(&self, content: &str) -> Result<String, GatewayError>;
}
