//! Error types for the OpenAI-compatible adapter

use review_application::GatewayError;
use thiserror::Error;

/// Errors that can occur when calling a chat completions endpoint
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Response contained no message content")]
    EmptyResponse,

    #[error("No API key configured (set {0})")]
    MissingApiKey(String),
}

impl From<OpenAiError> for GatewayError {
    fn from(err: OpenAiError) -> Self {
        match err {
            OpenAiError::Client(e) if e.is_timeout() => GatewayError::Timeout,
            OpenAiError::Client(e) if e.is_connect() => GatewayError::ConnectionError(e.to_string()),
            OpenAiError::Status { status: 404, body } => GatewayError::ModelNotAvailable(body),
            OpenAiError::MissingApiKey(var) => {
                GatewayError::SessionError(format!("no API key configured (set {})", var))
            }
            other => GatewayError::RequestFailed(other.to_string()),
        }
    }
}
