//! OpenAI-compatible LLM Gateway implementation

use super::error::OpenAiError;
use super::session::OpenAiSession;
use crate::config::FileProviderConfig;
use crate::http::build_client;
use async_trait::async_trait;
use review_application::{GatewayError, LlmGateway, LlmSession};
use review_domain::Model;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

const USER_AGENT: &str = concat!("pr-quorum/", env!("CARGO_PKG_VERSION"));

/// Connection settings of a chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Where the key was expected, for error messages
    pub api_key_env: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub request_timeout: Duration,
}

impl OpenAiSettings {
    pub fn from_config(config: &FileProviderConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.resolve_api_key(),
            api_key_env: config.api_key_env.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            request_timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Full URL of the chat completions endpoint
    pub fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

/// LLM Gateway implementation for OpenAI-compatible endpoints
pub struct OpenAiGateway {
    client: reqwest::Client,
    settings: Arc<OpenAiSettings>,
}

impl OpenAiGateway {
    pub fn new(settings: OpenAiSettings) -> Result<Self, GatewayError> {
        let client = build_client(settings.request_timeout, USER_AGENT)
            .map_err(|e| GatewayError::from(OpenAiError::Client(e)))?;

        info!("OpenAiGateway initialized for {}", settings.base_url);

        Ok(Self {
            client,
            settings: Arc::new(settings),
        })
    }

    pub fn settings(&self) -> &OpenAiSettings {
        &self.settings
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn create_session_with_system_prompt(
        &self,
        model: &Model,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError> {
        if self.settings.api_key.is_none() {
            return Err(OpenAiError::MissingApiKey(self.settings.api_key_env.clone()).into());
        }
        Ok(Box::new(OpenAiSession::new(
            self.client.clone(),
            Arc::clone(&self.settings),
            model.clone(),
            system_prompt.to_string(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str) -> OpenAiSettings {
        OpenAiSettings {
            base_url: base_url.to_string(),
            api_key: None,
            api_key_env: "PR_QUORUM_TEST_KEY".to_string(),
            temperature: None,
            max_tokens: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_completions_url() {
        assert_eq!(
            settings("https://api.openai.com").completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            settings("http://localhost:11434/v1/").completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_session() {
        let gateway = OpenAiGateway::new(settings("http://localhost:1")).unwrap();
        let result = gateway
            .create_session_with_system_prompt(&Model::Gpt41, "system")
            .await;
        match result {
            Err(GatewayError::SessionError(msg)) => assert!(msg.contains("PR_QUORUM_TEST_KEY")),
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("session created without an API key"),
        }
    }
}
