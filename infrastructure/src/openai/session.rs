//! Chat completions session.
//!
//! Each [`OpenAiSession`] carries one system prompt; every `send` is a
//! single stateless completion request.

use super::error::OpenAiError;
use super::gateway::OpenAiSettings;
use super::protocol::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat};
use crate::http::sanitize_error_body;
use async_trait::async_trait;
use review_application::{GatewayError, LlmSession};
use review_domain::Model;
use std::sync::Arc;
use tracing::debug;

pub struct OpenAiSession {
    client: reqwest::Client,
    settings: Arc<OpenAiSettings>,
    model: Model,
    system_prompt: String,
}

impl OpenAiSession {
    pub fn new(
        client: reqwest::Client,
        settings: Arc<OpenAiSettings>,
        model: Model,
        system_prompt: String,
    ) -> Self {
        Self {
            client,
            settings,
            model,
            system_prompt,
        }
    }

    fn request(&self, content: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.to_string(),
            messages: vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::user(content),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
            response_format: ResponseFormat::json_object(),
        }
    }

    async fn complete(&self, content: &str) -> Result<String, OpenAiError> {
        let api_key = self
            .settings
            .api_key
            .as_deref()
            .ok_or_else(|| OpenAiError::MissingApiKey(self.settings.api_key_env.clone()))?;

        debug!(
            "Sending {} chars to {} ({})",
            content.len(),
            self.settings.completions_url(),
            self.model
        );
        let response = self
            .client
            .post(self.settings.completions_url())
            .bearer_auth(api_key)
            .json(&self.request(content))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                body: sanitize_error_body(&body),
            });
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| OpenAiError::Parse(e.to_string()))?;
        parsed.into_text().ok_or(OpenAiError::EmptyResponse)
    }
}

#[async_trait]
impl LlmSession for OpenAiSession {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn send(&self, content: &str) -> Result<String, GatewayError> {
        self.complete(content).await.map_err(GatewayError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_request_carries_system_prompt_and_settings() {
        let settings = Arc::new(OpenAiSettings {
            base_url: "http://localhost".to_string(),
            api_key: Some("sk-test".to_string()),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: Some(0.1),
            max_tokens: Some(4096),
            request_timeout: Duration::from_secs(5),
        });
        let session = OpenAiSession::new(
            reqwest::Client::new(),
            settings,
            Model::Gpt4o,
            "You are a QA Engineer".to_string(),
        );

        let request = session.request("review this");
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.messages[0], ChatMessage::system("You are a QA Engineer"));
        assert_eq!(request.messages[1], ChatMessage::user("review this"));
        assert_eq!(request.max_tokens, Some(4096));
        assert_eq!(session.model(), &Model::Gpt4o);
    }
}
