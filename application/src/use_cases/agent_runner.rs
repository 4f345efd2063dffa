//! Agent runner
//!
//! One generic runner serves every role: the [`RoleProfile`] decides the
//! persona, the runner builds the prompts, calls the model once and turns
//! whatever comes back into an [`AgentResult`]. It never returns an error;
//! every failure becomes a failed result carrying its reason.

use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use review_domain::{
    AgentResult, Diff, Model, PromptTemplate, PullRequest, RoleProfile, parse_agent_response,
};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Longest raw response excerpt kept in the transcript of a failed agent
const RESPONSE_EXCERPT_CHARS: usize = 2000;

/// Everything one agent invocation needs, owned so it can move into a task
#[derive(Debug, Clone)]
pub struct AgentTask {
    pub profile: RoleProfile,
    pub model: Model,
    pub pr: Arc<PullRequest>,
    pub diff: Arc<Diff>,
    /// Extra context appended to the user prompt (the arbiter's view of the specialists)
    pub context: Option<String>,
}

impl AgentTask {
    pub fn new(profile: RoleProfile, model: Model, pr: Arc<PullRequest>, diff: Arc<Diff>) -> Self {
        Self {
            profile,
            model,
            pr,
            diff,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Runs a single review agent against a model
pub struct AgentRunner<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    timeout: Option<Duration>,
    logger: Arc<dyn TranscriptLogger>,
}

impl<G: LlmGateway + 'static> Clone for AgentRunner<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            timeout: self.timeout,
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<G: LlmGateway + 'static> AgentRunner<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            timeout: None,
            logger: Arc::new(NoTranscriptLogger),
        }
    }

    /// Bound each model call; exceeding it fails this agent only
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run the agent. Always yields a result for the task's role.
    pub async fn run(&self, task: AgentTask) -> AgentResult {
        let role = task.profile.role;
        let started = Instant::now();

        let system_prompt = if role.is_arbiter() {
            PromptTemplate::arbiter_system(&task.profile)
        } else {
            PromptTemplate::specialist_system(&task.profile)
        };
        let user_prompt =
            PromptTemplate::review_prompt(&task.pr, &task.diff, task.context.as_deref());

        self.logger.log(TranscriptEvent::new(
            "agent_request",
            json!({
                "role": role.as_str(),
                "model": task.model.to_string(),
                "system_prompt": system_prompt,
                "prompt": user_prompt,
            }),
        ));
        info!("Agent {} reviewing with {}", role.agent_name(), task.model);

        let outcome = self
            .invoke(&task.model, &system_prompt, &user_prompt)
            .await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let response = match outcome {
            Ok(response) => response,
            Err(reason) => return self.fail(&task, reason, None, elapsed_ms),
        };

        match parse_agent_response(&response) {
            Ok(review) => {
                debug!(
                    "Agent {} parsed: score={}, stance={}, {} findings",
                    role.agent_name(),
                    review.score,
                    review.stance,
                    review.findings.len()
                );
                let result = AgentResult::success(role, review)
                    .with_model(task.model.clone())
                    .with_elapsed_ms(elapsed_ms);
                self.logger.log(TranscriptEvent::new(
                    "agent_response",
                    json!({
                        "role": role.as_str(),
                        "model": task.model.to_string(),
                        "elapsed_ms": elapsed_ms,
                        "response": response,
                        "score": result.score,
                        "stance": result.stance,
                        "findings": result.findings.len(),
                    }),
                ));
                info!(
                    "Agent {} finished in {}ms",
                    role.agent_name(),
                    elapsed_ms
                );
                result
            }
            Err(e) => self.fail(
                &task,
                format!("invalid response: {}", e),
                Some(response.as_str()),
                elapsed_ms,
            ),
        }
    }

    async fn invoke(
        &self,
        model: &Model,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, String> {
        let call = async {
            let session = self
                .gateway
                .create_session_with_system_prompt(model, system_prompt)
                .await?;
            session.send(user_prompt).await
        };

        let result: Result<String, GatewayError> = match self.timeout {
            Some(timeout) => match tokio::time::timeout(timeout, call).await {
                Ok(r) => r,
                Err(_) => {
                    return Err(format!(
                        "model call timed out after {}s",
                        timeout.as_secs_f64()
                    ));
                }
            },
            None => call.await,
        };
        result.map_err(|e| format!("model error: {}", e))
    }

    fn fail(
        &self,
        task: &AgentTask,
        reason: String,
        response: Option<&str>,
        elapsed_ms: u64,
    ) -> AgentResult {
        let role = task.profile.role;
        warn!("Agent {} failed: {}", role.agent_name(), reason);
        self.logger.log(TranscriptEvent::new(
            "agent_failed",
            json!({
                "role": role.as_str(),
                "model": task.model.to_string(),
                "elapsed_ms": elapsed_ms,
                "reason": reason,
                "response": response.map(|r| excerpt(r, RESPONSE_EXCERPT_CHARS)),
            }),
        ));
        AgentResult::failure(role, reason)
            .with_model(task.model.clone())
            .with_elapsed_ms(elapsed_ms)
    }
}

fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
