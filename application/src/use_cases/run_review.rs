//! Run Review use case
//!
//! Orchestrates one multi-agent review of a diff:
//!
//! 1. normalize the diff (a malformed diff aborts before any model call)
//! 2. fan the diff out to the specialists concurrently
//! 3. aggregate the specialist results
//! 4. run the arbiter over the aggregate
//! 5. synthesize the verdict, place the findings and build the payload
//!
//! The whole orchestration is bounded by the review budget; when it runs out
//! outstanding agents are abandoned and no verdict is produced.

use super::agent_runner::{AgentRunner, AgentTask};
use crate::config::ReviewParams;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier, ReviewPhase};
use crate::ports::pull_request_source::DiffContent;
use crate::ports::transcript_logger::{NoTranscriptLogger, TranscriptEvent, TranscriptLogger};
use chrono::{DateTime, Utc};
use review_domain::{
    AgentResult, AggregateReport, Diff, DomainError, PromptTemplate, PullRequest, ReviewPayload,
    RoleProfile, Synthesizer, Verdict, map_findings,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that abort a review run. Nothing may be posted after any of them.
#[derive(Error, Debug)]
pub enum RunReviewError {
    #[error("No specialist roles configured")]
    NoRoles,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Review timed out: exceeded the {}s budget", .0.as_secs_f64())]
    ReviewTimeout(Duration),

    #[error("Review cancelled")]
    Cancelled,
}

/// Input for the RunReview use case
#[derive(Debug, Clone)]
pub struct RunReviewInput {
    pub pr: PullRequest,
    pub diff: DiffContent,
    pub params: ReviewParams,
}

impl RunReviewInput {
    pub fn new(pr: PullRequest, diff: impl Into<DiffContent>, params: ReviewParams) -> Self {
        Self {
            pr,
            diff: diff.into(),
            params,
        }
    }
}

/// A completed review: the verdict and what to post
#[derive(Debug, Clone, Serialize)]
pub struct ReviewOutcome {
    pub pr: PullRequest,
    #[serde(skip)]
    pub diff: Diff,
    pub verdict: Verdict,
    pub payload: ReviewPayload,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ReviewOutcome {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Use case for running a multi-agent review
pub struct RunReviewUseCase<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    logger: Arc<dyn TranscriptLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<G: LlmGateway + 'static> RunReviewUseCase<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoTranscriptLogger),
            cancellation_token: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn TranscriptLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunReviewInput) -> Result<ReviewOutcome, RunReviewError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunReviewInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<ReviewOutcome, RunReviewError> {
        let started_at = Utc::now();
        let RunReviewInput { pr, diff, params } = input;

        if params.specialists.is_empty() {
            return Err(RunReviewError::NoRoles);
        }

        let diff = Arc::new(diff.normalize()?);
        let (adds, removes) = diff.stats();
        info!(
            "Reviewing {} ({} files, +{} -{}) with {} specialists",
            pr.reference(),
            diff.files.len(),
            adds,
            removes,
            params.specialists.len()
        );
        let pr = Arc::new(pr);

        let budget = params.review_timeout;
        let orchestration =
            tokio::time::timeout(budget, self.orchestrate(&pr, &diff, &params, progress));
        let finished = match &self.cancellation_token {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        warn!("Review of {} cancelled", pr.reference());
                        return Err(RunReviewError::Cancelled);
                    }
                    r = orchestration => r,
                }
            }
            None => orchestration.await,
        };

        let (verdict, payload) = match finished {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "Review of {} exceeded its {}s budget",
                    pr.reference(),
                    budget.as_secs_f64()
                );
                self.logger.log(TranscriptEvent::new(
                    "review_timeout",
                    json!({ "pr": pr.reference(), "budget_secs": budget.as_secs_f64() }),
                ));
                return Err(RunReviewError::ReviewTimeout(budget));
            }
        };

        Ok(ReviewOutcome {
            pr: Arc::unwrap_or_clone(pr),
            diff: Arc::unwrap_or_clone(diff),
            verdict,
            payload,
            started_at,
            finished_at: Utc::now(),
        })
    }

    async fn orchestrate(
        &self,
        pr: &Arc<PullRequest>,
        diff: &Arc<Diff>,
        params: &ReviewParams,
        progress: &dyn ProgressNotifier,
    ) -> Result<(Verdict, ReviewPayload), RunReviewError> {
        let runner = AgentRunner::new(Arc::clone(&self.gateway))
            .with_timeout(params.agent_timeout)
            .with_logger(Arc::clone(&self.logger));

        // Phase 1: Specialists
        let results = self
            .phase_specialists(&runner, pr, diff, params, progress)
            .await;
        let aggregate = AggregateReport::from_results(results)?;
        info!(
            "{}/{} specialists usable, mean score {:.1}",
            aggregate.usable(),
            aggregate.invoked(),
            aggregate.mean_score
        );

        // Phase 2: Arbiter
        let arbiter = match &params.arbiter {
            Some(profile) => Some(
                self.phase_arbiter(&runner, profile, pr, diff, params, &aggregate, progress)
                    .await,
            ),
            None => {
                debug!("Skipping arbiter phase");
                None
            }
        };

        // Phase 3: Synthesis
        progress.on_phase_start(ReviewPhase::Synthesis, 1);
        let verdict = Synthesizer::new(params.synthesis_policy()).synthesize(aggregate, arbiter)?;
        let plan = map_findings(&verdict.findings, diff);
        let verdict = verdict.with_comment_plan(plan);
        let payload = ReviewPayload::from_verdict(&verdict, params.payload_options());

        info!(
            "Verdict for {}: {} (score {:.1}, basis: {}, auto-approve: {})",
            pr.reference(),
            verdict.stance,
            verdict.score,
            verdict.basis.display_name(),
            verdict.auto_approve
        );
        self.logger.log(TranscriptEvent::new(
            "verdict",
            json!({
                "pr": pr.reference(),
                "stance": verdict.stance,
                "score": verdict.score,
                "basis": verdict.basis,
                "auto_approve": verdict.auto_approve,
                "failed_roles": verdict.failed_roles(),
                "inline_comments": verdict.comment_plan.inline.len(),
                "summary_findings": verdict.comment_plan.summary.len(),
            }),
        ));
        progress.on_phase_complete(ReviewPhase::Synthesis);

        Ok((verdict, payload))
    }

    /// Phase 1: every specialist reviews the diff in parallel
    async fn phase_specialists(
        &self,
        runner: &AgentRunner<G>,
        pr: &Arc<PullRequest>,
        diff: &Arc<Diff>,
        params: &ReviewParams,
        progress: &dyn ProgressNotifier,
    ) -> Vec<AgentResult> {
        info!("Phase 1: Specialist Reviews");
        progress.on_phase_start(ReviewPhase::Specialists, params.specialists.len());

        let mut join_set = JoinSet::new();
        for profile in &params.specialists {
            let runner = runner.clone();
            let task = AgentTask::new(
                profile.clone(),
                params.model_for(profile.role),
                Arc::clone(pr),
                Arc::clone(diff),
            );
            join_set.spawn(async move { runner.run(task).await });
        }

        let mut results: Vec<AgentResult> = Vec::with_capacity(params.specialists.len());
        let mut lost = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(result) => {
                    progress.on_agent_complete(
                        ReviewPhase::Specialists,
                        result.role,
                        !result.is_failed(),
                    );
                    results.push(result);
                }
                Err(e) => {
                    warn!("Specialist task join error: {}", e);
                    lost.push(e.to_string());
                }
            }
        }

        // A task that panicked left no result behind; record its role as failed
        for profile in &params.specialists {
            if results.iter().any(|r| r.role == profile.role) {
                continue;
            }
            let reason = match lost.as_slice() {
                [single] => format!("agent task aborted: {}", single),
                _ => "agent task aborted before producing a result".to_string(),
            };
            warn!("Agent {} failed: {}", profile.role.agent_name(), reason);
            progress.on_agent_complete(ReviewPhase::Specialists, profile.role, false);
            results.push(AgentResult::failure(profile.role, reason));
        }

        results.sort_by_key(|r| r.role);
        progress.on_phase_complete(ReviewPhase::Specialists);
        results
    }

    /// Phase 2: the arbiter reconciles the specialists
    #[allow(clippy::too_many_arguments)]
    async fn phase_arbiter(
        &self,
        runner: &AgentRunner<G>,
        profile: &RoleProfile,
        pr: &Arc<PullRequest>,
        diff: &Arc<Diff>,
        params: &ReviewParams,
        aggregate: &AggregateReport,
        progress: &dyn ProgressNotifier,
    ) -> AgentResult {
        info!("Phase 2: Arbiter Decision");
        progress.on_phase_start(ReviewPhase::Arbiter, 1);

        let role = profile.role;
        let task = AgentTask::new(
            profile.clone(),
            params.model_for(role),
            Arc::clone(pr),
            Arc::clone(diff),
        )
        .with_context(PromptTemplate::arbiter_context(aggregate));

        let mut join_set = JoinSet::new();
        let runner = runner.clone();
        join_set.spawn(async move { runner.run(task).await });

        let result = match join_set.join_next().await {
            Some(Ok(result)) => result,
            Some(Err(e)) => {
                warn!("Arbiter task join error: {}", e);
                AgentResult::failure(role, format!("agent task aborted: {}", e))
            }
            None => AgentResult::failure(role, "agent task aborted before producing a result"),
        };

        progress.on_agent_complete(ReviewPhase::Arbiter, role, !result.is_failed());
        progress.on_phase_complete(ReviewPhase::Arbiter);
        result
    }
}
