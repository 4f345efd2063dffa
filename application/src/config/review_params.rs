//! Review parameters: what a review run executes.
//!
//! [`ReviewParams`] groups the static parameters of
//! [`RunReviewUseCase`](crate::use_cases::run_review::RunReviewUseCase):
//! the agents, their models, the time budgets and the decision policy.

use review_domain::{AgentRole, Model, PayloadOptions, QuorumRule, RoleProfile, SynthesisPolicy};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Review run parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewParams {
    /// Specialists to invoke, in role order.
    pub specialists: Vec<RoleProfile>,
    /// Arbiter profile; `None` skips the arbiter phase.
    pub arbiter: Option<RoleProfile>,
    /// Model for every agent without an override.
    pub default_model: Model,
    /// Model for the arbiter, falls back to `default_model`.
    pub arbiter_model: Option<Model>,
    /// Per-role model overrides.
    pub role_models: BTreeMap<AgentRole, Model>,
    /// Bound on each individual model call.
    pub agent_timeout: Duration,
    /// Wall-clock budget of the whole orchestration.
    pub review_timeout: Duration,
    pub quorum: QuorumRule,
    pub auto_approve: bool,
    /// Attach a score reaction to the payload.
    pub post_reaction: bool,
}

impl Default for ReviewParams {
    fn default() -> Self {
        Self {
            specialists: RoleProfile::specialists(),
            arbiter: Some(RoleProfile::arbiter()),
            default_model: Model::default(),
            arbiter_model: None,
            role_models: BTreeMap::new(),
            agent_timeout: Duration::from_secs(180),
            review_timeout: Duration::from_secs(600),
            quorum: QuorumRule::default(),
            auto_approve: true,
            post_reaction: true,
        }
    }
}

impl ReviewParams {
    // ==================== Builder Methods ====================

    /// Set the specialists; a role listed twice keeps its first profile.
    pub fn with_specialists(mut self, specialists: Vec<RoleProfile>) -> Self {
        let mut unique: Vec<RoleProfile> = Vec::with_capacity(specialists.len());
        for profile in specialists {
            if !unique.iter().any(|p| p.role == profile.role) {
                unique.push(profile);
            }
        }
        self.specialists = unique;
        self
    }

    pub fn with_arbiter(mut self, arbiter: Option<RoleProfile>) -> Self {
        self.arbiter = arbiter;
        self
    }

    pub fn with_default_model(mut self, model: Model) -> Self {
        self.default_model = model;
        self
    }

    pub fn with_arbiter_model(mut self, model: Model) -> Self {
        self.arbiter_model = Some(model);
        self
    }

    pub fn with_role_model(mut self, role: AgentRole, model: Model) -> Self {
        self.role_models.insert(role, model);
        self
    }

    pub fn with_agent_timeout(mut self, timeout: Duration) -> Self {
        self.agent_timeout = timeout;
        self
    }

    pub fn with_review_timeout(mut self, timeout: Duration) -> Self {
        self.review_timeout = timeout;
        self
    }

    pub fn with_quorum(mut self, quorum: QuorumRule) -> Self {
        self.quorum = quorum;
        self
    }

    pub fn with_auto_approve(mut self, enabled: bool) -> Self {
        self.auto_approve = enabled;
        self
    }

    pub fn with_post_reaction(mut self, enabled: bool) -> Self {
        self.post_reaction = enabled;
        self
    }

    // ==================== Derived Values ====================

    /// Model serving the given role
    pub fn model_for(&self, role: AgentRole) -> Model {
        if let Some(model) = self.role_models.get(&role) {
            return model.clone();
        }
        if role.is_arbiter()
            && let Some(model) = &self.arbiter_model
        {
            return model.clone();
        }
        self.default_model.clone()
    }

    pub fn synthesis_policy(&self) -> SynthesisPolicy {
        SynthesisPolicy {
            quorum: self.quorum,
            auto_approve: self.auto_approve,
        }
    }

    pub fn payload_options(&self) -> PayloadOptions {
        PayloadOptions {
            reaction: self.post_reaction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ReviewParams::default();
        assert_eq!(params.specialists.len(), 5);
        assert_eq!(
            params.arbiter.as_ref().map(|p| p.role),
            Some(AgentRole::TechLeadArbiter)
        );
        assert_eq!(params.agent_timeout, Duration::from_secs(180));
        assert_eq!(params.review_timeout, Duration::from_secs(600));
        assert_eq!(params.quorum, QuorumRule::AtLeast(1));
        assert!(params.auto_approve);
    }

    #[test]
    fn test_duplicate_specialists_keep_first_profile() {
        let params = ReviewParams::default().with_specialists(vec![
            RoleProfile::for_role(AgentRole::QaEngineer).with_focus(vec!["Flaky tests".into()]),
            RoleProfile::for_role(AgentRole::SecurityEngineer),
            RoleProfile::for_role(AgentRole::QaEngineer),
        ]);
        let roles: Vec<_> = params.specialists.iter().map(|p| p.role).collect();
        assert_eq!(roles, vec![AgentRole::QaEngineer, AgentRole::SecurityEngineer]);
        assert_eq!(params.specialists[0].focus, vec!["Flaky tests"]);
    }

    #[test]
    fn test_model_resolution() {
        let params = ReviewParams::default()
            .with_default_model(Model::Gpt41)
            .with_arbiter_model(Model::ClaudeOpus45)
            .with_role_model(AgentRole::SecurityEngineer, Model::Gpt4o);

        assert_eq!(params.model_for(AgentRole::ProductOwner), Model::Gpt41);
        assert_eq!(params.model_for(AgentRole::SecurityEngineer), Model::Gpt4o);
        assert_eq!(
            params.model_for(AgentRole::TechLeadArbiter),
            Model::ClaudeOpus45
        );
    }

    #[test]
    fn test_role_override_beats_arbiter_model() {
        let params = ReviewParams::default()
            .with_arbiter_model(Model::Gpt41)
            .with_role_model(AgentRole::TechLeadArbiter, Model::Gpt41Mini);
        assert_eq!(params.model_for(AgentRole::TechLeadArbiter), Model::Gpt41Mini);
    }

    #[test]
    fn test_policy_and_payload_options() {
        let params = ReviewParams::default()
            .with_quorum(QuorumRule::Majority)
            .with_auto_approve(false)
            .with_post_reaction(false);
        let policy = params.synthesis_policy();
        assert_eq!(policy.quorum, QuorumRule::Majority);
        assert!(!policy.auto_approve);
        assert!(!params.payload_options().reaction);
    }
}
