//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod github;
mod logging;
mod models;
mod output;
mod provider;
mod review;

pub use github::FileGithubConfig;
pub use logging::FileLoggingConfig;
pub use models::FileModelsConfig;
pub use output::FileOutputConfig;
pub use provider::FileProviderConfig;
pub use review::{FileReviewConfig, FileRoleConfig};

use super::error::ConfigError;
use review_application::ReviewParams;
use review_domain::{AgentRole, ConfigIssue, ConfigIssueCode, IssueLevel, RoleProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Role-based model selection
    pub models: FileModelsConfig,
    /// Review orchestration settings
    pub review: FileReviewConfig,
    /// Persona overrides keyed by role name
    pub roles: BTreeMap<String, FileRoleConfig>,
    /// Model provider endpoint
    pub provider: FileProviderConfig,
    /// GitHub settings
    pub github: FileGithubConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Diagnostic output settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    ///
    /// This is the single entry point for config validation. It checks:
    /// 1. Empty model names and unknown roles in `[models]`
    /// 2. The quorum rule, the enabled roles and the timeouts in `[review]`
    /// 3. Unknown roles in `[roles.<role>]`
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        // 1. Models
        issues.extend(self.models.parse_default().1);
        issues.extend(self.models.parse_arbiter().1);
        issues.extend(self.models.parse_roles().1);

        // 2. Review
        issues.extend(self.review.parse_quorum().1);
        issues.extend(self.review.parse_roles().1);
        issues.extend(self.review.validate_timeouts());

        // 3. Persona overrides
        for name in self.roles.keys() {
            if let Err(e) = name.parse::<AgentRole>() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownRole,
                    format!("roles.{}: {}", name, e),
                ));
            }
        }

        issues
    }

    /// Validate and split the issues: errors fail, warnings are returned.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigError> {
        let (errors, warnings): (Vec<_>, Vec<_>) = self
            .validate()
            .into_iter()
            .partition(|issue| issue.level == IssueLevel::Error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }

    /// Build the parameters of a review run.
    ///
    /// Invalid entries are skipped; call [`FileConfig::validate`] first to
    /// surface them.
    pub fn review_params(&self) -> ReviewParams {
        let (quorum, _) = self.review.parse_quorum();
        let (roles, _) = self.review.parse_roles();
        let (role_models, _) = self.models.parse_roles();

        let mut params = ReviewParams::default()
            .with_specialists(roles.into_iter().map(|r| self.profile(r)).collect())
            .with_arbiter(
                self.review
                    .arbiter
                    .then(|| self.profile(AgentRole::TechLeadArbiter)),
            )
            .with_agent_timeout(self.review.agent_timeout())
            .with_review_timeout(self.review.review_timeout())
            .with_quorum(quorum)
            .with_auto_approve(self.review.auto_approve)
            .with_post_reaction(self.github.post_reaction);

        if let (Some(model), _) = self.models.parse_default() {
            params = params.with_default_model(model);
        }
        if let (Some(model), _) = self.models.parse_arbiter() {
            params = params.with_arbiter_model(model);
        }
        for (role, model) in role_models {
            params = params.with_role_model(role, model);
        }
        params
    }

    /// Built-in profile for a role with configured focus overrides applied
    fn profile(&self, role: AgentRole) -> RoleProfile {
        let focus = self
            .roles
            .iter()
            .find(|(name, _)| name.parse::<AgentRole>() == Ok(role))
            .map(|(_, config)| config.focus.clone())
            .unwrap_or_default();
        RoleProfile::for_role(role).with_focus(focus)
    }
}
