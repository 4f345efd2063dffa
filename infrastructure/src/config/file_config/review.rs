//! Review configuration from TOML (`[review]` and `[roles.<role>]` sections)

use review_domain::{AgentRole, ConfigIssue, ConfigIssueCode, QuorumRule};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw review configuration from TOML
///
/// # Example
///
/// ```toml
/// [review]
/// agent_timeout_secs = 120
/// review_timeout_secs = 600
/// quorum = "majority"
/// auto_approve = false
/// roles = ["senior_engineer", "security_engineer"]
/// arbiter = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileReviewConfig {
    /// Bound on each model call, in seconds
    pub agent_timeout_secs: u64,
    /// Wall-clock budget of the whole review, in seconds
    pub review_timeout_secs: u64,
    /// Quorum rule (`majority`, `unanimous`, `atleast:N`, `N%`)
    pub quorum: String,
    /// Signal approval when the verdict allows it
    pub auto_approve: bool,
    /// Enabled specialist roles
    pub roles: Vec<String>,
    /// Run the Tech Lead arbiter
    pub arbiter: bool,
}

impl Default for FileReviewConfig {
    fn default() -> Self {
        Self {
            agent_timeout_secs: 180,
            review_timeout_secs: 600,
            quorum: QuorumRule::default().as_config_str(),
            auto_approve: true,
            roles: AgentRole::SPECIALISTS
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
            arbiter: true,
        }
    }
}

impl FileReviewConfig {
    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }

    pub fn review_timeout(&self) -> Duration {
        Duration::from_secs(self.review_timeout_secs)
    }

    /// Parse the quorum rule; an invalid rule falls back to the default.
    pub fn parse_quorum(&self) -> (QuorumRule, Vec<ConfigIssue>) {
        match self.quorum.parse::<QuorumRule>() {
            Ok(rule) => (rule, Vec::new()),
            Err(e) => (
                QuorumRule::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidQuorumRule,
                    format!("review.quorum: '{}': {}", self.quorum, e),
                )],
            ),
        }
    }

    /// Parse the enabled specialists in role order, without duplicates.
    pub fn parse_roles(&self) -> (Vec<AgentRole>, Vec<ConfigIssue>) {
        let mut roles = Vec::new();
        let mut issues = Vec::new();
        for name in &self.roles {
            match name.parse::<AgentRole>() {
                Ok(role) if role.is_arbiter() => issues.push(ConfigIssue::warning(
                    ConfigIssueCode::UnknownRole,
                    format!(
                        "review.roles: '{}' is the arbiter, use review.arbiter instead",
                        name
                    ),
                )),
                Ok(role) => {
                    if !roles.contains(&role) {
                        roles.push(role);
                    }
                }
                Err(e) => issues.push(ConfigIssue::error(
                    ConfigIssueCode::UnknownRole,
                    format!("review.roles: {}", e),
                )),
            }
        }
        if roles.is_empty() && !ConfigIssue::has_errors(&issues) {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::NoRolesEnabled,
                "review.roles: at least one specialist role must be enabled",
            ));
        }
        roles.sort();
        (roles, issues)
    }

    pub fn validate_timeouts(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.agent_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "review.agent_timeout_secs must be greater than zero",
            ));
        }
        if self.review_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "review.review_timeout_secs must be greater than zero",
            ));
        }
        if self.agent_timeout_secs > self.review_timeout_secs && self.review_timeout_secs > 0 {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::AgentTimeoutExceedsBudget,
                format!(
                    "review.agent_timeout_secs ({}) exceeds review.review_timeout_secs ({}); a slow agent will time out the whole review",
                    self.agent_timeout_secs, self.review_timeout_secs
                ),
            ));
        }
        issues
    }
}

/// Per-role persona overrides (`[roles.<role>]`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRoleConfig {
    /// Replaces the built-in focus areas when non-empty
    pub focus: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileReviewConfig::default();
        assert_eq!(config.agent_timeout(), Duration::from_secs(180));
        assert_eq!(config.review_timeout(), Duration::from_secs(600));
        assert_eq!(config.parse_quorum(), (QuorumRule::AtLeast(1), vec![]));
        let (roles, issues) = config.parse_roles();
        assert_eq!(roles, AgentRole::SPECIALISTS.to_vec());
        assert!(issues.is_empty());
        assert!(config.validate_timeouts().is_empty());
    }

    #[test]
    fn test_invalid_quorum() {
        let config = FileReviewConfig {
            quorum: "atleast:0".to_string(),
            ..Default::default()
        };
        let (rule, issues) = config.parse_quorum();
        assert_eq!(rule, QuorumRule::default());
        assert_eq!(issues[0].code, ConfigIssueCode::InvalidQuorumRule);
    }

    #[test]
    fn test_roles_are_sorted_and_deduplicated() {
        let config = FileReviewConfig {
            roles: vec![
                "qa".to_string(),
                "security".to_string(),
                "qa_engineer".to_string(),
            ],
            ..Default::default()
        };
        let (roles, issues) = config.parse_roles();
        assert_eq!(
            roles,
            vec![AgentRole::SecurityEngineer, AgentRole::QaEngineer]
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn test_no_roles_enabled() {
        let config = FileReviewConfig {
            roles: vec![],
            ..Default::default()
        };
        let (_, issues) = config.parse_roles();
        assert_eq!(issues[0].code, ConfigIssueCode::NoRolesEnabled);
    }

    #[test]
    fn test_arbiter_in_roles_is_warning() {
        let config = FileReviewConfig {
            roles: vec!["tech_lead".to_string(), "devops".to_string()],
            ..Default::default()
        };
        let (roles, issues) = config.parse_roles();
        assert_eq!(roles, vec![AgentRole::DevOpsEngineer]);
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn test_timeout_issues() {
        let config = FileReviewConfig {
            agent_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.validate_timeouts()[0].code, ConfigIssueCode::ZeroTimeout);

        let config = FileReviewConfig {
            agent_timeout_secs: 900,
            review_timeout_secs: 600,
            ..Default::default()
        };
        let issues = config.validate_timeouts();
        assert_eq!(issues[0].code, ConfigIssueCode::AgentTimeoutExceedsBudget);
        assert!(!ConfigIssue::has_errors(&issues));
    }
}
