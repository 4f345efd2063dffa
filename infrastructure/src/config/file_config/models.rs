//! Role-based model configuration from TOML (`[models]` section)

use review_domain::{AgentRole, ConfigIssue, ConfigIssueCode, Model};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Role-based model configuration from TOML
///
/// # Example
///
/// ```toml
/// [models]
/// default = "gpt-4.1"              # every agent without an override
/// arbiter = "claude-opus-4.5"      # Tech Lead
///
/// [models.roles]
/// security_engineer = "gpt-4o"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Model for every agent without an override
    pub default: Option<String>,
    /// Model for the arbiter
    pub arbiter: Option<String>,
    /// Per-role overrides keyed by role name
    pub roles: BTreeMap<String, String>,
}

impl FileModelsConfig {
    /// Parse a single model string, collecting issues for empty names.
    fn parse_single_model(field: &str, value: Option<&String>) -> (Option<Model>, Vec<ConfigIssue>) {
        match value {
            None => (None, Vec::new()),
            Some(s) if s.trim().is_empty() => (
                None,
                vec![ConfigIssue::error(
                    ConfigIssueCode::EmptyModelName,
                    format!("models.{}: model name cannot be empty", field),
                )],
            ),
            Some(s) => {
                // Model::from_str is infallible; unknown names become Custom(...)
                let Ok(model) = s.trim().parse::<Model>();
                (Some(model), Vec::new())
            }
        }
    }

    pub fn parse_default(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("default", self.default.as_ref())
    }

    pub fn parse_arbiter(&self) -> (Option<Model>, Vec<ConfigIssue>) {
        Self::parse_single_model("arbiter", self.arbiter.as_ref())
    }

    /// Parse per-role overrides, collecting issues for unknown roles and empty names.
    pub fn parse_roles(&self) -> (BTreeMap<AgentRole, Model>, Vec<ConfigIssue>) {
        let mut models = BTreeMap::new();
        let mut issues = Vec::new();
        for (name, model) in &self.roles {
            let field = format!("roles.{}", name);
            let role = match name.parse::<AgentRole>() {
                Ok(role) => role,
                Err(e) => {
                    issues.push(ConfigIssue::error(
                        ConfigIssueCode::UnknownRole,
                        format!("models.{}: {}", field, e),
                    ));
                    continue;
                }
            };
            let (parsed, model_issues) = Self::parse_single_model(&field, Some(model));
            issues.extend(model_issues);
            if let Some(parsed) = parsed {
                models.insert(role, parsed);
            }
        }
        (models, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_models() {
        let config: FileModelsConfig = toml::from_str(
            r#"
default = "gpt-4.1"
arbiter = "claude-opus-4.5"

[roles]
security_engineer = "gpt-4o"
qa = "my-local-model"
"#,
        )
        .unwrap();

        assert_eq!(config.parse_default(), (Some(Model::Gpt41), vec![]));
        assert_eq!(config.parse_arbiter().0, Some(Model::ClaudeOpus45));
        let (roles, issues) = config.parse_roles();
        assert!(issues.is_empty());
        assert_eq!(roles.get(&AgentRole::SecurityEngineer), Some(&Model::Gpt4o));
        assert_eq!(
            roles.get(&AgentRole::QaEngineer),
            Some(&Model::Custom("my-local-model".to_string()))
        );
    }

    #[test]
    fn test_empty_model_name_is_error() {
        let config = FileModelsConfig {
            default: Some("  ".to_string()),
            ..Default::default()
        };
        let (model, issues) = config.parse_default();
        assert!(model.is_none());
        assert_eq!(issues[0].code, ConfigIssueCode::EmptyModelName);
    }

    #[test]
    fn test_unknown_role_is_error() {
        let mut config = FileModelsConfig::default();
        config
            .roles
            .insert("janitor".to_string(), "gpt-4.1".to_string());
        let (roles, issues) = config.parse_roles();
        assert!(roles.is_empty());
        assert_eq!(issues[0].code, ConfigIssueCode::UnknownRole);
    }
}
