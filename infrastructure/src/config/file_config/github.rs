//! GitHub configuration from TOML (`[github]` section)

use serde::{Deserialize, Serialize};

/// GitHub REST API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGithubConfig {
    pub api_url: String,
    /// Environment variable holding the token
    pub token_env: String,
    /// Inline token (takes precedence over `token_env`)
    pub token: Option<String>,
    /// Add a reaction matching the review score
    pub post_reaction: bool,
}

impl Default for FileGithubConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            token_env: "GITHUB_TOKEN".to_string(),
            token: None,
            post_reaction: true,
        }
    }
}

impl FileGithubConfig {
    /// Resolve the token from the inline value or the environment
    pub fn resolve_token(&self) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var(&self.token_env).ok())
            .filter(|t| !t.trim().is_empty())
    }
}
