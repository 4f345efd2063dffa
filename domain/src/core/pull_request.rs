//! Pull request identity and metadata value objects

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Repository identifier in `owner/name` form (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepoId {
    owner: String,
    name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Result<Self, DomainError> {
        let owner = owner.into();
        let name = name.into();
        let valid = |s: &str| {
            !s.is_empty()
                && s
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        };
        if !valid(&owner) || !valid(&name) {
            return Err(DomainError::InvalidRepository(format!("{}/{}", owner, name)));
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for RepoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches(".git");
        // Accept full GitHub URLs as well as owner/name
        let trimmed = trimmed
            .strip_prefix("https://github.com/")
            .unwrap_or(trimmed);
        match trimmed.split_once('/') {
            Some((owner, name)) if !name.contains('/') => Self::new(owner, name),
            _ => Err(DomainError::InvalidRepository(s.to_string())),
        }
    }
}

impl TryFrom<String> for RepoId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepoId> for String {
    fn from(value: RepoId) -> Self {
        value.to_string()
    }
}

/// Metadata of the pull request under review
///
/// Supplied by the PR source collaborator. Read-only for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PullRequest {
    pub repo: RepoId,
    pub number: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub author: Option<String>,
    pub base_ref: String,
    pub head_ref: String,
    /// Commit the inline comments are anchored to
    #[serde(default)]
    pub head_sha: Option<String>,
}

impl PullRequest {
    pub fn new(repo: RepoId, number: u64) -> Self {
        Self {
            repo,
            number,
            title: String::new(),
            body: String::new(),
            author: None,
            base_ref: "main".to_string(),
            head_ref: "HEAD".to_string(),
            head_sha: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_refs(mut self, base: impl Into<String>, head: impl Into<String>) -> Self {
        self.base_ref = base.into();
        self.head_ref = head.into();
        self
    }

    pub fn with_head_sha(mut self, sha: impl Into<String>) -> Self {
        self.head_sha = Some(sha.into());
        self
    }

    /// Short reference, e.g. `octo/app#42`
    pub fn reference(&self) -> String {
        format!("{}#{}", self.repo, self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_id() {
        let repo: RepoId = "octo-org/my_app.rs".parse().unwrap();
        assert_eq!(repo.owner(), "octo-org");
        assert_eq!(repo.name(), "my_app.rs");
        assert_eq!(repo.to_string(), "octo-org/my_app.rs");
    }

    #[test]
    fn test_parse_repo_id_from_url() {
        let repo: RepoId = "https://github.com/octo/app.git".parse().unwrap();
        assert_eq!(repo.to_string(), "octo/app");
    }

    #[test]
    fn test_invalid_repo_ids() {
        assert!("octo".parse::<RepoId>().is_err());
        assert!("octo/app/extra".parse::<RepoId>().is_err());
        assert!("/app".parse::<RepoId>().is_err());
        assert!("octo/ap p".parse::<RepoId>().is_err());
    }

    #[test]
    fn test_pull_request_reference() {
        let pr = PullRequest::new("octo/app".parse().unwrap(), 42)
            .with_refs("main", "feature/login")
            .with_head_sha("abc123");
        assert_eq!(pr.reference(), "octo/app#42");
        assert_eq!(pr.head_sha.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_repo_id_serde() {
        let json = serde_json::to_string(&RepoId::new("octo", "app").unwrap()).unwrap();
        assert_eq!(json, "\"octo/app\"");
        assert!(serde_json::from_str::<RepoId>("\"nope\"").is_err());
    }
}
