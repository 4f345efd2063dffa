//! Local diff source
//!
//! Reviews a diff read from a file (or stdin with `-`) instead of fetching
//! it from the host. Pull request metadata comes from the caller.

use async_trait::async_trait;
use review_application::{DiffContent, PullRequestSource, SourceError};
use review_domain::{PullRequest, RepoId};
use std::path::{Path, PathBuf};
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Path value meaning "read from stdin"
pub const STDIN_PATH: &str = "-";

/// Pull request source backed by a local unified diff
pub struct LocalDiffSource {
    path: PathBuf,
    title: Option<String>,
    head_sha: Option<String>,
}

impl LocalDiffSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            title: None,
            head_sha: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_head_sha(mut self, sha: impl Into<String>) -> Self {
        self.head_sha = Some(sha.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn reads_stdin(&self) -> bool {
        self.path.as_os_str() == STDIN_PATH
    }

    async fn read(&self) -> Result<String, SourceError> {
        if self.reads_stdin() {
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .map_err(|e| SourceError::Io(format!("stdin: {}", e)))?;
            return Ok(text);
        }
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| SourceError::Io(format!("{}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl PullRequestSource for LocalDiffSource {
    async fn fetch_pull_request(
        &self,
        repo: &RepoId,
        number: u64,
    ) -> Result<PullRequest, SourceError> {
        let title = self.title.clone().unwrap_or_else(|| {
            if self.reads_stdin() {
                "Local diff (stdin)".to_string()
            } else {
                format!("Local diff ({})", self.path.display())
            }
        });
        let mut pr = PullRequest::new(repo.clone(), number).with_title(title);
        if let Some(sha) = &self.head_sha {
            pr = pr.with_head_sha(sha.clone());
        }
        Ok(pr)
    }

    async fn fetch_diff(&self, pr: &PullRequest) -> Result<DiffContent, SourceError> {
        let text = self.read().await?;
        debug!(
            "Read {} bytes of diff for {} from {}",
            text.len(),
            pr.reference(),
            self.path.display()
        );
        Ok(DiffContent::Unified(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIFF: &str = "--- a/a.py\n+++ b/a.py\n@@ -1 +1 @@\n-import sys\n+import os\n";

    #[tokio::test]
    async fn test_reads_diff_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("change.diff");
        std::fs::write(&path, DIFF).unwrap();

        let source = LocalDiffSource::new(&path).with_head_sha("abc123");
        let pr = source
            .fetch_pull_request(&"octo/app".parse().unwrap(), 7)
            .await
            .unwrap();
        assert_eq!(pr.reference(), "octo/app#7");
        assert!(pr.title.starts_with("Local diff ("));
        assert_eq!(pr.head_sha.as_deref(), Some("abc123"));

        let content = source.fetch_diff(&pr).await.unwrap();
        let diff = content.normalize().unwrap();
        assert_eq!(diff.files.len(), 1);
        assert_eq!(diff.files[0].path, "a.py");
    }

    #[tokio::test]
    async fn test_title_override() {
        let source = LocalDiffSource::new("-").with_title("Tidy imports");
        let pr = source
            .fetch_pull_request(&"octo/app".parse().unwrap(), 1)
            .await
            .unwrap();
        assert_eq!(pr.title, "Tidy imports");
        assert!(source.reads_stdin());
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = LocalDiffSource::new(dir.path().join("missing.diff"));
        let pr = PullRequest::new("octo/app".parse().unwrap(), 1);

        let err = source.fetch_diff(&pr).await.unwrap_err();
        assert!(matches!(err, SourceError::Io(msg) if msg.contains("missing.diff")));
    }
}
