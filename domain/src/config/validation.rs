//! Structured configuration issues
//!
//! Validation never fails fast: every problem is collected so that the user
//! sees all of them at once.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueLevel {
    /// Fatal: the review cannot run with this configuration.
    Error,
    /// Non-fatal: the review runs but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    EmptyModelName,
    UnknownRole,
    InvalidQuorumRule,
    ZeroTimeout,
    /// Per-agent timeout is longer than the whole review budget
    AgentTimeoutExceedsBudget,
    /// Every specialist role is disabled
    NoRolesEnabled,
    InvalidOutputFormat,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub level: IssueLevel,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            level: IssueLevel::Warning,
            code,
            message: message.into(),
        }
    }

    /// Check whether any issue is fatal
    pub fn has_errors(issues: &[ConfigIssue]) -> bool {
        issues.iter().any(|i| i.level == IssueLevel::Error)
    }
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = match self.level {
            IssueLevel::Error => "error",
            IssueLevel::Warning => "warning",
        };
        write!(f, "{}: {}", level, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_errors_returns_true_for_errors() {
        let issues = vec![
            ConfigIssue::warning(ConfigIssueCode::NoRolesEnabled, "w"),
            ConfigIssue::error(ConfigIssueCode::ZeroTimeout, "e"),
        ];
        assert!(ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn has_errors_returns_false_for_warnings_only() {
        let issues = vec![ConfigIssue::warning(
            ConfigIssueCode::AgentTimeoutExceedsBudget,
            "w",
        )];
        assert!(!ConfigIssue::has_errors(&issues));
    }

    #[test]
    fn display_includes_level() {
        let issue = ConfigIssue::error(ConfigIssueCode::EmptyModelName, "models.default is empty");
        assert_eq!(issue.to_string(), "error: models.default is empty");
    }
}
