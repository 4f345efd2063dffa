//! Review findings

use super::role::AgentRole;
use super::value_objects::Severity;
use serde::{Deserialize, Serialize};

/// Category used when an agent omits one
pub const DEFAULT_CATEGORY: &str = "general";

/// One issue raised by a review agent
///
/// A finding without `file` is summary-level. `line` refers to the new-file
/// line number of the diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    pub severity: Severity,
    pub category: String,
    pub message: String,
    /// Replacement text for the anchored line(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            file: None,
            line: None,
            severity,
            category: DEFAULT_CATEGORY.to_string(),
            message: message.into(),
            suggestion: None,
            current_code: None,
            recommendation: None,
        }
    }

    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// `path:line`, `path`, or `-` for summary-level findings
    pub fn location(&self) -> String {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("{}:{}", file, line),
            (Some(file), None) => file.clone(),
            _ => "-".to_string(),
        }
    }
}

/// A finding together with the role that raised it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributedFinding {
    pub role: AgentRole,
    #[serde(flatten)]
    pub finding: Finding,
}

impl AttributedFinding {
    pub fn new(role: AgentRole, finding: Finding) -> Self {
        Self { role, finding }
    }

    pub fn severity(&self) -> Severity {
        self.finding.severity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finding_builder_defaults() {
        let finding = Finding::new(Severity::High, "SQL injection");
        assert_eq!(finding.category, "general");
        assert_eq!(finding.location(), "-");

        let located = finding.at("src/db.py", 42).with_category("security");
        assert_eq!(located.location(), "src/db.py:42");
        assert_eq!(located.category, "security");
    }

    #[test]
    fn test_attributed_finding_serializes_flat() {
        let attributed = AttributedFinding::new(
            AgentRole::SecurityEngineer,
            Finding::new(Severity::Critical, "Hardcoded secret").in_file("config.py"),
        );
        let value = serde_json::to_value(&attributed).unwrap();
        assert_eq!(value["role"], "security_engineer");
        assert_eq!(value["severity"], "critical");
        assert_eq!(value["file"], "config.py");
        assert!(value.get("line").is_none());
    }
}
