//! Review roles and their profiles
//!
//! Roles are data: every specialist is served by the same runner, differing
//! only in the [`RoleProfile`] that shapes its prompt.

use serde::{Deserialize, Serialize};

/// Professional viewpoint of a review agent
///
/// The declaration order is the canonical role order used for tie-breaking
/// and report layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    ProductOwner,
    SeniorEngineer,
    SecurityEngineer,
    #[serde(rename = "devops_engineer")]
    DevOpsEngineer,
    QaEngineer,
    /// Synthesizes the specialist reviews; never part of the aggregate
    #[serde(rename = "tech_lead")]
    TechLeadArbiter,
}

impl AgentRole {
    /// The five specialist roles in canonical order
    pub const SPECIALISTS: [AgentRole; 5] = [
        AgentRole::ProductOwner,
        AgentRole::SeniorEngineer,
        AgentRole::SecurityEngineer,
        AgentRole::DevOpsEngineer,
        AgentRole::QaEngineer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentRole::ProductOwner => "product_owner",
            AgentRole::SeniorEngineer => "senior_engineer",
            AgentRole::SecurityEngineer => "security_engineer",
            AgentRole::DevOpsEngineer => "devops_engineer",
            AgentRole::QaEngineer => "qa_engineer",
            AgentRole::TechLeadArbiter => "tech_lead",
        }
    }

    /// Short agent name used in attributions (e.g. "SecurityEngineer")
    pub fn agent_name(&self) -> &'static str {
        match self {
            AgentRole::ProductOwner => "ProductOwner",
            AgentRole::SeniorEngineer => "SeniorEngineer",
            AgentRole::SecurityEngineer => "SecurityEngineer",
            AgentRole::DevOpsEngineer => "DevOpsEngineer",
            AgentRole::QaEngineer => "QAEngineer",
            AgentRole::TechLeadArbiter => "TechLead",
        }
    }

    /// Job title used in the persona line of the prompt
    pub fn title(&self) -> &'static str {
        match self {
            AgentRole::ProductOwner => "Product Owner",
            AgentRole::SeniorEngineer => "Senior Software Engineer",
            AgentRole::SecurityEngineer => "Security Engineer",
            AgentRole::DevOpsEngineer => "DevOps Engineer",
            AgentRole::QaEngineer => "QA Engineer",
            AgentRole::TechLeadArbiter => "Tech Lead",
        }
    }

    /// Built-in review focus areas
    pub fn default_focus(&self) -> &'static [&'static str] {
        match self {
            AgentRole::ProductOwner => &[
                "PR alignment with linked issues",
                "Acceptance criteria validation",
                "Business value verification",
                "Breaking changes impact",
            ],
            AgentRole::SeniorEngineer => &[
                "Code quality and readability",
                "Architecture and design patterns",
                "Performance implications",
                "Error handling and edge cases",
            ],
            AgentRole::SecurityEngineer => &[
                "Security vulnerabilities (OWASP Top 10)",
                "Authentication/authorization",
                "Input validation",
                "Secrets exposure",
            ],
            AgentRole::DevOpsEngineer => &[
                "CI/CD configuration",
                "Infrastructure as Code",
                "Deployment risks",
                "Monitoring and logging",
            ],
            AgentRole::QaEngineer => &[
                "Test coverage",
                "Test quality",
                "Edge cases",
                "Regression risks",
            ],
            AgentRole::TechLeadArbiter => &[
                "Reconciling disagreement between specialists",
                "Weighing blockers against overall value",
                "Deciding the final review outcome",
            ],
        }
    }

    pub fn is_arbiter(&self) -> bool {
        matches!(self, AgentRole::TechLeadArbiter)
    }
}

impl std::fmt::Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.agent_name())
    }
}

impl std::str::FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect();
        match normalized.as_str() {
            "productowner" | "po" | "product" => Ok(AgentRole::ProductOwner),
            "seniorengineer" | "senior" | "engineer" => Ok(AgentRole::SeniorEngineer),
            "securityengineer" | "security" => Ok(AgentRole::SecurityEngineer),
            "devopsengineer" | "devops" => Ok(AgentRole::DevOpsEngineer),
            "qaengineer" | "qa" => Ok(AgentRole::QaEngineer),
            "techlead" | "techleadarbiter" | "arbiter" => Ok(AgentRole::TechLeadArbiter),
            _ => Err(format!(
                "Unknown role: {}. Valid: product_owner, senior_engineer, security_engineer, devops_engineer, qa_engineer, tech_lead",
                s
            )),
        }
    }
}

/// Everything that distinguishes one review agent from another
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub role: AgentRole,
    /// Attribution name (e.g. "SeniorEngineer")
    pub name: String,
    /// Persona title (e.g. "Senior Software Engineer")
    pub title: String,
    pub focus: Vec<String>,
}

impl RoleProfile {
    /// Built-in profile for a role
    pub fn for_role(role: AgentRole) -> Self {
        Self {
            role,
            name: role.agent_name().to_string(),
            title: role.title().to_string(),
            focus: role.default_focus().iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Profile with arbitrary persona data
    pub fn custom(
        role: AgentRole,
        name: impl Into<String>,
        title: impl Into<String>,
        focus: Vec<String>,
    ) -> Self {
        Self {
            role,
            name: name.into(),
            title: title.into(),
            focus,
        }
    }

    /// Replace the focus areas; an empty list keeps the current ones
    pub fn with_focus(mut self, focus: Vec<String>) -> Self {
        if !focus.is_empty() {
            self.focus = focus;
        }
        self
    }

    pub fn arbiter() -> Self {
        Self::for_role(AgentRole::TechLeadArbiter)
    }

    /// Built-in profiles for all five specialists
    pub fn specialists() -> Vec<Self> {
        AgentRole::SPECIALISTS
            .iter()
            .map(|r| Self::for_role(*r))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_order() {
        let mut roles = vec![
            AgentRole::QaEngineer,
            AgentRole::TechLeadArbiter,
            AgentRole::ProductOwner,
            AgentRole::SecurityEngineer,
        ];
        roles.sort();
        assert_eq!(
            roles,
            vec![
                AgentRole::ProductOwner,
                AgentRole::SecurityEngineer,
                AgentRole::QaEngineer,
                AgentRole::TechLeadArbiter
            ]
        );
    }

    #[test]
    fn test_parse_role() {
        assert_eq!(
            "security_engineer".parse::<AgentRole>().ok(),
            Some(AgentRole::SecurityEngineer)
        );
        assert_eq!(
            "DevOps-Engineer".parse::<AgentRole>().ok(),
            Some(AgentRole::DevOpsEngineer)
        );
        assert_eq!("QAEngineer".parse::<AgentRole>().ok(), Some(AgentRole::QaEngineer));
        assert_eq!("qa".parse::<AgentRole>().ok(), Some(AgentRole::QaEngineer));
        assert!("janitor".parse::<AgentRole>().is_err());
    }

    #[test]
    fn test_roundtrip_as_str() {
        for role in AgentRole::SPECIALISTS {
            assert_eq!(role.as_str().parse::<AgentRole>().ok(), Some(role));
        }
        assert_eq!(
            AgentRole::TechLeadArbiter.as_str().parse::<AgentRole>().ok(),
            Some(AgentRole::TechLeadArbiter)
        );
    }

    #[test]
    fn test_profile_focus_override() {
        let profile = RoleProfile::for_role(AgentRole::QaEngineer);
        assert_eq!(profile.focus.len(), 4);
        assert_eq!(profile.name, "QAEngineer");

        let custom = profile.clone().with_focus(vec!["Flaky tests".to_string()]);
        assert_eq!(custom.focus, vec!["Flaky tests".to_string()]);

        let unchanged = profile.clone().with_focus(Vec::new());
        assert_eq!(unchanged, profile);
    }

    #[test]
    fn test_specialists_exclude_arbiter() {
        let profiles = RoleProfile::specialists();
        assert_eq!(profiles.len(), 5);
        assert!(profiles.iter().all(|p| !p.role.is_arbiter()));
        assert!(RoleProfile::arbiter().role.is_arbiter());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for role in AgentRole::SPECIALISTS {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
        let arbiter: AgentRole = serde_json::from_str("\"tech_lead\"").unwrap();
        assert_eq!(arbiter, AgentRole::TechLeadArbiter);
    }
}
