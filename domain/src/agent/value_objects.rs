//! Severity and stance value objects

use serde::{Deserialize, Serialize};

/// Severity of a review finding
///
/// Ordered so that `Critical` is the greatest value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, most severe first
    pub const DESCENDING: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
            Severity::Info => "info",
        }
    }

    /// Upper-case label used in comment badges
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
            Severity::Info => "INFO",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Critical => "🔴",
            Severity::High => "🟠",
            Severity::Medium => "🟡",
            Severity::Low => "🟢",
            Severity::Info => "🔵",
        }
    }

    /// Blocks auto-approval when present
    pub fn is_blocking(&self) -> bool {
        *self >= Severity::High
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// Review outcome proposed by an agent or decided by the synthesizer
///
/// Ordered by conservativeness: `RequestChanges` > `Comment` > `Approve`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stance {
    Approve,
    Comment,
    RequestChanges,
}

impl Stance {
    /// Wire form, identical to the code host's review event names
    pub fn as_str(&self) -> &'static str {
        match self {
            Stance::Approve => "APPROVE",
            Stance::Comment => "COMMENT",
            Stance::RequestChanges => "REQUEST_CHANGES",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stance::Approve => "Approve",
            Stance::Comment => "Comment",
            Stance::RequestChanges => "Request changes",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Stance::Approve => "✅",
            Stance::Comment => "💬",
            Stance::RequestChanges => "❌",
        }
    }
}

impl std::fmt::Display for Stance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Stance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "APPROVE" => Ok(Stance::Approve),
            "COMMENT" => Ok(Stance::Comment),
            "REQUEST_CHANGES" => Ok(Stance::RequestChanges),
            _ => Err(format!("unknown stance '{}'", s.trim())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Critical > Severity::High);
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Low > Severity::Info);
        assert!(Severity::High.is_blocking());
        assert!(!Severity::Medium.is_blocking());
    }

    #[test]
    fn test_severity_icons() {
        let icons: Vec<_> = Severity::DESCENDING.iter().map(|s| s.icon()).collect();
        assert_eq!(icons, vec!["🔴", "🟠", "🟡", "🟢", "🔵"]);
    }

    #[test]
    fn test_parse_severity_case_insensitive() {
        assert_eq!("CRITICAL".parse::<Severity>().ok(), Some(Severity::Critical));
        assert_eq!(" low ".parse::<Severity>().ok(), Some(Severity::Low));
        assert!("blocker".parse::<Severity>().is_err());
    }

    #[test]
    fn test_stance_conservativeness() {
        assert!(Stance::RequestChanges > Stance::Comment);
        assert!(Stance::Comment > Stance::Approve);
    }

    #[test]
    fn test_parse_stance_variants() {
        assert_eq!("APPROVE".parse::<Stance>().ok(), Some(Stance::Approve));
        assert_eq!(
            "request changes".parse::<Stance>().ok(),
            Some(Stance::RequestChanges)
        );
        assert_eq!(
            "request-changes".parse::<Stance>().ok(),
            Some(Stance::RequestChanges)
        );
        assert!("reject".parse::<Stance>().is_err());
    }

    #[test]
    fn test_stance_serde_wire_form() {
        let json = serde_json::to_string(&Stance::RequestChanges).unwrap();
        assert_eq!(json, "\"REQUEST_CHANGES\"");
    }
}
