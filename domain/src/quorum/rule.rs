//! Quorum rules for review runs
//!
//! A run only produces a verdict when enough of the invoked specialist agents
//! returned a usable result.

use serde::{Deserialize, Serialize};

/// Rule deciding whether enough specialists were usable
///
/// - `AtLeast(n)`: at least n usable results (default `AtLeast(1)`)
/// - `Majority`: more than half of the invoked specialists
/// - `Unanimous`: every invoked specialist
/// - `Percentage(p)`: at least p% of the invoked specialists
///
/// # Example
///
/// ```
/// use review_domain::quorum::QuorumRule;
///
/// let rule = QuorumRule::Majority;
/// assert!(rule.is_satisfied(3, 5));
/// assert!(!rule.is_satisfied(2, 5));
///
/// assert!(QuorumRule::default().is_satisfied(1, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum QuorumRule {
    Majority,
    Unanimous,
    AtLeast(usize),
    /// 0-100
    Percentage(u8),
}

impl Default for QuorumRule {
    fn default() -> Self {
        QuorumRule::AtLeast(1)
    }
}

impl QuorumRule {
    /// Check the rule against `usable` results out of `invoked` agents
    pub fn is_satisfied(&self, usable: usize, invoked: usize) -> bool {
        if invoked == 0 || usable == 0 {
            return false;
        }

        match self {
            QuorumRule::Majority => usable > invoked / 2,
            QuorumRule::Unanimous => usable == invoked,
            QuorumRule::AtLeast(n) => usable >= *n,
            QuorumRule::Percentage(p) => usable >= self.min_usable_needed(invoked).max(1),
        }
    }

    pub fn description(&self) -> String {
        match self {
            QuorumRule::Majority => "majority (more than half usable)".to_string(),
            QuorumRule::Unanimous => "unanimous (every agent usable)".to_string(),
            QuorumRule::AtLeast(n) => format!("at least {} usable", n),
            QuorumRule::Percentage(p) => format!("at least {}% usable", p),
        }
    }

    /// Minimum usable results required for `invoked` agents
    pub fn min_usable_needed(&self, invoked: usize) -> usize {
        match self {
            QuorumRule::Majority => invoked / 2 + 1,
            QuorumRule::Unanimous => invoked,
            QuorumRule::AtLeast(n) => *n,
            QuorumRule::Percentage(p) => (invoked as f64 * (*p as f64 / 100.0)).ceil() as usize,
        }
    }

    /// Canonical string form accepted by `FromStr`
    pub fn as_config_str(&self) -> String {
        match self {
            QuorumRule::Majority => "majority".to_string(),
            QuorumRule::Unanimous => "unanimous".to_string(),
            QuorumRule::AtLeast(n) => format!("atleast:{}", n),
            QuorumRule::Percentage(p) => format!("{}%", p),
        }
    }
}

impl std::fmt::Display for QuorumRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::str::FromStr for QuorumRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "majority" => Ok(QuorumRule::Majority),
            "unanimous" | "all" => Ok(QuorumRule::Unanimous),
            s if s.starts_with("atleast:") || s.starts_with("at_least:") => {
                let n: usize = s
                    .split(':')
                    .nth(1)
                    .ok_or("Missing number after atleast:")?
                    .parse()
                    .map_err(|_| "Invalid number for atleast")?;
                if n == 0 {
                    return Err("atleast:N requires N >= 1".to_string());
                }
                Ok(QuorumRule::AtLeast(n))
            }
            s if s.starts_with("percentage:") || s.ends_with('%') => {
                let num_str = s.trim_start_matches("percentage:").trim_end_matches('%');
                let p: u8 = num_str.parse().map_err(|_| "Invalid percentage")?;
                if p > 100 {
                    return Err(format!("Percentage {} exceeds 100", p));
                }
                Ok(QuorumRule::Percentage(p))
            }
            _ => Err(format!(
                "Unknown quorum rule: {}. Valid: majority, unanimous, atleast:N, percentage:N or N%",
                s
            )),
        }
    }
}

impl TryFrom<String> for QuorumRule {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QuorumRule> for String {
    fn from(value: QuorumRule) -> Self {
        value.as_config_str()
    }
}
