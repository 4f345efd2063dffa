//! Score-bucket reactions

use serde::{Deserialize, Serialize};

/// Reaction added to the pull request for the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    #[serde(rename = "hooray")]
    Hooray,
    #[serde(rename = "+1")]
    PlusOne,
    #[serde(rename = "eyes")]
    Eyes,
    #[serde(rename = "confused")]
    Confused,
}

/// Minimum score per reaction, highest bucket first; below all ⇒ `Confused`
pub const REACTION_TABLE: [(f64, Reaction); 3] = [
    (9.0, Reaction::Hooray),
    (7.0, Reaction::PlusOne),
    (4.0, Reaction::Eyes),
];

impl Reaction {
    pub fn for_score(score: f64) -> Self {
        REACTION_TABLE
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, reaction)| *reaction)
            .unwrap_or(Reaction::Confused)
    }

    /// Content string used by the code host's reactions API
    pub fn content(&self) -> &'static str {
        match self {
            Reaction::Hooray => "hooray",
            Reaction::PlusOne => "+1",
            Reaction::Eyes => "eyes",
            Reaction::Confused => "confused",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Reaction::Hooray => "🎉",
            Reaction::PlusOne => "👍",
            Reaction::Eyes => "👀",
            Reaction::Confused => "😕",
        }
    }
}

impl std::fmt::Display for Reaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content())
    }
}
