//! Review quorum domain
//!
//! Specialist results are aggregated into an [`AggregateReport`], then the
//! [`Synthesizer`] reconciles them (with the optional arbiter result) into a
//! single [`Verdict`].
//!
//! ```text
//! AgentResult × N ──▶ AggregateReport ──┐
//!                                       ├──▶ Synthesizer ──▶ Verdict
//! arbiter AgentResult ──────────────────┘
//! ```

pub mod aggregate;
pub mod rule;
pub mod synthesis;

pub use aggregate::{AgentHealth, AggregateReport, SeverityCounts, StanceTally};
pub use rule::QuorumRule;
pub use synthesis::{DecisionBasis, SynthesisPolicy, Synthesizer, Verdict};
