//! Agent domain module
//!
//! Review roles, the findings they produce, and validation of their raw
//! responses into typed [`AgentResult`]s.

pub mod finding;
pub mod parsing;
pub mod result;
pub mod role;
pub mod value_objects;

pub use finding::{AttributedFinding, DEFAULT_CATEGORY, Finding};
pub use parsing::{ResponseError, parse_agent_response};
pub use result::{AgentResult, AgentReview};
pub use role::{AgentRole, RoleProfile};
pub use value_objects::{Severity, Stance};
