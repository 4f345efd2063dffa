//! Prompt domain
//!
//! Role-scoped prompts for specialist reviewers and the arbiter.

mod template;

pub use template::PromptTemplate;
