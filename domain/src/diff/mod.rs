//! Diff subdomain
//!
//! Normalizes raw unified diff text (or host-supplied file changes) into the
//! addressable [`Diff`] model used for prompts and comment placement.

pub mod model;
pub mod parser;
pub mod render;

pub use model::{AnchorIndex, ChangeKind, Diff, DiffLine, FileChange, Hunk, LineKind};
pub use parser::{parse_unified_diff, validate_files};

impl Diff {
    /// Normalize raw unified diff text
    pub fn parse(text: &str) -> Result<Self, crate::core::error::DomainError> {
        parse_unified_diff(text)
    }

    /// Git-style unified diff text that normalizes back to this diff
    pub fn to_unified(&self) -> String {
        render::to_unified(self)
    }

    /// Prompt rendering with new-file line numbers in a gutter
    pub fn annotated(&self) -> String {
        render::annotated(self)
    }
}
