//! Comment domain
//!
//! Binds findings to diff coordinates and builds the payload posted back to
//! the pull request.

pub mod mapper;
pub mod payload;
pub mod reaction;
pub mod report;

pub use mapper::{CommentPlan, InlineComment, SummaryFinding, SummaryReason, map_findings};
pub use payload::{
    Approval, CONGRATULATIONS_MESSAGE, PayloadOptions, ReviewEvent, ReviewPayload,
};
pub use reaction::{REACTION_TABLE, Reaction};
pub use report::{SUMMARY_HEADING, render_summary};
