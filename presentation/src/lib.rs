//! Presentation layer for pr-quorum
//!
//! This crate contains the CLI definition, output formatters and
//! progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, CliError};
pub use output::console::ConsoleFormatter;
pub use output::formatter::OutputFormatter;
pub use output::results::{AgentSummary, ReviewResults};
pub use progress::reporter::{ProgressReporter, SimpleProgress};
