//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Diagnostic output locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for JSONL review transcripts
    pub transcript_dir: Option<PathBuf>,
    /// File receiving `tracing` output in addition to stderr
    pub log_file: Option<PathBuf>,
}
