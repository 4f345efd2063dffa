//! Configuration file loading for pr-quorum
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `PR_QUORUM_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./pr-quorum.toml` or `./.pr-quorum.toml`
//! 4. Global: `$XDG_CONFIG_HOME/pr-quorum/config.toml`
//! 5. Default values
//!
//! CLI flags are applied on top by the binary.

mod error;
mod file_config;
mod loader;

pub use error::ConfigError;

pub use file_config::{
    FileConfig, FileGithubConfig, FileLoggingConfig, FileModelsConfig, FileOutputConfig,
    FileProviderConfig, FileReviewConfig, FileRoleConfig,
};
pub use loader::ConfigLoader;
