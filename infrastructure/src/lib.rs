//! Infrastructure layer for pr-quorum
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod github;
pub mod http;
pub mod local;
pub mod logging;
pub mod openai;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileGithubConfig, FileLoggingConfig,
    FileModelsConfig, FileOutputConfig, FileProviderConfig, FileReviewConfig, FileRoleConfig,
};
pub use github::GitHubClient;
pub use local::LocalDiffSource;
pub use logging::JsonlTranscriptLogger;
pub use openai::{OpenAiGateway, OpenAiSettings};
