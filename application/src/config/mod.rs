//! Application-level configuration.
//!
//! - [`ReviewParams`]: which agents run, on which models, under which
//!   timeouts and decision policy

pub mod review_params;

pub use review_params::ReviewParams;
