//! Configuration module for Indo-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! When no file is given, [`Config::default`] provides the built-in target lists.
//!
//! # Example
//!
//! ```no_run
//! use indo_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Workflows: {}", config.workflow.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, OutputConfig, RetryConfig, ScraperConfig, UserAgentConfig, WorkflowEntry,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
