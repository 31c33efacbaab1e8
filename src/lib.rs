//! Indo-Harvest: retrying scrape orchestration and category reports
//!
//! This crate drives a [`scrape::Scraper`] over lists of Indonesian school,
//! government and news websites, retries failed scrapes with backoff, and
//! turns the successful results into JSON, CSV and HTML reports.

pub mod config;
pub mod fetch;
pub mod harvest;
pub mod report;
pub mod scrape;

use thiserror::Error;

/// Main error type for Indo-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Indo-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use fetch::{FetchError, RetryPolicy, RetryingFetcher};
pub use harvest::{CategoryRun, Harvester};
pub use report::{Category, CategoryRecord, RunSummary};
pub use scrape::{ScrapeOptions, ScrapeResult, ScrapedPage, Scraper};
