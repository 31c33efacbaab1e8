//! Scraper trait and error types
//!
//! The scraping engine is a capability boundary: the rest of the crate only
//! talks to it through [`Scraper`], which keeps the retry and reporting logic
//! testable against scripted doubles.

use crate::scrape::{ScrapeOptions, ScrapeResult};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Unexpected errors raised by a scrape attempt
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Invalid target URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("{0}")]
    Other(String),
}

/// A source of scrape results
///
/// Implementations must be safe to call repeatedly for the same target and
/// are responsible for their own politeness delay between requests.
#[async_trait]
pub trait Scraper: Send + Sync {
    /// Scrapes one target
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapeResult::Success)` - The target was scraped
    /// * `Ok(ScrapeResult::Failure)` - The scraper gave up on the target
    /// * `Err(ScrapeError)` - The attempt failed unexpectedly
    async fn scrape(
        &self,
        target: &str,
        options: &ScrapeOptions,
    ) -> Result<ScrapeResult, ScrapeError>;
}

#[async_trait]
impl<S: Scraper + ?Sized> Scraper for Arc<S> {
    async fn scrape(
        &self,
        target: &str,
        options: &ScrapeOptions,
    ) -> Result<ScrapeResult, ScrapeError> {
        (**self).scrape(target, options).await
    }
}
