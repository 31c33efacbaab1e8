//! Scrape result types
//!
//! These are the values a [`Scraper`](super::Scraper) hands back for one
//! target. They are never mutated by the rest of the crate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use url::Url;

/// A hyperlink found on a scraped page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    /// Absolute URL of the link target
    pub url: String,

    /// Visible anchor text (may be empty)
    pub text: String,
}

/// An image referenced by a scraped page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Image {
    /// Absolute URL of the image
    pub src: String,

    /// Alternative text, if the page provided one
    pub alt: Option<String>,
}

/// Contact details discovered on a site
///
/// Ordered sets keep every projection and rendering deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactInfo {
    pub emails: BTreeSet<String>,
    pub phones: BTreeSet<String>,
    pub addresses: BTreeSet<String>,
}

impl ContactInfo {
    /// Adds every entry of `other` to this contact set
    pub fn merge(&mut self, other: ContactInfo) {
        self.emails.extend(other.emails);
        self.phones.extend(other.phones);
        self.addresses.extend(other.addresses);
    }
}

/// Everything a successful scrape of one target produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrapedPage {
    /// The target that was requested
    pub url: String,

    /// Host name of the scraped site
    pub domain: String,

    /// Page title (empty when the page had none)
    pub title: String,

    /// Meta description (empty when the page had none)
    pub description: String,

    /// Visible text of every page visited
    pub content: String,

    pub links: Vec<Link>,

    pub images: Vec<Image>,

    pub contact_info: ContactInfo,

    /// `<meta>` name/property to content
    pub metadata: BTreeMap<String, String>,

    /// Number of pages the scraper visited for this target
    pub pages_scraped: u32,

    /// When the scrape finished
    pub timestamp: DateTime<Utc>,
}

impl ScrapedPage {
    /// Creates an empty page for `url`, stamped with the current time
    ///
    /// The domain is taken from the URL host; an unparsable URL leaves it empty.
    pub fn new(url: &str) -> Self {
        let domain = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default();

        Self {
            url: url.to_string(),
            domain,
            title: String::new(),
            description: String::new(),
            content: String::new(),
            links: Vec::new(),
            images: Vec::new(),
            contact_info: ContactInfo::default(),
            metadata: BTreeMap::new(),
            pages_scraped: 1,
            timestamp: Utc::now(),
        }
    }
}

/// Outcome of a single scrape call
#[derive(Debug, Clone, PartialEq)]
pub enum ScrapeResult {
    /// The target was scraped
    Success(ScrapedPage),

    /// The scraper reached the target but could not produce a result
    Failure {
        /// Why the scrape failed
        error: String,
    },
}

impl ScrapeResult {
    /// Convenience constructor for a failed scrape
    pub fn failure(error: impl Into<String>) -> Self {
        ScrapeResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeResult::Success(_))
    }
}

/// Per-call options forwarded to the scraper
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Maximum number of pages to visit for one target (scraper default when `None`)
    pub max_pages: Option<u32>,
}

impl ScrapeOptions {
    pub fn with_max_pages(max_pages: u32) -> Self {
        Self {
            max_pages: Some(max_pages),
        }
    }
}
