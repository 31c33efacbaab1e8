//! Scraper boundary
//!
//! This module contains:
//! - The [`Scraper`] trait every scrape source implements
//! - The result types a scrape produces
//! - [`HttpScraper`], the reqwest-backed implementation used by the binary
//! - The HTML parser behind it

mod http;
mod parser;
mod result;
mod traits;

pub use http::{build_http_client, HttpScraper};
pub use parser::{parse_html, ParsedPage};
pub use result::{ContactInfo, Image, Link, ScrapeOptions, ScrapeResult, ScrapedPage};
pub use traits::{ScrapeError, Scraper};
