//! HTTP scraper adapter
//!
//! [`HttpScraper`] binds the [`Scraper`] trait to `reqwest` and the HTML
//! parser. It handles:
//! - Building an HTTP client with a proper user agent string
//! - The politeness delay between consecutive requests
//! - Following same-domain links when more than one page is requested
//! - Classifying transport errors

use crate::config::{ScraperConfig, UserAgentConfig};
use crate::scrape::parser::{parse_html, ParsedPage};
use crate::scrape::{ScrapeError, ScrapeOptions, ScrapeResult, ScrapedPage, Scraper};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{redirect::Policy, Client};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// Redirect hops reqwest may follow for one request
const MAX_REDIRECTS: usize = 10;

/// Result of fetching a single page
#[derive(Debug)]
enum PageFetch {
    /// An HTML document
    Html { final_url: Url, body: String },

    /// A non-success HTTP status
    Status(u16),

    /// A response that is not HTML
    NotHtml(String),
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use indo_harvest::config::{ScraperConfig, UserAgentConfig};
/// use indo_harvest::scrape::build_http_client;
///
/// let client = build_http_client(&ScraperConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    scraper: &ScraperConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        user_agent.crawler_name,
        user_agent.crawler_version,
        user_agent.contact_url,
        user_agent.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(scraper.timeout_secs))
        .connect_timeout(Duration::from_secs(scraper.timeout_secs.min(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A [`Scraper`] that fetches pages over HTTP
pub struct HttpScraper {
    client: Client,
    delay: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl HttpScraper {
    /// Creates a scraper from the configured timeout, delay and user agent
    pub fn new(
        scraper: &ScraperConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(scraper, user_agent)?,
            delay: Duration::from_millis(scraper.delay_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Waits until the politeness delay since the previous request has passed
    async fn wait_for_turn(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.delay {
                tokio::time::sleep(self.delay - elapsed).await;
            }
        }

        *last = Some(Instant::now());
    }

    /// Fetches one page
    async fn fetch_page(&self, url: &Url) -> Result<PageFetch, ScrapeError> {
        self.wait_for_turn().await;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(PageFetch::Status(status.as_u16()));
        }

        let final_url = response.url().clone();

        // A missing Content-Type is treated as HTML
        let content_type = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();

        if !content_type.contains("html") {
            return Ok(PageFetch::NotHtml(content_type));
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;

        Ok(PageFetch::Html { final_url, body })
    }
}

#[async_trait]
impl Scraper for HttpScraper {
    async fn scrape(
        &self,
        target: &str,
        options: &ScrapeOptions,
    ) -> Result<ScrapeResult, ScrapeError> {
        let start = Url::parse(target).map_err(|source| ScrapeError::InvalidUrl {
            url: target.to_string(),
            source,
        })?;
        let max_pages = options.max_pages.unwrap_or(1).max(1);

        let (final_url, body) = match self.fetch_page(&start).await? {
            PageFetch::Html { final_url, body } => (final_url, body),
            PageFetch::Status(code) => {
                return Ok(ScrapeResult::failure(format!("HTTP {} for {}", code, target)));
            }
            PageFetch::NotHtml(content_type) => {
                return Ok(ScrapeResult::failure(format!(
                    "Unsupported content type '{}' for {}",
                    content_type, target
                )));
            }
        };

        let domain = final_url.host_str().unwrap_or_default().to_string();
        let parsed = parse_html(&body, &final_url);

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(without_fragment(&start));
        visited.insert(without_fragment(&final_url));

        let mut frontier = VecDeque::new();
        enqueue_same_domain(&parsed, &domain, &visited, &mut frontier);

        let mut page = ScrapedPage {
            url: target.to_string(),
            domain: domain.clone(),
            title: parsed.title.unwrap_or_default(),
            description: parsed.description.unwrap_or_default(),
            content: parsed.content,
            links: parsed.links,
            images: parsed.images,
            contact_info: parsed.contact_info,
            metadata: parsed.metadata,
            pages_scraped: 1,
            timestamp: Utc::now(),
        };

        while page.pages_scraped < max_pages {
            let Some(next) = frontier.pop_front() else {
                break;
            };
            if !visited.insert(without_fragment(&next)) {
                continue;
            }

            match self.fetch_page(&next).await {
                Ok(PageFetch::Html { final_url, .. }) if !on_domain(&final_url, &domain) => {
                    tracing::debug!("Skipping {}: redirected off-site to {}", next, final_url);
                }
                Ok(PageFetch::Html { final_url, body }) => {
                    let sub = parse_html(&body, &final_url);
                    enqueue_same_domain(&sub, &domain, &visited, &mut frontier);
                    absorb(&mut page, sub);
                    page.pages_scraped += 1;
                }
                Ok(other) => tracing::debug!("Skipping {}: {:?}", next, other),
                Err(e) => tracing::warn!("Failed to fetch follow-up page {}: {}", next, e),
            }
        }

        page.timestamp = Utc::now();
        Ok(ScrapeResult::Success(page))
    }
}

/// Folds a follow-up page into the result of the first page
///
/// Title and description always come from the first page; metadata keys
/// already present are kept.
fn absorb(page: &mut ScrapedPage, sub: ParsedPage) {
    if !sub.content.is_empty() {
        if !page.content.is_empty() {
            page.content.push('\n');
        }
        page.content.push_str(&sub.content);
    }
    page.links.extend(sub.links);
    page.images.extend(sub.images);
    page.contact_info.merge(sub.contact_info);
    for (key, value) in sub.metadata {
        page.metadata.entry(key).or_insert(value);
    }
}

/// Queues every unvisited link of `parsed` that stays on `domain`
fn enqueue_same_domain(
    parsed: &ParsedPage,
    domain: &str,
    visited: &HashSet<String>,
    frontier: &mut VecDeque<Url>,
) {
    for link in &parsed.links {
        let Ok(url) = Url::parse(&link.url) else {
            continue;
        };
        if on_domain(&url, domain) && !visited.contains(&without_fragment(&url)) {
            frontier.push_back(url);
        }
    }
}

fn on_domain(url: &Url, domain: &str) -> bool {
    url.host_str() == Some(domain)
}

fn without_fragment(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Maps a reqwest error to a scrape error
fn classify_error(url: &Url, error: reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
        }
    } else {
        ScrapeError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
