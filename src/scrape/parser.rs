//! HTML parser for extracting page content, links and contact details
//!
//! This module handles parsing HTML content to extract:
//! - Page title and meta description
//! - `<meta>` metadata
//! - Visible body text
//! - Links and images (absolute URLs)
//! - Emails (`mailto:`), phones (`tel:`) and `<address>` blocks

use crate::scrape::{ContactInfo, Image, Link};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeMap;
use url::Url;

/// Elements whose text never counts as page content
const HIDDEN_TEXT_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// The meta description, falling back to `og:description`
    pub description: Option<String>,

    /// Whitespace-normalized visible text of the body
    pub content: String,

    /// All http(s) links found on the page
    pub links: Vec<Link>,

    /// All http(s) images found on the page
    pub images: Vec<Image>,

    pub contact_info: ContactInfo,

    pub metadata: BTreeMap<String, String>,
}

/// Parses HTML content and extracts everything a [`ScrapedPage`](super::ScrapedPage) needs
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags
/// - `<link rel="canonical" href="...">`
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:` links and data URIs
/// - Fragment-only links
///
/// `mailto:` and `tel:` links are not links; they feed the contact info.
///
/// # Example
///
/// ```
/// use indo_harvest::scrape::parse_html;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let base_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &base_url);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links[0].url, "https://example.com/page");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    let metadata = extract_metadata(&document);
    let description = metadata
        .get("description")
        .or_else(|| metadata.get("og:description"))
        .cloned();

    let mut contact_info = ContactInfo::default();
    let links = extract_links(&document, base_url, &mut contact_info);
    contact_info.addresses.extend(extract_addresses(&document));

    ParsedPage {
        title: extract_title(&document),
        description,
        content: extract_content(&document),
        links,
        images: extract_images(&document, base_url),
        contact_info,
        metadata,
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| normalize_text(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

/// Collects `<meta name|property="..." content="...">` pairs, keys lower-cased
///
/// The first occurrence of a key wins.
fn extract_metadata(document: &Html) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    if let Ok(meta_selector) = Selector::parse("meta[content]") {
        for element in document.select(&meta_selector) {
            let value = element.value();
            let key = value.attr("name").or_else(|| value.attr("property"));

            if let (Some(key), Some(content)) = (key, value.attr("content")) {
                let content = content.trim();
                if key.trim().is_empty() || content.is_empty() {
                    continue;
                }
                metadata
                    .entry(key.trim().to_lowercase())
                    .or_insert_with(|| content.to_string());
            }
        }
    }

    metadata
}

/// Extracts the visible text of `<body>`, skipping script and style contents
fn extract_content(document: &Html) -> String {
    let Ok(body_selector) = Selector::parse("body") else {
        return String::new();
    };

    let mut pieces = Vec::new();
    for body in document.select(&body_selector) {
        for node in body.descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let hidden = node
                .parent()
                .and_then(ElementRef::wrap)
                .map(|parent| HIDDEN_TEXT_ELEMENTS.contains(&parent.value().name()))
                .unwrap_or(false);
            if hidden {
                continue;
            }

            let text = normalize_text(text);
            if !text.is_empty() {
                pieces.push(text);
            }
        }
    }

    pieces.join(" ")
}

/// Extracts all valid links, routing `mailto:`/`tel:` hrefs into `contacts`
fn extract_links(document: &Html, base_url: &Url, contacts: &mut ContactInfo) -> Vec<Link> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            // Skip if it has the download attribute
            if element.value().attr("download").is_some() {
                continue;
            }

            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if let Some(email) = parse_mailto(href) {
                contacts.emails.extend(email);
                continue;
            }

            if let Some(phone) = parse_tel(href) {
                contacts.phones.insert(phone);
                continue;
            }

            if let Some(absolute_url) = resolve_link(href, base_url) {
                links.push(Link {
                    url: absolute_url,
                    text: normalize_text(&element.text().collect::<String>()),
                });
            }
        }
    }

    // Extract canonical link
    if let Ok(canonical_selector) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(Link {
                        url: absolute_url,
                        text: String::new(),
                    });
                }
            }
        }
    }

    links
}

/// Extracts `<img src>` references as absolute URLs
fn extract_images(document: &Html, base_url: &Url) -> Vec<Image> {
    let mut images = Vec::new();

    if let Ok(img_selector) = Selector::parse("img[src]") {
        for element in document.select(&img_selector) {
            let Some(src) = element.value().attr("src") else {
                continue;
            };

            if let Some(absolute_url) = resolve_link(src, base_url) {
                let alt = element
                    .value()
                    .attr("alt")
                    .map(normalize_text)
                    .filter(|alt| !alt.is_empty());
                images.push(Image {
                    src: absolute_url,
                    alt,
                });
            }
        }
    }

    images
}

/// Extracts the text of every `<address>` element
fn extract_addresses(document: &Html) -> Vec<String> {
    let Ok(address_selector) = Selector::parse("address") else {
        return Vec::new();
    };

    document
        .select(&address_selector)
        .map(|element| normalize_text(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|address| !address.is_empty())
        .collect()
}

/// Returns the addresses of a `mailto:` href, or None for any other href
fn parse_mailto(href: &str) -> Option<Vec<String>> {
    let href = href.trim();
    if !href.to_ascii_lowercase().starts_with("mailto:") {
        return None;
    }

    let recipients = href["mailto:".len()..].split('?').next().unwrap_or("");
    Some(
        recipients
            .split(',')
            .map(|email| email.trim().to_lowercase())
            .filter(|email| email.contains('@'))
            .collect(),
    )
}

/// Returns the number of a `tel:` href, or None for any other href
fn parse_tel(href: &str) -> Option<String> {
    let href = href.trim();
    if !href.to_ascii_lowercase().starts_with("tel:") {
        return None;
    }

    let number = href["tel:".len()..].trim();
    if number.is_empty() {
        None
    } else {
        Some(number.to_string())
    }
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript: and data: URIs
/// - Fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:") || href.starts_with("data:") {
        return None;
    }

    // Skip fragment-only links (same page anchors)
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Collapses runs of whitespace into single spaces
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
