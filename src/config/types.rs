use crate::report::Category;
use serde::Deserialize;

/// Main configuration structure for Indo-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub workflow: Vec<WorkflowEntry>,
}

/// Settings handed to the HTTP scraper adapter
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Minimum time between two requests issued by the scraper (milliseconds)
    #[serde(rename = "delay-ms")]
    pub delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            delay_ms: 2000,
            timeout_secs: 60,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the harvester
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the harvester
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the harvester
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for harvester-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "IndoHarvest".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.org/indo-harvest".to_string(),
            contact_email: "harvest@example.org".to_string(),
        }
    }
}

/// Retry behavior shared by every workflow
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Backoff unit; the wait after attempt `n` is `n * base_delay_ms`
    #[serde(rename = "base-delay-ms")]
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 2000,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the JSON, CSV and HTML reports
    pub directory: String,

    /// Write reports for the records gathered before an interrupt
    #[serde(rename = "flush-partial", default = "default_flush_partial")]
    pub flush_partial: bool,
}

fn default_flush_partial() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            flush_partial: true,
        }
    }
}

/// One category workflow: which targets to scrape and how hard to try
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowEntry {
    pub category: Category,

    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Pages the scraper may visit per target (scraper default when absent)
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    pub targets: Vec<String>,
}

impl Default for Config {
    /// The built-in target lists used when no configuration file is given
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            user_agent: UserAgentConfig::default(),
            retry: RetryConfig::default(),
            output: OutputConfig::default(),
            workflow: vec![
                WorkflowEntry {
                    category: Category::School,
                    max_attempts: 3,
                    max_pages: None,
                    targets: to_targets(&[
                        "https://www.smkn1jakarta.sch.id/",
                        "https://www.smkn5bandung.sch.id/",
                        "https://www.sman1yogya.sch.id/",
                        "https://www.smkn2surabaya.sch.id/",
                    ]),
                },
                WorkflowEntry {
                    category: Category::Government,
                    max_attempts: 2,
                    max_pages: None,
                    targets: to_targets(&[
                        "https://www.kemendikbud.go.id/",
                        "https://www.kemkes.go.id/",
                        "https://www.kemenag.go.id/",
                        "https://www.kemenhub.go.id/",
                    ]),
                },
                WorkflowEntry {
                    category: Category::News,
                    max_attempts: 1,
                    max_pages: Some(2),
                    targets: to_targets(&[
                        "https://www.detik.com/",
                        "https://www.kompas.com/",
                        "https://www.liputan6.com/",
                        "https://www.tempo.co/",
                    ]),
                },
            ],
        }
    }
}

fn to_targets(urls: &[&str]) -> Vec<String> {
    urls.iter().map(|u| u.to_string()).collect()
}
