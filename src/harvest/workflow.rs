//! Harvest workflow - category orchestration
//!
//! This module runs the category workflows one after another:
//! - Fetching every target in input order, one at a time
//! - Projecting successful scrapes into records
//! - Keeping failed targets out of the aggregation
//! - Writing reports and printing the summary
//! - Stopping cleanly on shutdown

use crate::config::{validate, Config, OutputConfig, WorkflowEntry};
use crate::fetch::{FetchError, RetryPolicy, RetryingFetcher, Shutdown};
use crate::report::{
    print_summary, project, summarize, write_reports, Category, CategoryRecord, RunSummary,
    WriteOutcome,
};
use crate::scrape::{HttpScraper, ScrapeOptions, Scraper};
use crate::Result;
use chrono::Local;
use std::path::Path;
use std::time::Duration;

/// A target that never produced a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTarget {
    pub target: String,
    pub attempts: u32,
    pub last_error: String,
}

/// Everything one category workflow produced
#[derive(Debug, Clone)]
pub struct CategoryRun {
    pub category: Category,

    /// Records of the targets that were scraped, in input order
    pub records: Vec<CategoryRecord>,

    pub failed: Vec<FailedTarget>,

    /// True when shutdown cut the workflow short
    pub interrupted: bool,
}

impl CategoryRun {
    fn new(category: Category) -> Self {
        Self {
            category,
            records: Vec::new(),
            failed: Vec::new(),
            interrupted: false,
        }
    }

    pub fn summary(&self) -> RunSummary {
        summarize(&self.records).with_failed_targets(self.failed.len())
    }
}

/// Drives category workflows through a [`RetryingFetcher`]
pub struct Harvester<S> {
    fetcher: RetryingFetcher<S>,
    output: OutputConfig,
}

impl<S: Scraper> Harvester<S> {
    pub fn new(fetcher: RetryingFetcher<S>, output: OutputConfig) -> Self {
        Self { fetcher, output }
    }

    pub fn fetcher(&self) -> &RetryingFetcher<S> {
        &self.fetcher
    }

    pub fn is_shutting_down(&self) -> bool {
        self.fetcher.is_shutting_down()
    }

    /// Runs every workflow in order, writing each category's reports
    ///
    /// Stops after the first interrupted workflow; later categories are not started.
    pub async fn run(&self, workflows: &[WorkflowEntry]) -> Vec<CategoryRun> {
        let mut runs = Vec::new();

        for workflow in workflows {
            if self.is_shutting_down() {
                tracing::warn!("Shutdown requested, skipping {}", workflow.category);
                break;
            }

            let run = self.run_category(workflow).await;
            self.report(&run);

            let interrupted = run.interrupted;
            runs.push(run);
            if interrupted {
                break;
            }
        }

        runs
    }

    /// Scrapes every target of one workflow, in input order
    ///
    /// A failed target never stops the workflow; only shutdown does.
    pub async fn run_category(&self, workflow: &WorkflowEntry) -> CategoryRun {
        let category = workflow.category;
        let options = ScrapeOptions {
            max_pages: workflow.max_pages,
        };
        let mut run = CategoryRun::new(category);

        tracing::info!(
            "Scraping {} ({} targets, max {} attempts)",
            category.heading(),
            workflow.targets.len(),
            workflow.max_attempts
        );

        for (index, target) in workflow.targets.iter().enumerate() {
            tracing::info!(
                "[{}/{}] Scraping {}",
                index + 1,
                workflow.targets.len(),
                target
            );

            match self
                .fetcher
                .fetch_with_options(target, workflow.max_attempts, &options)
                .await
            {
                Ok(page) => {
                    let record = project(&page, target, category);
                    log_record(&record);
                    run.records.push(record);
                }
                Err(FetchError::Interrupted { attempts, .. }) => {
                    tracing::warn!(
                        "{} interrupted at {} after {} attempts",
                        category,
                        target,
                        attempts
                    );
                    run.interrupted = true;
                    break;
                }
                Err(e) => {
                    tracing::warn!("Failed to scrape {}: {}", target, e);
                    run.failed.push(failed_target(target, e));
                }
            }
        }

        tracing::info!(
            "{}: {} scraped, {} failed",
            category,
            run.records.len(),
            run.failed.len()
        );

        run
    }

    /// Writes the reports of a finished run and prints its summary
    ///
    /// Returns None when the run was interrupted and partial flushing is off.
    pub fn report(&self, run: &CategoryRun) -> Option<WriteOutcome> {
        if run.interrupted && !self.output.flush_partial {
            tracing::info!("Not writing partial {} reports", run.category);
            return None;
        }

        let outcome = write_reports(
            &run.records,
            run.category,
            Path::new(&self.output.directory),
            Local::now(),
        );

        for path in &outcome.written {
            tracing::info!("Report saved: {}", path.display());
        }
        for (format, error) in &outcome.failures {
            tracing::error!("{} {} report not written: {}", run.category, format, error);
        }

        print_summary(run.category, &run.summary());

        Some(outcome)
    }
}

impl Harvester<HttpScraper> {
    /// Creates a harvester that scrapes over HTTP as `config` describes
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to run `config.workflow`
    /// * `Err(HarvestError::Config)` - The configuration is invalid
    /// * `Err(HarvestError::Reqwest)` - The HTTP client could not be built
    pub fn from_config(config: &Config, shutdown: Shutdown) -> Result<Self> {
        validate(config)?;

        let scraper = HttpScraper::new(&config.scraper, &config.user_agent)?;
        let policy = RetryPolicy::new(Duration::from_millis(config.retry.base_delay_ms));
        let fetcher = RetryingFetcher::new(scraper, policy).with_shutdown(shutdown);

        Ok(Self::new(fetcher, config.output.clone()))
    }
}

fn failed_target(target: &str, error: FetchError) -> FailedTarget {
    let attempts = error.attempts();
    let last_error = match error {
        FetchError::ExhaustedRetries { last_error, .. } => last_error,
        other => other.to_string(),
    };

    FailedTarget {
        target: target.to_string(),
        attempts,
        last_error,
    }
}

/// Logs the highlights of a new record
fn log_record(record: &CategoryRecord) {
    match record {
        CategoryRecord::School(r) => tracing::info!(
            "{}: {} emails, {} phones",
            r.name,
            r.emails.len(),
            r.phones.len()
        ),
        CategoryRecord::Government(r) => tracing::info!(
            "{}: {} links, keywords {}",
            r.name,
            r.total_links,
            r.keyword_analysis
                .iter()
                .map(|(keyword, count)| format!("{}={}", keyword, count))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        CategoryRecord::News(r) => tracing::info!(
            "{}: {} words, {} links, {} images, top keyword '{}'",
            r.name,
            r.word_count,
            r.link_count,
            r.image_count,
            r.top_keyword
        ),
    }
}
