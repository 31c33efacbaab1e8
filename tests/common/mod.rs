//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use indo_harvest::scrape::{ScrapeError, ScrapeOptions, ScrapeResult, ScrapedPage, Scraper};
use std::collections::HashMap;
use std::sync::Mutex;

/// One scripted attempt outcome
#[derive(Debug, Clone)]
pub enum Step {
    Succeed,
    Fail(&'static str),
    Raise(&'static str),
}

/// A scraper that replays a fixed outcome sequence per target
///
/// The last step repeats once a target's script runs out.
#[derive(Default)]
pub struct ScriptedScraper {
    scripts: HashMap<String, Vec<Step>>,
    calls: Mutex<HashMap<String, usize>>,
    pages: HashMap<String, ScrapedPage>,
}

impl ScriptedScraper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, target: &str, steps: Vec<Step>) -> Self {
        self.scripts.insert(target.to_string(), steps);
        self
    }

    /// Page returned on success for `target` (a titled empty page otherwise)
    pub fn page(mut self, target: &str, page: ScrapedPage) -> Self {
        self.pages.insert(target.to_string(), page);
        self
    }

    pub fn calls(&self, target: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .get(target)
            .copied()
            .unwrap_or(0)
    }

    fn next_step(&self, target: &str) -> Step {
        let mut calls = self.calls.lock().unwrap();
        let call = calls.entry(target.to_string()).or_insert(0);
        *call += 1;

        let script = self
            .scripts
            .get(target)
            .cloned()
            .unwrap_or_else(|| vec![Step::Succeed]);
        let index = (*call - 1).min(script.len().saturating_sub(1));
        script.get(index).cloned().unwrap_or(Step::Succeed)
    }
}

#[async_trait]
impl Scraper for ScriptedScraper {
    async fn scrape(
        &self,
        target: &str,
        _options: &ScrapeOptions,
    ) -> Result<ScrapeResult, ScrapeError> {
        match self.next_step(target) {
            Step::Succeed => {
                let page = self.pages.get(target).cloned().unwrap_or_else(|| {
                    let mut page = ScrapedPage::new(target);
                    page.title = format!("Situs {}", page.domain);
                    page
                });
                Ok(ScrapeResult::Success(page))
            }
            Step::Fail(reason) => Ok(ScrapeResult::failure(reason)),
            Step::Raise(reason) => Err(ScrapeError::Other(reason.to_string())),
        }
    }
}
