//! Retrying fetcher
//!
//! Wraps a single [`Scraper`] call with bounded retries and linear backoff.
//!
//! # Retry Logic
//!
//! | Attempt outcome | Action |
//! |-----------------|--------|
//! | `ScrapeResult::Success` | Return the page immediately |
//! | `ScrapeResult::Failure` | Record reason, wait, retry |
//! | `Err(ScrapeError)` | Record reason, wait, retry |
//! | Last attempt fails | `FetchError::ExhaustedRetries` (no wait) |
//! | Shutdown requested | `FetchError::Interrupted` |
//!
//! The wait after attempt `n` (1-indexed) is `n * base_delay`.

use crate::fetch::events::{EventSink, FetchEvent, TracingSink};
use crate::fetch::shutdown::Shutdown;
use crate::scrape::{ScrapeOptions, ScrapeResult, ScrapedPage, Scraper};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default backoff unit
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(2);

/// Normalized failure of a retrying fetch
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Max retries exceeded for {target} after {attempts} attempts (last error: {last_error})")]
    ExhaustedRetries {
        target: String,
        attempts: u32,
        last_error: String,
    },

    #[error("Interrupted while fetching {target} after {attempts} attempts")]
    Interrupted { target: String, attempts: u32 },

    #[error("max_attempts must be at least 1")]
    InvalidAttempts,

    #[error("Target cannot be empty")]
    EmptyTarget,
}

impl FetchError {
    /// Attempts made before this error, 0 for argument errors
    pub fn attempts(&self) -> u32 {
        match self {
            FetchError::ExhaustedRetries { attempts, .. }
            | FetchError::Interrupted { attempts, .. } => *attempts,
            FetchError::InvalidAttempts | FetchError::EmptyTarget => 0,
        }
    }
}

/// Backoff schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(base_delay: Duration) -> Self {
        Self { base_delay }
    }

    /// Wait after the given 1-indexed attempt
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_DELAY)
    }
}

/// Calls a [`Scraper`] until it succeeds or the attempt budget runs out
pub struct RetryingFetcher<S> {
    scraper: S,
    policy: RetryPolicy,
    sink: Arc<dyn EventSink>,
    shutdown: Shutdown,
}

impl<S: Scraper> RetryingFetcher<S> {
    /// Creates a fetcher that logs through `tracing` and never shuts down
    pub fn new(scraper: S, policy: RetryPolicy) -> Self {
        Self {
            scraper,
            policy,
            sink: Arc::new(TracingSink),
            shutdown: Shutdown::never(),
        }
    }

    /// Replaces the event sink
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Attaches a shutdown signal
    pub fn with_shutdown(mut self, shutdown: Shutdown) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn scraper(&self) -> &S {
        &self.scraper
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutdown.is_triggered()
    }

    /// Scrapes `target` with default options, retrying up to `max_attempts` times
    pub async fn fetch_with_retry(
        &self,
        target: &str,
        max_attempts: u32,
    ) -> Result<ScrapedPage, FetchError> {
        self.fetch_with_options(target, max_attempts, &ScrapeOptions::default())
            .await
    }

    /// Scrapes `target`, passing `options` unchanged to every attempt
    ///
    /// # Returns
    ///
    /// * `Ok(ScrapedPage)` - An attempt succeeded
    /// * `Err(FetchError::ExhaustedRetries)` - Every attempt failed; carries the last reason
    /// * `Err(FetchError::Interrupted)` - Shutdown was requested
    /// * `Err(FetchError::InvalidAttempts | EmptyTarget)` - Nothing was attempted
    pub async fn fetch_with_options(
        &self,
        target: &str,
        max_attempts: u32,
        options: &ScrapeOptions,
    ) -> Result<ScrapedPage, FetchError> {
        if target.trim().is_empty() {
            return Err(FetchError::EmptyTarget);
        }
        if max_attempts == 0 {
            return Err(FetchError::InvalidAttempts);
        }

        let mut shutdown = self.shutdown.clone();
        let mut last_error = String::new();

        for attempt in 1..=max_attempts {
            if shutdown.is_triggered() {
                return Err(self.interrupted(target, attempt - 1));
            }

            self.sink.emit(&FetchEvent::AttemptStarted {
                target: target.to_string(),
                attempt,
                max_attempts,
            });

            let outcome = tokio::select! {
                outcome = self.scraper.scrape(target, options) => outcome,
                _ = shutdown.triggered() => return Err(self.interrupted(target, attempt)),
            };

            let reason = match outcome {
                Ok(ScrapeResult::Success(page)) => {
                    self.sink.emit(&FetchEvent::AttemptSucceeded {
                        target: target.to_string(),
                        attempt,
                    });
                    return Ok(page);
                }
                Ok(ScrapeResult::Failure { error }) => error,
                Err(e) => e.to_string(),
            };

            self.sink.emit(&FetchEvent::AttemptFailed {
                target: target.to_string(),
                attempt,
                reason: reason.clone(),
            });
            last_error = reason;

            if attempt < max_attempts {
                let delay = self.policy.delay_for(attempt);
                self.sink.emit(&FetchEvent::BackoffWait {
                    target: target.to_string(),
                    attempt,
                    delay,
                });

                tokio::select! {
                    _ = tokio::time::sleep(delay) => {}
                    _ = shutdown.triggered() => return Err(self.interrupted(target, attempt)),
                }
            }
        }

        self.sink.emit(&FetchEvent::Exhausted {
            target: target.to_string(),
            attempts: max_attempts,
            last_error: last_error.clone(),
        });

        Err(FetchError::ExhaustedRetries {
            target: target.to_string(),
            attempts: max_attempts,
            last_error,
        })
    }

    fn interrupted(&self, target: &str, attempts: u32) -> FetchError {
        self.sink.emit(&FetchEvent::Interrupted {
            target: target.to_string(),
            attempts,
        });
        FetchError::Interrupted {
            target: target.to_string(),
            attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::events::RecordingSink;
    use crate::fetch::shutdown::shutdown_channel;
    use crate::scrape::ScrapeError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Fails with a scripted error until `succeed_on`, counting calls
    struct FlakyScraper {
        succeed_on: Option<u32>,
        raise: bool,
        calls: AtomicU32,
        seen_options: Mutex<Vec<ScrapeOptions>>,
    }

    impl FlakyScraper {
        fn new(succeed_on: Option<u32>) -> Self {
            Self {
                succeed_on,
                raise: false,
                calls: AtomicU32::new(0),
                seen_options: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Scraper for FlakyScraper {
        async fn scrape(
            &self,
            target: &str,
            options: &ScrapeOptions,
        ) -> Result<ScrapeResult, ScrapeError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.seen_options.lock().unwrap().push(*options);

            if Some(call) == self.succeed_on {
                let mut page = ScrapedPage::new(target);
                page.title = format!("call {}", call);
                return Ok(ScrapeResult::Success(page));
            }
            if self.raise {
                Err(ScrapeError::Other(format!("boom {}", call)))
            } else {
                Ok(ScrapeResult::failure(format!("HTTP 503 on call {}", call)))
            }
        }
    }

    fn fetcher(scraper: FlakyScraper, sink: Arc<RecordingSink>) -> RetryingFetcher<FlakyScraper> {
        RetryingFetcher::new(scraper, RetryPolicy::default()).with_sink(sink)
    }

    #[test]
    fn test_delay_grows_linearly() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(1), Duration::from_secs(2));
        assert_eq!(policy.delay_for(2), Duration::from_secs(4));
        assert_eq!(policy.delay_for(3), Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_try_has_no_wait() {
        let sink = Arc::new(RecordingSink::new());
        let fetcher = fetcher(FlakyScraper::new(Some(1)), sink.clone());

        let page = fetcher.fetch_with_retry("https://a.sch.id/", 3).await.unwrap();

        assert_eq!(page.title, "call 1");
        assert_eq!(fetcher.scraper().calls(), 1);
        assert!(sink.waits_for("https://a.sch.id/").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_on_third_attempt() {
        let sink = Arc::new(RecordingSink::new());
        let fetcher = fetcher(FlakyScraper::new(Some(3)), sink.clone());

        let started = tokio::time::Instant::now();
        let page = fetcher.fetch_with_retry("https://a.sch.id/", 5).await.unwrap();

        assert_eq!(page.title, "call 3");
        assert_eq!(fetcher.scraper().calls(), 3);
        assert_eq!(
            sink.waits_for("https://a.sch.id/"),
            vec![Duration::from_secs(2), Duration::from_secs(4)]
        );
        assert!(started.elapsed() >= Duration::from_secs(6));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_keeps_last_error() {
        let sink = Arc::new(RecordingSink::new());
        let fetcher = fetcher(FlakyScraper::new(None), sink.clone());

        let err = fetcher
            .fetch_with_retry("https://a.go.id/", 3)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            FetchError::ExhaustedRetries {
                target: "https://a.go.id/".to_string(),
                attempts: 3,
                last_error: "HTTP 503 on call 3".to_string(),
            }
        );
        assert!(err.to_string().starts_with("Max retries exceeded"));
        assert_eq!(fetcher.scraper().calls(), 3);
        assert_eq!(sink.waits_for("https://a.go.id/").len(), 2);
        assert!(matches!(
            sink.events().last(),
            Some(FetchEvent::Exhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_raised_errors_are_retried() {
        let sink = Arc::new(RecordingSink::new());
        let mut scraper = FlakyScraper::new(None);
        scraper.raise = true;
        let fetcher = fetcher(scraper, sink.clone());

        let err = fetcher
            .fetch_with_retry("https://a.go.id/", 2)
            .await
            .unwrap_err();

        assert_eq!(fetcher.scraper().calls(), 2);
        match err {
            FetchError::ExhaustedRetries { last_error, .. } => assert_eq!(last_error, "boom 2"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_attempt_never_waits() {
        let sink = Arc::new(RecordingSink::new());
        let fetcher = fetcher(FlakyScraper::new(None), sink.clone());

        let err = fetcher.fetch_with_retry("https://a.com/", 1).await.unwrap_err();

        assert_eq!(err.attempts(), 1);
        assert!(sink.waits_for("https://a.com/").is_empty());
    }

    #[tokio::test]
    async fn test_invalid_arguments_do_not_scrape() {
        let sink = Arc::new(RecordingSink::new());
        let fetcher = fetcher(FlakyScraper::new(Some(1)), sink.clone());

        assert_eq!(
            fetcher.fetch_with_retry("https://a.com/", 0).await,
            Err(FetchError::InvalidAttempts)
        );
        assert_eq!(
            fetcher.fetch_with_retry("  ", 3).await,
            Err(FetchError::EmptyTarget)
        );
        assert_eq!(fetcher.scraper().calls(), 0);
        assert!(sink.events().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_options_forwarded_on_every_attempt() {
        let sink = Arc::new(RecordingSink::new());
        let fetcher = fetcher(FlakyScraper::new(Some(2)), sink);

        fetcher
            .fetch_with_options("https://www.detik.com/", 2, &ScrapeOptions::with_max_pages(2))
            .await
            .unwrap();

        let seen = fetcher.scraper().seen_options.lock().unwrap().clone();
        assert_eq!(seen, vec![ScrapeOptions::with_max_pages(2); 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_during_backoff() {
        let sink = Arc::new(RecordingSink::new());
        let (trigger, shutdown) = shutdown_channel();
        let fetcher = fetcher(FlakyScraper::new(None), sink.clone()).with_shutdown(shutdown);

        let fetch = fetcher.fetch_with_retry("https://a.com/", 3);
        let interrupt = async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            trigger.trigger();
        };
        let (result, ()) = tokio::join!(fetch, interrupt);

        assert_eq!(
            result,
            Err(FetchError::Interrupted {
                target: "https://a.com/".to_string(),
                attempts: 1,
            })
        );
        assert_eq!(fetcher.scraper().calls(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_before_first_attempt() {
        let (trigger, shutdown) = shutdown_channel();
        trigger.trigger();
        let fetcher = RetryingFetcher::new(FlakyScraper::new(Some(1)), RetryPolicy::default())
            .with_shutdown(shutdown);

        let result = fetcher.fetch_with_retry("https://a.com/", 3).await;

        assert!(matches!(result, Err(FetchError::Interrupted { attempts: 0, .. })));
        assert_eq!(fetcher.scraper().calls(), 0);
        assert!(fetcher.is_shutting_down());
    }
}
