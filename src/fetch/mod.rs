//! Retry orchestration around a [`Scraper`](crate::scrape::Scraper)
//!
//! This module contains:
//! - [`RetryingFetcher`], bounded retries with linear backoff
//! - Fetch progress events and the sinks that receive them
//! - The cooperative shutdown signal used for Ctrl-C

mod events;
mod retry;
mod shutdown;

pub use events::{EventSink, FetchEvent, RecordingSink, TracingSink};
pub use retry::{FetchError, RetryPolicy, RetryingFetcher, DEFAULT_BASE_DELAY};
pub use shutdown::{listen_for_interrupts, shutdown_channel, Shutdown, ShutdownTrigger};
