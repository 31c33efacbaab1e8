//! Fetch progress events
//!
//! The fetcher never prints. It reports each step as a [`FetchEvent`] to an
//! [`EventSink`]; the binary logs them through `tracing` and tests record them.

use std::sync::Mutex;
use std::time::Duration;

/// One observable step of a retrying fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// A scrape attempt is about to start (attempts are 1-indexed)
    AttemptStarted {
        target: String,
        attempt: u32,
        max_attempts: u32,
    },

    /// The attempt produced a successful scrape
    AttemptSucceeded { target: String, attempt: u32 },

    /// The attempt failed or raised an error
    AttemptFailed {
        target: String,
        attempt: u32,
        reason: String,
    },

    /// The fetcher is waiting before the next attempt
    BackoffWait {
        target: String,
        attempt: u32,
        delay: Duration,
    },

    /// Every attempt failed
    Exhausted {
        target: String,
        attempts: u32,
        last_error: String,
    },

    /// Shutdown was requested while the target was in flight
    Interrupted { target: String, attempts: u32 },
}

/// Receives fetch events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &FetchEvent);
}

impl<F> EventSink for F
where
    F: Fn(&FetchEvent) + Send + Sync,
{
    fn emit(&self, event: &FetchEvent) {
        self(event)
    }
}

/// Logs every event through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: &FetchEvent) {
        match event {
            FetchEvent::AttemptStarted {
                target,
                attempt,
                max_attempts,
            } => tracing::info!("Attempt {}/{} for {}", attempt, max_attempts, target),
            FetchEvent::AttemptSucceeded { target, attempt } => {
                tracing::info!("Success on attempt {} for {}", attempt, target)
            }
            FetchEvent::AttemptFailed {
                target,
                attempt,
                reason,
            } => tracing::warn!("Failed attempt {} for {}: {}", attempt, target, reason),
            FetchEvent::BackoffWait { target, delay, .. } => tracing::info!(
                "Waiting {:.1}s before retrying {}",
                delay.as_secs_f64(),
                target
            ),
            FetchEvent::Exhausted {
                target,
                attempts,
                last_error,
            } => tracing::error!(
                "Max retries exceeded for {} after {} attempts (last error: {})",
                target,
                attempts,
                last_error
            ),
            FetchEvent::Interrupted { target, attempts } => tracing::warn!(
                "Interrupted while fetching {} after {} attempts",
                target,
                attempts
            ),
        }
    }
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<FetchEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything recorded so far
    pub fn events(&self) -> Vec<FetchEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Number of attempts started for `target`
    pub fn attempts_for(&self, target: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, FetchEvent::AttemptStarted { target: t, .. } if t == target))
            .count()
    }

    /// Backoff delays for `target`, in order
    pub fn waits_for(&self, target: &str) -> Vec<Duration> {
        self.events()
            .iter()
            .filter_map(|e| match e {
                FetchEvent::BackoffWait { target: t, delay, .. } if t == target => Some(*delay),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &FetchEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn started(target: &str, attempt: u32) -> FetchEvent {
        FetchEvent::AttemptStarted {
            target: target.to_string(),
            attempt,
            max_attempts: 3,
        }
    }

    #[test]
    fn test_recording_sink_counts_per_target() {
        let sink = RecordingSink::new();
        sink.emit(&started("https://a.go.id/", 1));
        sink.emit(&started("https://b.go.id/", 1));
        sink.emit(&FetchEvent::BackoffWait {
            target: "https://a.go.id/".to_string(),
            attempt: 1,
            delay: Duration::from_secs(2),
        });
        sink.emit(&started("https://a.go.id/", 2));

        assert_eq!(sink.events().len(), 4);
        assert_eq!(sink.attempts_for("https://a.go.id/"), 2);
        assert_eq!(sink.attempts_for("https://b.go.id/"), 1);
        assert_eq!(
            sink.waits_for("https://a.go.id/"),
            vec![Duration::from_secs(2)]
        );
        assert!(sink.waits_for("https://b.go.id/").is_empty());
    }

    #[test]
    fn test_closure_sink() {
        let seen = AtomicUsize::new(0);
        let sink = |_: &FetchEvent| {
            seen.fetch_add(1, Ordering::SeqCst);
        };
        sink.emit(&started("https://a.go.id/", 1));
        sink.emit(&started("https://a.go.id/", 2));
        assert_eq!(seen.load(Ordering::SeqCst), 2);
    }
}
