//! Cooperative shutdown signal
//!
//! A [`ShutdownTrigger`] flips a `watch` flag once; every cloned [`Shutdown`]
//! observes it. The binary triggers it on Ctrl-C.

use std::future::Future;
use std::io;
use tokio::sync::watch;

/// Sending half of the shutdown signal
#[derive(Debug)]
pub struct ShutdownTrigger {
    tx: watch::Sender<bool>,
}

impl ShutdownTrigger {
    /// Requests shutdown; idempotent
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }
}

/// Receiving half of the shutdown signal
#[derive(Debug, Clone)]
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// A signal that never fires
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once shutdown has been requested
    ///
    /// Pends forever when the trigger was dropped without firing.
    pub async fn triggered(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Creates a connected trigger/signal pair
pub fn shutdown_channel() -> (ShutdownTrigger, Shutdown) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger { tx }, Shutdown { rx })
}

/// Turns interrupts into shutdown requests
///
/// The first interrupt fires `trigger`; the function returns `Ok` on the
/// second, so the caller can exit without waiting for the run to wind down.
/// An error from `next_interrupt` ends listening without a forced exit.
pub async fn listen_for_interrupts<F, Fut>(
    trigger: ShutdownTrigger,
    mut next_interrupt: F,
) -> io::Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    next_interrupt().await?;
    tracing::warn!("Interrupt received, stopping (press Ctrl-C again to exit immediately)");
    trigger.trigger();

    next_interrupt().await?;
    tracing::error!("Second interrupt received, exiting");
    Ok(())
}
