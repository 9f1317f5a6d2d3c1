//! Request pacing and cancellation for paginated fetches.
//!
//! Week requests are spaced out by a [`RequestPacer`]. Production code uses
//! [`TokioPacer`], which sleeps; tests inject a pacer that returns at once.
//! A [`CancelToken`] lets the owner of a long fetch stop it between weeks.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Waits between consecutive upstream requests.
pub trait RequestPacer: Send + Sync {
    /// Completes once `delay` has been observed.
    fn pause(&self, delay: Duration) -> BoxFuture<'_, ()>;
}

/// Pacer backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl RequestPacer for TokioPacer {
    fn pause(&self, delay: Duration) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        })
    }
}

/// Owner side of a [`CancelToken`].
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Signals every token created from this handle.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

/// Checked between week fetches; once cancelled, pagination stops.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    rx: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// A token that never fires.
    pub fn never() -> Self {
        Self::default()
    }

    /// Creates a linked handle/token pair.
    pub fn new() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (
            CancelHandle { tx },
            Self {
                rx: Some(rx),
                deadline: None,
            },
        )
    }

    /// Builder method to also fire once `deadline` has passed.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Builder method to fire `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns true if the handle fired or the deadline passed.
    pub fn is_cancelled(&self) -> bool {
        let signalled = self.rx.as_ref().is_some_and(|rx| *rx.borrow());
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        signalled || expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_token_does_not_fire() {
        assert!(!CancelToken::never().is_cancelled());
    }

    #[test]
    fn handle_cancels_all_clones() {
        let (handle, token) = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        handle.cancel();
        assert!(token.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_fires_after_timeout() {
        let token = CancelToken::never().with_timeout(Duration::from_secs(5));
        assert!(!token.is_cancelled());

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(token.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn tokio_pacer_sleeps_for_delay() {
        let start = Instant::now();
        TokioPacer.pause(Duration::from_secs(1)).await;
        assert!(start.elapsed() >= Duration::from_secs(1));
    }
}
