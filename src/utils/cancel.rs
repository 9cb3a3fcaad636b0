//! Cancellation utilities
//!
//! Provides the close handle shared between a chunk reader and whoever may
//! need to shut it down from another future (typically a cancellation watcher).

use std::future::Future;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

/// A handle that can be used to close a chunk reader.
///
/// Closing is idempotent and safe to call while a read is in flight: the
/// pending read wakes up and reports the reader as closed.
#[derive(Clone, Debug, Default)]
pub struct CloseHandle {
    token: CancellationToken,
}

impl CloseHandle {
    /// Create a new, open handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request close. Any reader observing this handle stops at its next
    /// suspension point and releases the underlying stream.
    pub fn close(&self) {
        self.token.cancel();
    }

    /// Check if close was requested.
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A future that resolves when close is requested.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.token.cancelled()
    }
}

/// Run `future` unless `token` fires first.
///
/// Returns `None` when cancelled; the unfinished future is dropped on the spot.
pub async fn run_until_cancelled<F: Future>(token: &CancellationToken, future: F) -> Option<F::Output> {
    tokio::select! {
        _ = token.cancelled() => None,
        out = future => Some(out),
    }
}
