//! Retry executor
//!
//! Bounded, classified retries with linear backoff. Waits between attempts
//! race against the caller's cancellation token.

use ::backoff::backoff::Backoff;
use std::future::Future;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use super::policy::RetryPolicy;
use crate::error::{Error, ModelFailure, Result, is_retryable};
use crate::utils::cancel::run_until_cancelled;

/// Retry executor that handles the actual retry logic
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create a new retry executor
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// runs out of attempts, or `cancel` fires during a wait.
    ///
    /// Cancellation is only observed between attempts; an attempt that is
    /// already running is never interrupted.
    pub async fn execute<F, Fut, T, E>(&self, cancel: &CancellationToken, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, E>>,
        E: ModelFailure,
    {
        let started = Instant::now();
        let mut backoff = self.policy.backoff();

        for attempt in 0..self.policy.max_attempts {
            let err = match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempt = attempt + 1,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "operation recovered after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(err) => err,
            };

            let retryable = is_retryable(&err);
            let delay = if retryable { backoff.next_backoff() } else { None };

            let Some(delay) = delay else {
                tracing::error!(
                    attempt = attempt + 1,
                    retryable,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %err,
                    "giving up"
                );
                return Err(Error::RetryExhausted {
                    attempts: attempt + 1,
                    source: Box::new(err),
                });
            };

            tracing::warn!(
                attempt = attempt + 1,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "attempt failed, retrying"
            );

            if run_until_cancelled(cancel, tokio::time::sleep(delay)).await.is_none() {
                tracing::info!(attempt = attempt + 1, "retry wait cancelled");
                return Err(Error::Cancelled {
                    operation: "retry wait",
                });
            }
        }

        Err(Error::Internal(format!(
            "retry loop ended without a result (max_attempts = {})",
            self.policy.max_attempts
        )))
    }
}
