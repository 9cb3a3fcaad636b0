//! Retry module
//! - backoff.rs: linear backoff schedule (`backoff` crate trait)
//! - policy.rs: per-call retry policy
//! - executor.rs: classified, cancellable retry loop

pub mod backoff;
pub mod executor;
pub mod policy;

pub use self::backoff::LinearBackoff;
pub use executor::RetryExecutor;
pub use policy::RetryPolicy;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::executors::chat;
use crate::traits::ChatModel;
use crate::types::ChatMessage;

/// [`chat::generate`] under `policy`, cancellable through `cancel`.
///
/// Only errors the model marks as transient are retried. Whatever stops the
/// loop is returned as [`Error::RetryExhausted`](crate::Error::RetryExhausted)
/// with the last error as its source, or as
/// [`Error::Cancelled`](crate::Error::Cancelled).
pub async fn generate_with_retry<M>(
    model: &M,
    messages: &[ChatMessage],
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<ChatMessage>
where
    M: ChatModel + ?Sized,
{
    RetryExecutor::new(policy.clone())
        .execute(cancel, || chat::generate(model, messages))
        .await
}
