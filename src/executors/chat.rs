//! Chat executor
//!
//! One call to the model per invocation. Latency is measured and logged, and
//! failures are wrapped in [`GenerationError`] with the original error kept as
//! the source. No retries happen here; see [`crate::retry`].

use std::time::Instant;
use tracing::Instrument;

use crate::error::GenerationError;
use crate::streaming::ChunkReader;
use crate::traits::ChatModel;
use crate::types::ChatMessage;

/// Generate one complete reply.
pub async fn generate<M>(
    model: &M,
    messages: &[ChatMessage],
) -> Result<ChatMessage, GenerationError<M::Error>>
where
    M: ChatModel + ?Sized,
{
    let span = tracing::info_span!(
        "chat.generate",
        request_id = %uuid::Uuid::new_v4(),
        messages = messages.len(),
    );

    async move {
        tracing::debug!("generate started");
        let start = Instant::now();
        let result = model.generate(messages).await;
        let elapsed = start.elapsed();

        match result {
            Ok(message) => {
                tracing::info!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    reply_len = message.content.len(),
                    "generate completed"
                );
                Ok(message)
            }
            Err(source) => {
                tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %source,
                    "generate failed"
                );
                Err(GenerationError {
                    operation: "generate",
                    elapsed,
                    source,
                })
            }
        }
    }
    .instrument(span)
    .await
}

/// Open a streamed reply. Latency covers opening the stream only.
pub async fn stream<M>(
    model: &M,
    messages: &[ChatMessage],
) -> Result<ChunkReader<M::Error>, GenerationError<M::Error>>
where
    M: ChatModel + ?Sized,
{
    let span = tracing::info_span!(
        "chat.stream",
        request_id = %uuid::Uuid::new_v4(),
        messages = messages.len(),
    );

    async move {
        tracing::debug!("stream open started");
        let start = Instant::now();
        let result = model.stream(messages).await;
        let elapsed = start.elapsed();

        match result {
            Ok(reader) => {
                tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "stream opened");
                Ok(reader)
            }
            Err(source) => {
                tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %source,
                    "stream open failed"
                );
                Err(GenerationError {
                    operation: "stream",
                    elapsed,
                    source,
                })
            }
        }
    }
    .instrument(span)
    .await
}
