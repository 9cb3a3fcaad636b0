//! Chat capability traits

use async_trait::async_trait;

use crate::config::ModelConfig;
use crate::error::ModelFailure;
use crate::streaming::ChunkReader;
use crate::types::ChatMessage;

/// A remote text-generation capability.
///
/// Implementations talk to the actual service; everything in this crate
/// (latency measurement, retries, stream draining) is layered on top.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Error type surfaced by the model. Network-layer failures should expose
    /// [`TransientFailure`](crate::error::TransientFailure) through
    /// [`ModelFailure::as_transient`] to become eligible for retries.
    type Error: ModelFailure;

    /// Produce one complete reply for the conversation.
    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatMessage, Self::Error>;

    /// Start a streamed reply for the conversation.
    async fn stream(&self, messages: &[ChatMessage])
    -> Result<ChunkReader<Self::Error>, Self::Error>;
}

/// Builds a [`ChatModel`] from a validated configuration.
///
/// Used by [`ClientFactory`](crate::client::ClientFactory), which owns the
/// retry and timeout policy around construction.
#[async_trait]
pub trait ModelConnector: Send + Sync {
    type Model: ChatModel;
    type Error: std::error::Error + Send + Sync + 'static;

    async fn connect(&self, config: &ModelConfig) -> Result<Self::Model, Self::Error>;
}
