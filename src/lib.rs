//! chatguard
//!
//! Retry, cancellation and streaming guard rails in front of a chat-completion model.
//!
//! The crate is organised leaf-first:
//! - [`config`]: validated, defaulted model configuration loaded from a key/value source
//! - [`client`]: client factory with linear-backoff construction retries under a hard timeout
//! - [`executors`]: single-shot generate / stream invocations with latency measurement
//! - [`retry`]: classified, cancellable retry orchestration
//! - [`streaming`]: chunk readers and the stream consumer that drains them into a writer
//! - [`template`]: the fixed-order conversation assembler
//!
//! # Example
//!
//! ```rust,no_run
//! use chatguard::prelude::*;
//!
//! # async fn example() -> Result<(), chatguard::Error> {
//! let model = chatguard::providers::openai_compatible::create_chat_model_from_env().await?;
//! let messages = create_messages_from_template();
//! let cancel = CancellationToken::new();
//!
//! let reply = generate_with_retry(&model, &messages, &RetryPolicy::default(), &cancel).await?;
//! println!("{}", reply.content);
//!
//! let reader = stream(&model, &messages).await?;
//! report_stream(reader, &mut tokio::io::stdout(), &cancel).await?;
//! # Ok(())
//! # }
//! ```
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod executors;
pub mod observability;
#[cfg(feature = "openai")]
pub mod providers;
pub mod retry;
pub mod streaming;
pub mod template;
pub mod traits;
pub mod types;
pub mod utils;

pub use error::{Error, Result};

/// Commonly used items.
pub mod prelude {
    pub use crate::client::ClientFactory;
    pub use crate::config::{ConfigSource, EnvSource, ModelConfig};
    pub use crate::error::{
        ClientCreationError, ConfigError, Error, GenerationError, ModelFailure, StreamError,
        TransientFailure, is_retryable,
    };
    pub use crate::executors::chat::{generate, stream};
    pub use crate::retry::{RetryExecutor, RetryPolicy, generate_with_retry};
    pub use crate::streaming::{ChunkReader, RecvError, report_stream};
    pub use crate::template::{Persona, create_messages, create_messages_from_template};
    pub use crate::traits::{ChatModel, ModelConnector};
    pub use crate::types::{ChatChunk, ChatMessage, Conversation, MessageRole};
    pub use tokio_util::sync::CancellationToken;
}
