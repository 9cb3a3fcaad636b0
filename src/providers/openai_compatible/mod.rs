//! OpenAI-compatible provider
//!
//! A [`ChatModel`](crate::traits::ChatModel) for any endpoint speaking the
//! OpenAI chat completions protocol (JSON replies and SSE streams).

pub mod client;
pub mod error;
pub mod streaming;
pub mod types;

pub use client::{DEFAULT_BASE_URL, OpenAiCompatClient, OpenAiCompatConnector};
pub use error::HttpFailure;

use crate::client::ClientFactory;
use crate::config::ModelConfig;
use crate::error::Result;

/// Validate `config` and build a client through [`ClientFactory`].
pub async fn create_chat_model(config: &ModelConfig) -> Result<OpenAiCompatClient> {
    config.validate()?;
    let client = ClientFactory::new(OpenAiCompatConnector::new())
        .build(config)
        .await?;
    Ok(client)
}

/// [`create_chat_model`] with the configuration read from the environment.
pub async fn create_chat_model_from_env() -> Result<OpenAiCompatClient> {
    let config = ModelConfig::from_env()?;
    create_chat_model(&config).await
}
