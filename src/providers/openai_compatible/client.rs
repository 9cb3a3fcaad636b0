//! OpenAI-compatible chat client

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use super::error::HttpFailure;
use super::streaming::chunk_stream;
use super::types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::ModelConfig;
use crate::streaming::ChunkReader;
use crate::traits::{ChatModel, ModelConnector};
use crate::types::ChatMessage;

/// Used when the configuration has no base URL override.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const ERROR_SAMPLE_LEN: usize = 200;

/// Chat client for `POST {base_url}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    http: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    temperature: f32,
    request_timeout: Duration,
}

impl OpenAiCompatClient {
    /// Create a client with its own HTTP connection pool.
    pub fn new(config: &ModelConfig) -> Result<Self, HttpFailure> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(config.timeout))
            .build()?;
        Ok(Self::with_http_client(config, http))
    }

    /// Create a client sharing an existing HTTP client.
    pub fn with_http_client(config: &ModelConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            request_timeout: config.timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    async fn send(&self, messages: &[ChatMessage], stream: bool) -> Result<reqwest::Response, HttpFailure> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            stream,
        };

        let mut request = self
            .http
            .post(self.endpoint())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body);
        request = if stream {
            request.header(reqwest::header::ACCEPT, "text/event-stream")
        } else {
            request.timeout(self.request_timeout)
        };

        tracing::debug!(model = %self.model, stream, messages = messages.len(), "sending chat request");
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    tracing::debug!(status = status.as_u16(), error = %e, "failed to read error body");
                    String::new()
                }
            };
            return Err(HttpFailure::Status {
                status: status.as_u16(),
                message: error_message(&error_text),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ChatModel for OpenAiCompatClient {
    type Error = HttpFailure;

    async fn generate(&self, messages: &[ChatMessage]) -> Result<ChatMessage, HttpFailure> {
        let response = self.send(messages, false).await?;
        let text = response.text().await?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&text)
            .map_err(|e| HttpFailure::Parse(format!("invalid chat completion: {e}")))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| HttpFailure::Parse("response contained no choices".to_string()))?;

        Ok(ChatMessage::assistant(choice.message.content.unwrap_or_default()))
    }

    async fn stream(&self, messages: &[ChatMessage]) -> Result<ChunkReader<HttpFailure>, HttpFailure> {
        let response = self.send(messages, true).await?;
        Ok(ChunkReader::new(chunk_stream(response)))
    }
}

/// Builds [`OpenAiCompatClient`]s, optionally sharing one HTTP client.
#[derive(Debug, Clone, Default)]
pub struct OpenAiCompatConnector {
    http: Option<reqwest::Client>,
}

impl OpenAiCompatConnector {
    pub const fn new() -> Self {
        Self { http: None }
    }

    pub fn with_http_client(http: reqwest::Client) -> Self {
        Self { http: Some(http) }
    }
}

#[async_trait]
impl ModelConnector for OpenAiCompatConnector {
    type Model = OpenAiCompatClient;
    type Error = HttpFailure;

    async fn connect(&self, config: &ModelConfig) -> Result<OpenAiCompatClient, HttpFailure> {
        match &self.http {
            Some(http) => Ok(OpenAiCompatClient::with_http_client(config, http.clone())),
            None => OpenAiCompatClient::new(config),
        }
    }
}

/// `error.message` from a JSON error body, else a prefix of the raw body.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.error.message;
    }
    let trimmed = body.trim();
    match trimmed.char_indices().nth(ERROR_SAMPLE_LEN) {
        Some((cut, _)) => format!("{}...", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_defaults_and_trailing_slash() {
        let client = OpenAiCompatClient::with_http_client(
            &ModelConfig::new("sk-test", "gpt-test"),
            reqwest::Client::new(),
        );
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
        assert_eq!(client.endpoint(), "https://api.openai.com/v1/chat/completions");

        let client = OpenAiCompatClient::with_http_client(
            &ModelConfig::new("sk-test", "gpt-test").with_base_url("http://localhost:8080/v1/"),
            reqwest::Client::new(),
        );
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/chat/completions");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let client = OpenAiCompatClient::with_http_client(
            &ModelConfig::new("sk-very-secret", "gpt-test"),
            reqwest::Client::new(),
        );
        assert!(!format!("{client:?}").contains("sk-very-secret"));
    }

    #[test]
    fn error_message_prefers_the_api_message() {
        assert_eq!(
            error_message(r#"{"error":{"message":"rate limited","type":"requests"}}"#),
            "rate limited"
        );
        assert_eq!(error_message("  bad gateway  "), "bad gateway");

        let long = "x".repeat(500);
        let sample = error_message(&long);
        assert_eq!(sample.len(), ERROR_SAMPLE_LEN + 3);
        assert!(sample.ends_with("..."));
    }
}
