//! Scripted chat model and connector for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chatguard::config::ModelConfig;
use chatguard::error::{ModelFailure, TransientFailure};
use chatguard::streaming::ChunkReader;
use chatguard::traits::{ChatModel, ModelConnector};
use chatguard::types::{ChatChunk, ChatMessage};

/// Failure kinds a scripted model can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error("mock timeout")]
    Timeout,
    #[error("mock connection reset")]
    Temporary,
    #[error("mock fatal: {0}")]
    Fatal(String),
}

impl TransientFailure for MockError {
    fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    fn is_temporary(&self) -> bool {
        matches!(self, Self::Temporary)
    }
}

impl ModelFailure for MockError {
    fn as_transient(&self) -> Option<&dyn TransientFailure> {
        match self {
            Self::Timeout | Self::Temporary => Some(self),
            Self::Fatal(_) => None,
        }
    }
}

/// Fails with the scripted errors in order, then answers `reply`.
#[derive(Debug, Default)]
pub struct ScriptedModel {
    failures: Mutex<VecDeque<MockError>>,
    reply: String,
    chunks: Vec<String>,
    calls: AtomicU32,
}

impl ScriptedModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    pub fn failing_with(self, failures: impl IntoIterator<Item = MockError>) -> Self {
        *self.failures.lock().unwrap() = failures.into_iter().collect();
        self
    }

    pub fn streaming(mut self, chunks: &[&str]) -> Self {
        self.chunks = chunks.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_failure(&self) -> Option<MockError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.failures.lock().unwrap().pop_front()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    type Error = MockError;

    async fn generate(&self, _messages: &[ChatMessage]) -> Result<ChatMessage, MockError> {
        match self.next_failure() {
            Some(err) => Err(err),
            None => Ok(ChatMessage::assistant(self.reply.clone())),
        }
    }

    async fn stream(&self, _messages: &[ChatMessage]) -> Result<ChunkReader<MockError>, MockError> {
        if let Some(err) = self.next_failure() {
            return Err(err);
        }
        let items: Vec<Result<ChatChunk, MockError>> = self
            .chunks
            .iter()
            .map(|c| Ok(ChatChunk::new(c.as_str())))
            .collect();
        Ok(ChunkReader::from_items(items))
    }
}

/// Connector whose first `fail_first` connects fail.
#[derive(Debug, Default)]
pub struct FlakyConnector {
    fail_first: u32,
    calls: AtomicU32,
}

impl FlakyConnector {
    pub fn new(fail_first: u32) -> Self {
        Self {
            fail_first,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelConnector for FlakyConnector {
    type Model = ScriptedModel;
    type Error = MockError;

    async fn connect(&self, config: &ModelConfig) -> Result<ScriptedModel, MockError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.fail_first {
            Err(MockError::Temporary)
        } else {
            Ok(ScriptedModel::new(&config.model))
        }
    }
}
