//! Streaming chunk type

use serde::{Deserialize, Serialize};

/// One incremental fragment of a streamed response.
///
/// An empty chunk is not a terminator; the end of a stream is signalled by
/// the reader, not by the chunk contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatChunk {
    pub content: String,
}

impl ChatChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl From<&str> for ChatChunk {
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl From<String> for ChatChunk {
    fn from(content: String) -> Self {
        Self::new(content)
    }
}
