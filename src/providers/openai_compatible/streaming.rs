//! SSE decoding for streamed chat completions
//!
//! Uses eventsource-stream for line buffering and UTF-8 boundaries, then maps
//! each `data:` payload to zero or more [`ChatChunk`]s. `data: [DONE]` ends
//! the stream.

use eventsource_stream::{EventStreamError, Eventsource};
use futures::Stream;
use futures_util::StreamExt;

use super::error::HttpFailure;
use super::types::ChatCompletionChunk;
use crate::types::ChatChunk;

const DONE_MARKER: &str = "[DONE]";

/// Chunk stream over a successful streaming response.
pub fn chunk_stream(
    response: reqwest::Response,
) -> impl Stream<Item = Result<ChatChunk, HttpFailure>> + Send + 'static {
    let mut events = Box::pin(response.bytes_stream().eventsource());

    async_stream::stream! {
        while let Some(event) = events.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    yield Err(sse_failure(e));
                    break;
                }
            };

            match parse_event_data(&event.data) {
                Ok(Some(chunks)) => {
                    for chunk in chunks {
                        yield Ok(chunk);
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    }
}

/// Chunks carried by one event, or `None` at the end marker.
pub fn parse_event_data(data: &str) -> Result<Option<Vec<ChatChunk>>, HttpFailure> {
    let data = data.trim();
    if data == DONE_MARKER {
        return Ok(None);
    }
    if data.is_empty() {
        return Ok(Some(Vec::new()));
    }

    let chunk: ChatCompletionChunk = serde_json::from_str(data)
        .map_err(|e| HttpFailure::Parse(format!("invalid stream chunk: {e}")))?;
    Ok(Some(
        chunk
            .choices
            .into_iter()
            .filter_map(|choice| choice.delta.content)
            .map(ChatChunk::new)
            .collect(),
    ))
}

fn sse_failure(err: EventStreamError<reqwest::Error>) -> HttpFailure {
    match err {
        EventStreamError::Transport(e) => HttpFailure::Transport(e),
        other => HttpFailure::Sse(other.to_string()),
    }
}
