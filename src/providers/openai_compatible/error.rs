//! HTTP adapter errors

use thiserror::Error;

use crate::error::{ModelFailure, TransientFailure, find_source};

/// Failure talking to an OpenAI-compatible endpoint.
#[derive(Debug, Error)]
pub enum HttpFailure {
    /// Connect, send or body read failed at the transport level
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// The body did not have the expected shape
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The event stream was malformed
    #[error("SSE parsing error: {0}")]
    Sse(String),
}

impl HttpFailure {
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl TransientFailure for HttpFailure {
    fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => {
                e.is_timeout() || find_source::<std::io::Error>(e).is_some_and(|io| io.is_timeout())
            }
            Self::Status { status, .. } => *status == 408,
            _ => false,
        }
    }

    fn is_temporary(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || connection_dropped(e),
            Self::Status { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }
}

/// The peer reset or closed an established connection before answering.
fn connection_dropped(e: &reqwest::Error) -> bool {
    if let Some(io) = find_source::<std::io::Error>(e) {
        return io.is_temporary();
    }
    find_source::<hyper::Error>(e).is_some_and(|h| h.is_incomplete_message() || h.is_closed())
}

impl ModelFailure for HttpFailure {
    fn as_transient(&self) -> Option<&dyn TransientFailure> {
        match self {
            Self::Transport(_) | Self::Status { .. } => Some(self),
            Self::Parse(_) | Self::Sse(_) => None,
        }
    }
}
