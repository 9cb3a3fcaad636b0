//! Core error types

use std::time::Duration;
use thiserror::Error;

use super::transient::{ModelFailure, TransientFailure};

/// Type-erased error carried as a `source` so the original stays downcastable.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error returned by the orchestration entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or malformed configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The chat model could not be constructed
    #[error(transparent)]
    ClientCreation(#[from] ClientCreationError),

    /// A single generation call failed (no retry context)
    #[error("{0}")]
    Generation(#[source] BoxError),

    /// Retries stopped, either because the error was not retryable or because
    /// the attempt budget ran out. `source` is the last underlying error.
    #[error("after {attempts} attempt(s): {source}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        source: BoxError,
    },

    /// The caller's cancellation token fired while waiting or streaming
    #[error("{operation} cancelled")]
    Cancelled { operation: &'static str },

    /// Reading from or writing out a chunk stream failed
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Invariant violation; should be unreachable
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    pub const fn is_retry_exhausted(&self) -> bool {
        matches!(self, Self::RetryExhausted { .. })
    }

    /// Number of attempts consumed, when the error came out of the retry loop.
    pub const fn attempts(&self) -> Option<u32> {
        match self {
            Self::RetryExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// Find an error of type `T` anywhere along this error's `source()` chain.
    pub fn find_source<T: std::error::Error + 'static>(&self) -> Option<&T> {
        super::helpers::find_source(self)
    }
}

impl<E: ModelFailure> From<GenerationError<E>> for Error {
    fn from(err: GenerationError<E>) -> Self {
        Self::Generation(Box::new(err))
    }
}

/// Configuration validation failure. Always names the offending key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key} environment variable is required")]
    Missing { key: &'static str },

    #[error("invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    /// The configuration key this error is about.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Missing { key } | Self::Invalid { key, .. } => key,
        }
    }

    pub(crate) fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Chat model construction failure, terminal for the caller.
#[derive(Debug, Error)]
pub enum ClientCreationError {
    #[error("chat model creation timed out after {timeout:?} ({attempts} attempt(s) started)")]
    Timeout { timeout: Duration, attempts: u32 },

    #[error("failed to create chat model after {attempts} attempt(s): {source}")]
    Exhausted {
        attempts: u32,
        #[source]
        source: BoxError,
    },
}

impl ClientCreationError {
    pub const fn attempts(&self) -> u32 {
        match self {
            Self::Timeout { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }
}

/// A single call to the model failed.
///
/// The model's own error is kept as-is in `source`, so it can be matched
/// directly or found through the `source()` chain once boxed.
#[derive(Debug, Error)]
#[error("generation failed ({operation} after {elapsed:?}): {source}")]
pub struct GenerationError<E> {
    /// `"generate"` or `"stream"`
    pub operation: &'static str,
    /// Wall-clock time spent in the failed call
    pub elapsed: Duration,
    #[source]
    pub source: E,
}

impl<E> GenerationError<E> {
    pub fn inner(&self) -> &E {
        &self.source
    }

    pub fn into_inner(self) -> E {
        self.source
    }
}

impl<E: ModelFailure> ModelFailure for GenerationError<E> {
    fn as_transient(&self) -> Option<&dyn TransientFailure> {
        self.source.as_transient()
    }
}

/// Failure while draining a chunk stream.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("stream error: {0}")]
    Read(#[source] BoxError),

    #[error("write error: {0}")]
    Write(#[source] std::io::Error),
}
