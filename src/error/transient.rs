//! Retry classification
//!
//! Whether a failure is worth retrying is decided by capability, not by type
//! inspection: errors coming out of a chat model opt into [`TransientFailure`]
//! through [`ModelFailure::as_transient`]. Anything that does not expose the
//! capability is treated as permanent.

use std::io;

/// Network-layer view of a failure.
pub trait TransientFailure {
    /// The operation ran out of time.
    fn is_timeout(&self) -> bool;

    /// The condition is expected to clear up on its own (connection reset,
    /// overloaded upstream, ...).
    fn is_temporary(&self) -> bool;
}

/// Errors surfaced by a [`ChatModel`](crate::traits::ChatModel).
///
/// The default implementation exposes no transient view, so opaque errors
/// are never retried.
pub trait ModelFailure: std::error::Error + Send + Sync + 'static {
    fn as_transient(&self) -> Option<&dyn TransientFailure> {
        None
    }
}

/// Retryable iff the error is a network-layer failure reporting a timeout
/// or a temporary condition.
pub fn is_retryable<E: ModelFailure + ?Sized>(error: &E) -> bool {
    error
        .as_transient()
        .is_some_and(|t| t.is_timeout() || t.is_temporary())
}

impl TransientFailure for io::Error {
    fn is_timeout(&self) -> bool {
        self.kind() == io::ErrorKind::TimedOut
    }

    fn is_temporary(&self) -> bool {
        matches!(
            self.kind(),
            io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::Interrupted
                | io::ErrorKind::WouldBlock
        )
    }
}

impl ModelFailure for io::Error {
    fn as_transient(&self) -> Option<&dyn TransientFailure> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("{msg}")]
    struct FakeNetError {
        msg: &'static str,
        timeout: bool,
        temporary: bool,
    }

    impl TransientFailure for FakeNetError {
        fn is_timeout(&self) -> bool {
            self.timeout
        }
        fn is_temporary(&self) -> bool {
            self.temporary
        }
    }

    impl ModelFailure for FakeNetError {
        fn as_transient(&self) -> Option<&dyn TransientFailure> {
            Some(self)
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("other")]
    struct Generic;

    impl ModelFailure for Generic {}

    fn net(timeout: bool, temporary: bool) -> FakeNetError {
        FakeNetError {
            msg: "net",
            timeout,
            temporary,
        }
    }

    #[test]
    fn classification_table() {
        assert!(is_retryable(&net(true, false)));
        assert!(is_retryable(&net(false, true)));
        assert!(is_retryable(&net(true, true)));
        assert!(!is_retryable(&net(false, false)));
        assert!(!is_retryable(&Generic));
    }

    #[test]
    fn io_errors_classify_by_kind() {
        assert!(is_retryable(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(is_retryable(&io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(!is_retryable(&io::Error::from(io::ErrorKind::PermissionDenied)));
        assert!(!is_retryable(&io::Error::other("opaque")));
    }
}
