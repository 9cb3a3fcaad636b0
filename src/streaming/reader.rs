//! Chunk reader
//!
//! Wraps a stream of [`ChatChunk`]s with explicit close semantics so it can be
//! shut down from another future while a read is pending.

use futures::Stream;
use futures_util::StreamExt;
use std::fmt;
use std::pin::Pin;
use thiserror::Error;

use crate::types::ChatChunk;
use crate::utils::cancel::CloseHandle;

/// Boxed chunk stream as produced by model adapters.
pub type ChunkStream<E> = Pin<Box<dyn Stream<Item = Result<ChatChunk, E>> + Send>>;

/// Why [`ChunkReader::recv`] did not return a chunk.
#[derive(Debug, Error)]
pub enum RecvError<E> {
    /// The reader was closed, either explicitly or through its [`CloseHandle`].
    #[error("chunk reader closed")]
    Closed,
    /// The underlying stream reported an error.
    #[error(transparent)]
    Failed(E),
}

/// Incremental response sequence.
///
/// - `recv` yields `Ok(Some(chunk))` per chunk and `Ok(None)` at end of stream
/// - `close` (or [`CloseHandle::close`] from elsewhere) releases the stream;
///   a pending `recv` wakes up with [`RecvError::Closed`]
/// - with automatic close enabled, end of stream, a read error or dropping the
///   reader releases the stream as well
pub struct ChunkReader<E> {
    inner: Option<ChunkStream<E>>,
    closer: CloseHandle,
    auto_close: bool,
    finished: bool,
}

impl<E> ChunkReader<E> {
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<ChatChunk, E>> + Send + 'static,
    {
        Self {
            inner: Some(Box::pin(stream)),
            closer: CloseHandle::new(),
            auto_close: false,
            finished: false,
        }
    }

    /// A reader over a fixed list of items, mostly useful for tests and replays.
    pub fn from_items<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Result<ChatChunk, E>>,
        I::IntoIter: Send + 'static,
        E: Send + 'static,
    {
        Self::new(futures_util::stream::iter(items))
    }

    /// Writer/reader pair over a bounded channel. See [`super::pipe::pipe`].
    pub fn pipe(capacity: usize) -> (super::pipe::ChunkWriter<E>, Self)
    where
        E: Send + 'static,
    {
        super::pipe::pipe(capacity)
    }

    /// Handle that closes this reader from another future or task.
    pub fn close_handle(&self) -> CloseHandle {
        self.closer.clone()
    }

    /// Release the underlying stream as soon as the reader finishes, fails or
    /// is dropped.
    pub fn set_automatic_close(&mut self) {
        self.auto_close = true;
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none() || self.closer.is_closed()
    }

    /// Close the reader and drop the underlying stream. Idempotent.
    pub fn close(&mut self) {
        self.closer.close();
        self.inner = None;
    }

    /// Receive the next chunk.
    pub async fn recv(&mut self) -> Result<Option<ChatChunk>, RecvError<E>> {
        if self.finished {
            return Ok(None);
        }

        let next = {
            let Some(inner) = self.inner.as_mut() else {
                return Err(RecvError::Closed);
            };
            if self.closer.is_closed() {
                None
            } else {
                tokio::select! {
                    biased;
                    _ = self.closer.closed() => None,
                    item = inner.next() => Some(item),
                }
            }
        };

        match next {
            None => {
                self.inner = None;
                Err(RecvError::Closed)
            }
            Some(Some(Ok(chunk))) => Ok(Some(chunk)),
            Some(Some(Err(e))) => {
                if self.auto_close {
                    self.close();
                }
                Err(RecvError::Failed(e))
            }
            Some(None) => {
                self.finished = true;
                if self.auto_close {
                    self.inner = None;
                }
                Ok(None)
            }
        }
    }
}

impl<E> Drop for ChunkReader<E> {
    fn drop(&mut self) {
        if self.auto_close {
            self.closer.close();
        }
    }
}

impl<E> fmt::Debug for ChunkReader<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkReader")
            .field("closed", &self.is_closed())
            .field("finished", &self.finished)
            .field("auto_close", &self.auto_close)
            .finish()
    }
}
