//! In-process chunk pipe
//!
//! A bounded channel whose receiving end is a [`ChunkReader`]. Producers use
//! the [`ChunkWriter`] half; closing the reader stops them at their next send.

use thiserror::Error;
use tokio::sync::mpsc;

use super::reader::ChunkReader;
use crate::types::ChatChunk;
use crate::utils::cancel::CloseHandle;

/// The reading side is gone; nothing more will be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("chunk pipe closed")]
pub struct PipeClosed;

/// Sending half of [`pipe`].
#[derive(Debug)]
pub struct ChunkWriter<E> {
    tx: mpsc::Sender<Result<ChatChunk, E>>,
    closer: CloseHandle,
}

impl<E> Clone for ChunkWriter<E> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            closer: self.closer.clone(),
        }
    }
}

impl<E> ChunkWriter<E> {
    /// Send one chunk, waiting for capacity. Fails once the reader closed.
    pub async fn send(&self, chunk: impl Into<ChatChunk>) -> Result<(), PipeClosed> {
        self.send_item(Ok(chunk.into())).await
    }

    /// Forward a producer-side failure to the reader.
    pub async fn fail(&self, error: E) -> Result<(), PipeClosed> {
        self.send_item(Err(error)).await
    }

    pub fn is_closed(&self) -> bool {
        self.closer.is_closed() || self.tx.is_closed()
    }

    async fn send_item(&self, item: Result<ChatChunk, E>) -> Result<(), PipeClosed> {
        if self.closer.is_closed() {
            return Err(PipeClosed);
        }
        tokio::select! {
            biased;
            _ = self.closer.closed() => Err(PipeClosed),
            sent = self.tx.send(item) => sent.map_err(|_| PipeClosed),
        }
    }
}

/// Create a bounded pipe. Dropping every writer ends the reader's stream.
pub fn pipe<E>(capacity: usize) -> (ChunkWriter<E>, ChunkReader<E>)
where
    E: Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|item| (item, rx))
    });
    let reader = ChunkReader::new(stream);
    let writer = ChunkWriter {
        tx,
        closer: reader.close_handle(),
    };
    (writer, reader)
}
