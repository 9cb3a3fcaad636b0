//! Stream consumer
//!
//! Drains a [`ChunkReader`] into an async writer while a watcher future closes
//! the reader if the caller's token fires. Both futures run on the caller's
//! task and are joined before returning.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

use super::reader::{ChunkReader, RecvError};
use crate::error::{Error, Result, StreamError};

/// Forward every non-empty chunk from `reader` to `writer` until end of
/// stream, a failure, or cancellation through `cancel`.
///
/// The reader is switched to automatic close, so the underlying stream is
/// released on every exit path. The writer is flushed after each chunk.
pub async fn report_stream<E, W>(
    mut reader: ChunkReader<E>,
    writer: &mut W,
    cancel: &CancellationToken,
) -> Result<()>
where
    E: std::error::Error + Send + Sync + 'static,
    W: AsyncWrite + Unpin + ?Sized,
{
    reader.set_automatic_close();
    if cancel.is_cancelled() {
        reader.close();
    }

    let closer = reader.close_handle();
    let done = CancellationToken::new();

    let watcher = async {
        tokio::select! {
            _ = done.cancelled() => {}
            _ = cancel.cancelled() => {
                tracing::debug!("stream cancelled by caller, closing reader");
                closer.close();
            }
        }
    };

    let drain_loop = async {
        let _done = done.clone().drop_guard();
        drain(&mut reader, writer).await
    };

    let ((), result) = tokio::join!(watcher, drain_loop);
    result
}

/// [`report_stream`] to stdout, without cancellation, followed by a newline.
pub async fn report_stream_to_stdout<E>(reader: ChunkReader<E>) -> Result<()>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let mut stdout = tokio::io::stdout();
    report_stream(reader, &mut stdout, &CancellationToken::new()).await?;
    stdout.write_all(b"\n").await.map_err(StreamError::Write)?;
    stdout.flush().await.map_err(StreamError::Write)?;
    Ok(())
}

async fn drain<E, W>(reader: &mut ChunkReader<E>, writer: &mut W) -> Result<()>
where
    E: std::error::Error + Send + Sync + 'static,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut forwarded = 0usize;
    loop {
        match reader.recv().await {
            Ok(Some(chunk)) => {
                if chunk.is_empty() {
                    continue;
                }
                writer
                    .write_all(chunk.content.as_bytes())
                    .await
                    .map_err(StreamError::Write)?;
                writer.flush().await.map_err(StreamError::Write)?;
                forwarded += 1;
            }
            Ok(None) => {
                tracing::debug!(chunks = forwarded, "stream drained");
                return Ok(());
            }
            Err(RecvError::Closed) => {
                tracing::debug!(chunks = forwarded, "stream closed before completion");
                return Err(Error::Cancelled { operation: "stream" });
            }
            Err(RecvError::Failed(e)) => {
                tracing::error!(chunks = forwarded, error = %e, "stream read failed");
                return Err(StreamError::Read(Box::new(e)).into());
            }
        }
    }
}
