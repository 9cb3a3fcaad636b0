//! Streaming
//!
//! Chunk readers handed out by streamed generations, an in-process pipe for
//! producing them, and the consumer that drains them into a writer.

pub mod pipe;
pub mod reader;
pub mod report;

pub use pipe::{ChunkWriter, PipeClosed, pipe};
pub use reader::{ChunkReader, ChunkStream, RecvError};
pub use report::{report_stream, report_stream_to_stdout};
