//! Newline-delimited JSON framing over a buffered stream.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufStream};

/// Largest accepted frame, newline included.
const MAX_FRAME_BYTES: u64 = 8 * 1024 * 1024;

/// Errors raised while reading a frame.
#[derive(Debug, Error)]
pub(crate) enum FrameError {
    /// The stream failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The peer closed the stream before a complete frame arrived.
    #[error("peer closed the connection")]
    Closed,
    /// The frame exceeded [`MAX_FRAME_BYTES`].
    #[error("frame exceeds {MAX_FRAME_BYTES} bytes")]
    TooLarge,
    /// The frame was not valid JSON for the expected type.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Buffered stream that reads and writes one JSON value per line.
#[derive(Debug)]
pub(crate) struct FrameStream<S> {
    inner: BufStream<S>,
    line: String,
}

impl<S> FrameStream<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: S) -> Self {
        Self {
            inner: BufStream::new(stream),
            line: String::new(),
        }
    }

    pub(crate) async fn write_frame<T: Serialize>(&mut self, frame: &T) -> std::io::Result<()> {
        let mut bytes = serde_json::to_vec(frame)?;
        bytes.push(b'\n');
        self.inner.write_all(&bytes).await?;
        self.inner.flush().await
    }

    pub(crate) async fn read_frame<T: DeserializeOwned>(&mut self) -> Result<T, FrameError> {
        self.line.clear();
        let read = (&mut self.inner)
            .take(MAX_FRAME_BYTES)
            .read_line(&mut self.line)
            .await?;
        if !self.line.ends_with('\n') {
            return Err(if u64::try_from(read).is_ok_and(|n| n >= MAX_FRAME_BYTES) {
                FrameError::TooLarge
            } else {
                FrameError::Closed
            });
        }
        Ok(serde_json::from_str(self.line.trim_end())?)
    }

    pub(crate) async fn shutdown(&mut self) -> std::io::Result<()> {
        self.inner.shutdown().await
    }
}
