use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::http::headers::Headers;
use crate::http::response::StatusCode;

/// Which section of the response the writer expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    StatusLine,
    Headers,
    Body,
    Trailers,
    /// Trailers written; nothing more may be sent.
    Finished,
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("cannot write {op} while in state {state:?}")]
    OutOfOrder { op: &'static str, state: WriterState },
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes one response onto `W`, enforcing section order.
///
/// Fixed-length responses go `write_status_line → write_headers →
/// write_body`. Chunked responses replace `write_body` with any number of
/// `write_chunked_body` calls followed by `write_chunked_body_done` and
/// `write_trailers`.
pub struct ResponseWriter<W> {
    writer: W,
    state: WriterState,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            state: WriterState::StatusLine,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn expect(&self, op: &'static str, state: WriterState) -> Result<(), WriteError> {
        if self.state != state {
            return Err(WriteError::OutOfOrder {
                op,
                state: self.state,
            });
        }
        Ok(())
    }

    fn advance(&mut self, next: WriterState) {
        trace!(from = ?self.state, to = ?next, "response writer advanced");
        self.state = next;
    }

    pub async fn write_status_line(&mut self, status: StatusCode) -> Result<(), WriteError> {
        self.expect("status line", WriterState::StatusLine)?;

        // the phase moves on even if the write below fails
        self.advance(WriterState::Headers);
        self.writer
            .write_all(status.status_line().as_bytes())
            .await?;

        Ok(())
    }

    pub async fn write_headers(&mut self, headers: &Headers) -> Result<(), WriteError> {
        self.expect("headers", WriterState::Headers)?;

        self.advance(WriterState::Body);
        self.writer.write_all(&serialize_headers(headers)).await?;

        Ok(())
    }

    /// Writes a fixed-length body verbatim.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<usize, WriteError> {
        self.expect("body", WriterState::Body)?;

        self.advance(WriterState::Trailers);
        self.writer.write_all(body).await?;

        Ok(body.len())
    }

    /// Writes one chunk and flushes it. May be called repeatedly.
    ///
    /// Returns the number of payload bytes written.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, WriteError> {
        self.expect("chunked body", WriterState::Body)?;

        let mut frame = Vec::with_capacity(chunk.len() + 12);
        frame.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
        frame.extend_from_slice(chunk);
        frame.extend_from_slice(b"\r\n");

        self.writer.write_all(&frame).await?;
        self.writer.flush().await?;

        Ok(chunk.len())
    }

    /// Emits the zero-length chunk ending a chunked body.
    pub async fn write_chunked_body_done(&mut self) -> Result<(), WriteError> {
        self.advance(WriterState::Trailers);

        self.writer.write_all(b"0\r\n").await?;
        self.writer.flush().await?;

        Ok(())
    }

    pub async fn write_trailers(&mut self, trailers: &Headers) -> Result<(), WriteError> {
        self.expect("trailers", WriterState::Trailers)?;

        self.advance(WriterState::Finished);
        self.writer.write_all(&serialize_headers(trailers)).await?;
        self.writer.flush().await?;

        Ok(())
    }

    pub async fn flush(&mut self) -> Result<(), WriteError> {
        self.writer.flush().await?;
        Ok(())
    }
}

fn serialize_headers(headers: &Headers) -> Vec<u8> {
    let mut buf = Vec::new();

    for (k, v) in headers.iter() {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}
