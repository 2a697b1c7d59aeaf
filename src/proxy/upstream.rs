//! Upstream fetches for relayed routes
//!
//! A deliberately small HTTP client: one `GET` per connection, HTTP/1.0 on
//! the wire so the upstream never answers with its own chunked framing, and
//! the body handed back piece by piece so it can be re-chunked downstream.

use bytes::{Buf, Bytes, BytesMut};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use url::Url;

use crate::http::headers::{HeaderError, Headers, find_crlf};

/// Default buffer size for streaming
const BUFFER_SIZE: usize = 8192;

/// Upper bound on the upstream status line plus header block
const MAX_HEAD_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid upstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("upstream url has no host")]
    MissingHost,
    #[error("timed out connecting to {0}")]
    ConnectTimeout(String),
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
    #[error("upstream response head is too large")]
    HeadTooLarge,
    #[error("invalid upstream header: {0}")]
    InvalidHeader(#[from] HeaderError),
    #[error("upstream i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetches paths relative to a fixed base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    base: Url,
    connect_timeout: Duration,
}

impl UpstreamClient {
    pub fn new(base: &str, connect_timeout: Duration) -> Result<Self, UpstreamError> {
        let mut base = Url::parse(base)?;
        if base.host_str().is_none() {
            return Err(UpstreamError::MissingHost);
        }
        // keep the base path when joining relative paths onto it
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            base,
            connect_timeout,
        })
    }

    /// Resolves `path` (no leading slash needed) against the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, UpstreamError> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    /// Issues a `GET` for `path` and returns once the response head is read.
    pub async fn get(&self, path: &str) -> Result<UpstreamResponse, UpstreamError> {
        let url = self.resolve(path)?;
        let host = url.host_str().ok_or(UpstreamError::MissingHost)?;
        let port = url.port_or_known_default().unwrap_or(80);
        let addr = format!("{}:{}", host, port);

        let mut stream = timeout(self.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| UpstreamError::ConnectTimeout(addr.clone()))??;

        tracing::debug!(upstream = %url, "connected to upstream");

        stream.write_all(&build_get_request(&url)).await?;
        stream.flush().await?;

        UpstreamResponse::read_head(stream).await
    }
}

/// Request bytes for a plain `GET` of `url`.
pub fn build_get_request(url: &Url) -> Vec<u8> {
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nConnection: close\r\nAccept: */*\r\n\r\n",
        target, host
    )
    .into_bytes()
}

/// An upstream response whose body has not been read yet.
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: Headers,
    stream: TcpStream,
    buffer: BytesMut,
    remaining: Option<usize>,
}

impl UpstreamResponse {
    async fn read_head(mut stream: TcpStream) -> Result<Self, UpstreamError> {
        let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);

        let status = loop {
            if let Some(end) = find_crlf(&buffer) {
                let line = buffer.split_to(end + 2);
                break parse_status_line(&line[..end])?;
            }
            read_more(&mut stream, &mut buffer).await?;
        };

        let mut headers = Headers::new();
        loop {
            let (n, done) = headers.parse_one(&buffer)?;
            buffer.advance(n);
            if done {
                break;
            }
            if n == 0 {
                read_more(&mut stream, &mut buffer).await?;
            }
        }

        let remaining = headers
            .get("content-length")
            .map(|v| {
                v.parse::<usize>()
                    .map_err(|_| UpstreamError::MalformedResponse(format!("content-length {v:?}")))
            })
            .transpose()?;

        Ok(Self {
            status,
            headers,
            stream,
            buffer,
            remaining,
        })
    }

    /// Returns the next piece of body, at most `max` bytes, or `None` once
    /// the body is exhausted.
    pub async fn next_chunk(&mut self, max: usize) -> Result<Option<Bytes>, UpstreamError> {
        if self.remaining == Some(0) {
            return Ok(None);
        }

        if self.buffer.is_empty() {
            self.buffer.reserve(max);
            let n = self.stream.read_buf(&mut self.buffer).await?;
            if n == 0 {
                if let Some(left) = self.remaining {
                    return Err(UpstreamError::MalformedResponse(format!(
                        "connection closed with {left} body bytes outstanding"
                    )));
                }
                return Ok(None);
            }
        }

        let mut take = self.buffer.len().min(max);
        if let Some(left) = self.remaining.as_mut() {
            take = take.min(*left);
            *left -= take;
        }

        Ok(Some(self.buffer.split_to(take).freeze()))
    }
}

async fn read_more(stream: &mut TcpStream, buffer: &mut BytesMut) -> Result<(), UpstreamError> {
    if buffer.len() > MAX_HEAD_SIZE {
        return Err(UpstreamError::HeadTooLarge);
    }

    let n = stream.read_buf(buffer).await?;
    if n == 0 {
        return Err(UpstreamError::MalformedResponse(
            "connection closed before response head".to_string(),
        ));
    }
    Ok(())
}

fn parse_status_line(line: &[u8]) -> Result<u16, UpstreamError> {
    let line = String::from_utf8_lossy(line);
    let mut parts = line.splitn(3, ' ');

    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(UpstreamError::MalformedResponse(line.to_string()));
    }

    parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| UpstreamError::MalformedResponse(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_code() {
        assert_eq!(parse_status_line(b"HTTP/1.1 200 OK").unwrap(), 200);
        assert_eq!(parse_status_line(b"HTTP/1.0 404 Not Found").unwrap(), 404);
        assert!(parse_status_line(b"SSH-2.0-OpenSSH").is_err());
    }
}
