//! Request dispatch
//!
//! Maps a parsed request to a response and drives the [`ResponseWriter`]
//! through the sections in order.

mod pages;

use std::path::PathBuf;

use anyhow::Context;
use sha2::{Digest, Sha256};
use tokio::io::AsyncWrite;
use tracing::{debug, warn};

use crate::config::Config;
use crate::http::headers::Headers;
use crate::http::request::Request;
use crate::http::response::{StatusCode, default_headers};
use crate::http::writer::ResponseWriter;
use crate::proxy::UpstreamClient;

/// Largest chunk relayed from upstream in one `write_chunked_body` call
const RELAY_CHUNK_SIZE: usize = 1024;

const RELAY_PREFIX: &str = "/httpbin/";

pub struct Router {
    upstream: UpstreamClient,
    video_path: PathBuf,
}

impl Router {
    pub fn new(upstream: UpstreamClient, video_path: impl Into<PathBuf>) -> Self {
        Self {
            upstream,
            video_path: video_path.into(),
        }
    }

    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let upstream = UpstreamClient::new(&cfg.upstream, cfg.upstream_timeout)
            .with_context(|| format!("bad upstream {}", cfg.upstream))?;
        Ok(Self::new(upstream, cfg.video_path.clone()))
    }

    /// Writes the response for `req`, returning the status that was sent.
    pub async fn dispatch<W>(
        &self,
        w: &mut ResponseWriter<W>,
        req: &Request,
    ) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let target = req.target();

        if let Some(rest) = target.strip_prefix(RELAY_PREFIX) {
            return self.relay(w, rest).await;
        }

        match target {
            "/video" => self.video(w).await,
            "/yourproblem" => html(w, StatusCode::BadRequest, pages::BAD_REQUEST).await,
            "/myproblem" => html(w, StatusCode::InternalServerError, pages::INTERNAL_ERROR).await,
            _ => html(w, StatusCode::Ok, pages::SUCCESS).await,
        }
    }

    async fn video<W>(&self, w: &mut ResponseWriter<W>) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let body = match tokio::fs::read(&self.video_path).await {
            Ok(body) => body,
            Err(e) => {
                warn!(path = %self.video_path.display(), error = %e, "video unavailable");
                return plain(w, StatusCode::InternalServerError, &e.to_string()).await;
            }
        };

        let mut headers = default_headers(body.len());
        headers.override_value("Content-Type", "video/mp4");

        w.write_status_line(StatusCode::Ok).await?;
        w.write_headers(&headers).await?;
        w.write_body(&body).await?;

        Ok(StatusCode::Ok)
    }

    /// Streams an upstream body back as chunks, followed by a digest and
    /// length trailer.
    async fn relay<W>(&self, w: &mut ResponseWriter<W>, path: &str) -> anyhow::Result<StatusCode>
    where
        W: AsyncWrite + Unpin,
    {
        let mut upstream = match self.upstream.get(path).await {
            Ok(res) => res,
            Err(e) => {
                warn!(path, error = %e, "upstream request failed");
                return plain(w, StatusCode::InternalServerError, &e.to_string()).await;
            }
        };

        debug!(path, upstream_status = upstream.status, "relaying upstream body");

        let mut headers = default_headers(0);
        headers.remove("Content-Length");
        headers.add("Transfer-Encoding", "chunked");
        headers.add("Trailer", "X-Content-SHA256, X-Content-Length");

        w.write_status_line(StatusCode::Ok).await?;
        w.write_headers(&headers).await?;

        let mut hasher = Sha256::new();
        let mut total = 0usize;

        loop {
            match upstream.next_chunk(RELAY_CHUNK_SIZE).await {
                Ok(Some(chunk)) => {
                    hasher.update(&chunk);
                    total += chunk.len();
                    w.write_chunked_body(&chunk).await?;
                }
                Ok(None) => break,
                Err(e) => {
                    // the status line is already out; end the body where it stopped
                    warn!(path, error = %e, "upstream body read failed");
                    break;
                }
            }
        }

        let mut trailers = Headers::new();
        trailers.add("X-Content-SHA256", &format!("{:x}", hasher.finalize()));
        trailers.add("X-Content-Length", &total.to_string());

        w.write_chunked_body_done().await?;
        w.write_trailers(&trailers).await?;

        Ok(StatusCode::Ok)
    }
}

async fn html<W>(
    w: &mut ResponseWriter<W>,
    status: StatusCode,
    body: &str,
) -> anyhow::Result<StatusCode>
where
    W: AsyncWrite + Unpin,
{
    let mut headers = default_headers(body.len());
    headers.override_value("Content-Type", "text/html");

    w.write_status_line(status).await?;
    w.write_headers(&headers).await?;
    w.write_body(body.as_bytes()).await?;

    Ok(status)
}

/// Sends `message` as a `text/plain` body.
pub async fn plain<W>(
    w: &mut ResponseWriter<W>,
    status: StatusCode,
    message: &str,
) -> anyhow::Result<StatusCode>
where
    W: AsyncWrite + Unpin,
{
    w.write_status_line(status).await?;
    w.write_headers(&default_headers(message.len())).await?;
    w.write_body(message.as_bytes()).await?;

    Ok(status)
}
