use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{info, warn};

use crate::http::parser::request_from_reader;
use crate::http::response::StatusCode;
use crate::http::writer::ResponseWriter;
use crate::routes::{self, Router};

/// One accepted connection: read a single request, answer it, close.
pub struct Connection<S> {
    stream: S,
    peer: String,
    router: Arc<Router>,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: impl Into<String>, router: Arc<Router>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            router,
        }
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        let parsed = request_from_reader(&mut self.stream).await;

        let mut writer = ResponseWriter::new(&mut self.stream);

        match parsed {
            Ok(req) if req.is_done() => {
                let status = self.router.dispatch(&mut writer, &req).await?;
                info!(
                    peer = %self.peer,
                    method = req.method(),
                    target = req.target(),
                    status = status.as_u16(),
                    "request served"
                );
            }

            Ok(req) => {
                warn!(peer = %self.peer, state = ?req.state(), "connection closed mid-request");
                routes::plain(&mut writer, StatusCode::BadRequest, "incomplete request").await?;
            }

            Err(e) => {
                warn!(peer = %self.peer, error = %e, "failed to parse request");
                routes::plain(&mut writer, StatusCode::BadRequest, &e.to_string()).await?;
            }
        }

        writer.flush().await?;
        drop(writer);
        self.stream.shutdown().await?;

        Ok(())
    }
}
