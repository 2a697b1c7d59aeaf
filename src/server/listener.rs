use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::http::connection::Connection;
use crate::routes::Router;

/// A running server. Dropping it does not stop the accept loop; call
/// [`Server::close`].
pub struct Server {
    local_addr: SocketAddr,
    closed: Arc<AtomicBool>,
    accept_task: JoinHandle<()>,
}

impl Server {
    /// Binds `addr` and starts accepting connections in the background.
    pub async fn serve(addr: &str, router: Router) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("Listening on {}", local_addr);

        let closed = Arc::new(AtomicBool::new(false));
        let accept_task = tokio::spawn(accept_loop(listener, Arc::new(router), closed.clone()));

        Ok(Self {
            local_addr,
            closed,
            accept_task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stops accepting new connections. In-flight connections run to
    /// completion on their own.
    pub async fn close(self) {
        self.closed.store(true, Ordering::SeqCst);
        self.accept_task.abort();
        let _ = self.accept_task.await;
        info!("Server closed");
    }
}

async fn accept_loop(listener: TcpListener, router: Arc<Router>, closed: Arc<AtomicBool>) {
    loop {
        if closed.load(Ordering::SeqCst) {
            break;
        }

        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                if closed.load(Ordering::SeqCst) {
                    break;
                }
                error!("Error accepting connection: {}", e);
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let router = router.clone();
        tokio::spawn(async move {
            let conn = Connection::new(socket, peer.to_string(), router);
            if let Err(e) = conn.run().await {
                error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
