//! HTTP server lifecycle: bind → listen → drain → stop.
//!
//! `Server::bind` owns the listener (bind failure is startup-fatal and
//! surfaces to the caller), `start` serves without blocking, and
//! `ServerHandle::stop` drains in-flight requests up to a deadline before
//! aborting whatever is left. There is no restart path; starting again
//! means binding a fresh `Server`.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// A bound, not-yet-serving listener plus the composed handler.
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    pub async fn bind(addr: SocketAddr, router: Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, router })
    }

    /// Actual bound address; differs from the configured one for port 0.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Begin serving on a background task and hand back the stop handle.
    pub fn start(self) -> ServerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(self.listener, self.router)
                .with_graceful_shutdown(async move {
                    // Resolves on stop() or when the handle is dropped.
                    let _ = shutdown_rx.await;
                })
                .await
        });

        ServerHandle { shutdown_tx, task }
    }
}

/// Stop handle for a listening server.
pub struct ServerHandle {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<std::io::Result<()>>,
}

impl ServerHandle {
    /// Graceful shutdown: stop accepting connections, then wait up to
    /// `grace` for in-flight requests. Exceeding the deadline aborts the
    /// remaining connections — logged, never fatal.
    pub async fn stop(self, grace: Duration) {
        let ServerHandle {
            shutdown_tx,
            mut task,
        } = self;

        let _ = shutdown_tx.send(());
        info!("draining HTTP server");

        match tokio::time::timeout(grace, &mut task).await {
            Ok(Ok(Ok(()))) => info!("HTTP server stopped"),
            Ok(Ok(Err(err))) => error!(error = %err, "HTTP server exited with error"),
            Ok(Err(join_err)) => error!(error = %join_err, "HTTP server task failed"),
            Err(_) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "shutdown deadline exceeded; aborting remaining connections"
                );
                task.abort();
            }
        }
    }
}
