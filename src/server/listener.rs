//! Listener Module
//!
//! Accepts TCP connections and dispatches each one to its own task.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::{Result, ServerError};
use crate::server::connection::handle_connection;
use crate::server::handlers::AppState;

// == Server ==
/// The listening socket plus the shared application state.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    state: AppState,
}

impl Server {
    // == Bind ==
    /// Binds the listening socket.
    ///
    /// The process cannot proceed without its socket, so a bind failure is
    /// fatal and propagated to the caller.
    pub async fn bind(addr: &str, state: AppState) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        info!(addr, "server listening");

        Ok(Self { listener, state })
    }

    // == Local Addr ==
    /// Returns the bound address. Binding port 0 resolves to the actual
    /// ephemeral port here.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    // == Run ==
    /// Accepts connections forever, spawning one handler task each.
    ///
    /// Unbounded on purpose: no worker pool, no connection limit, no
    /// backpressure. A failed accept is logged and skipped; it never stops
    /// the loop. The future runs until dropped (e.g. by the shutdown
    /// select in `main`), at which point the socket closes and in-flight
    /// connections are abandoned rather than drained.
    pub async fn run(self) {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    let state = self.state.clone();
                    tokio::spawn(async move {
                        handle_connection(stream, state, peer).await;
                    });
                }
                Err(e) => {
                    warn!(error = %e, "failed to accept connection");
                }
            }
        }
    }
}
