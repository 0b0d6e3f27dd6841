//! Connection Handler Module
//!
//! Drives a single client connection: newline-delimited keys in, one value
//! line out per key. Requests on one connection are strictly sequential;
//! concurrency arises only across connections.

use std::net::SocketAddr;

use tokio::io::{split, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{info, warn};

use crate::error::Result;
use crate::server::handlers::{lookup_or_recompute, AppState};

/// Runs one client connection to completion.
///
/// Transport errors are resolved here by closing this connection; they
/// never reach other connections or the listener.
pub async fn handle_connection(stream: TcpStream, state: AppState, peer: SocketAddr) {
    info!(%peer, "client connected");

    match serve(stream, &state).await {
        Ok(()) => info!(%peer, "connection closed"),
        Err(e) => warn!(%peer, error = %e, "connection closed with error"),
    }
}

/// Request/response loop over one stream.
///
/// Each line is trimmed of surrounding whitespace and treated as a key.
/// End-of-stream, an empty line, or an unreadable (non-UTF-8) line ends
/// the loop. The response for key N is written before key N+1 is read.
async fn serve<S>(stream: S, state: &AppState) -> Result<()>
where
    S: AsyncRead + AsyncWrite,
{
    let (read_half, mut write_half) = split(stream);
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            break;
        }

        let key = line.trim();
        if key.is_empty() {
            break;
        }

        let value = lookup_or_recompute(state, key).await;

        write_half.write_all(value.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    Ok(())
}
