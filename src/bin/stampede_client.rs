//! Stampede demo client
//!
//! Opens N concurrent connections that all request the same key at once.
//! Against a cold cache every client misses, every one triggers the
//! expensive recomputation, and the distinct values coming back show how
//! many redundant recomputations the server performed.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Drive concurrent requests for one key to provoke a cache stampede", long_about = None)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8000")]
    server: String,

    /// Number of concurrent clients
    #[arg(short, long, default_value_t = 5)]
    clients: usize,

    /// Key every client requests
    #[arg(short, long, default_value = "popular_key")]
    key: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!(
        server = %args.server,
        clients = args.clients,
        key = %args.key,
        "starting stampede demo"
    );

    // Launch all clients at once so their requests overlap on the wire
    let mut handles = Vec::with_capacity(args.clients);
    for id in 1..=args.clients {
        let server = args.server.clone();
        let key = args.key.clone();
        handles.push(tokio::spawn(async move {
            run_client(id, &server, &key).await
        }));
    }

    let mut values = Vec::new();
    for handle in handles {
        match handle.await? {
            Ok((id, value, elapsed)) => {
                info!(
                    client = id,
                    value = %value,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "response received"
                );
                values.push(value);
            }
            Err(e) => error!(error = %e, "client failed"),
        }
    }

    values.sort();
    values.dedup();
    info!(
        distinct_values = values.len(),
        "stampede run complete; every distinct value is one redundant recomputation"
    );

    Ok(())
}

/// One client: connect, send the key, await the response line.
async fn run_client(id: usize, server: &str, key: &str) -> Result<(usize, String, Duration)> {
    let stream = TcpStream::connect(server)
        .await
        .with_context(|| format!("client {} failed to connect", id))?;
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let start = Instant::now();
    write_half.write_all(key.as_bytes()).await?;
    write_half.write_all(b"\n").await?;

    let mut response = String::new();
    reader
        .read_line(&mut response)
        .await
        .with_context(|| format!("client {} failed to read response", id))?;

    Ok((id, response.trim().to_string(), start.elapsed()))
}
