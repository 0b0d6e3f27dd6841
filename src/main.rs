//! Cache Stampede - a TCP cache server that demonstrates the cache-aside
//! pattern and the stampede it suffers under concurrent misses.

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cache_stampede::{AppState, Config, Server};

/// Main entry point for the cache-aside demonstration server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the shared cache store and recomputation source
/// 4. Bind the TCP listener (fatal on failure)
/// 5. Accept connections until SIGINT/SIGTERM
/// 6. Log final cache statistics and exit
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cache_stampede=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting cache-aside demonstration server");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: addr={}, recompute_delay={}ms",
        config.addr(),
        config.recompute_delay_ms
    );

    // Create shared application state
    let state = AppState::from_config(&config);
    info!("Cache store initialized");

    // Bind the listening socket; without it the process cannot proceed
    let server = Server::bind(&config.addr(), state.clone())
        .await
        .context("startup failed")?;

    // Accept until interrupted. In-flight connections are not drained:
    // dropping the accept loop closes the listener and exiting tears the
    // rest down with the runtime.
    tokio::select! {
        _ = server.run() => {}
        _ = shutdown_signal() => {}
    }

    // Final statistics: the recomputation count exceeding the miss count
    // of distinct keys is the stampede made visible.
    let stats = state.cache.lock().await.stats();
    let recomputations = state.source.calls();
    match serde_json::to_string(&stats) {
        Ok(json) => info!(stats = %json, recomputations, "final cache statistics"),
        Err(_) => info!(recomputations, "final cache statistics"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
