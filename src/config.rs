//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host the TCP listener binds to
    pub host: String,
    /// Port the TCP listener binds to
    pub port: u16,
    /// Simulated backend latency in milliseconds
    pub recompute_delay_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_HOST` - Listener host (default: 127.0.0.1)
    /// - `SERVER_PORT` - Listener port (default: 8000)
    /// - `RECOMPUTE_DELAY_MS` - Simulated backend latency (default: 2000)
    pub fn from_env() -> Self {
        Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8000),
            recompute_delay_ms: env::var("RECOMPUTE_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(2000),
        }
    }

    /// Returns the listener address in `host:port` form.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            recompute_delay_ms: 2000,
        }
    }
}
