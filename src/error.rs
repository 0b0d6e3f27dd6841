//! Error types for the cache server
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Server Error Enum ==
/// Unified error type for the cache server.
///
/// Failures split along the propagation boundary: a bind failure is fatal
/// at startup, while connection errors are contained to the one connection
/// that raised them and never reach the listener or the store.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listening socket could not be bound at startup
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address the bind was attempted on
        addr: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// I/O failure on a single client connection (reset, decode failure)
    #[error("connection error: {0}")]
    Connection(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the cache server.
pub type Result<T> = std::result::Result<T, ServerError>;
