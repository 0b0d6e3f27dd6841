//! Cache Stampede - a TCP cache server that demonstrates the cache-aside
//! pattern and the stampede it suffers under concurrent misses.
//!
//! The check-recompute-store sequence is deliberately left unsynchronized
//! across requests; reproducing that race is the point of this crate.

pub mod cache;
pub mod config;
pub mod error;
pub mod server;
pub mod source;

pub use config::Config;
pub use server::{AppState, Server};
