//! Recomputation Source Module
//!
//! Stands in for the expensive backend (a database, a remote API) that the
//! cache shields. Every call sleeps a fixed delay and then derives a value
//! from the key and the wall clock. There is no failure path: the backend
//! in this demonstration never errors and never times out.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::info;

// == Constants ==
/// Prefix carried by every recomputed value. The full shape is
/// `expensive_result_for_<key>_<unix-seconds>`; clients must treat it as
/// opaque.
const VALUE_PREFIX: &str = "expensive_result_for";

// == Recompute Source ==
/// Simulated expensive backing operation with a fixed latency.
///
/// Invocations are counted so that callers can observe how many
/// recomputations actually ran for a key. Under a stampede, N concurrent
/// misses on one key drive this counter up by N.
#[derive(Debug)]
pub struct RecomputeSource {
    /// Artificial latency applied to every call
    delay: Duration,
    /// Number of compute invocations so far
    calls: AtomicU64,
}

impl RecomputeSource {
    // == Constructor ==
    /// Creates a new source with the given simulated latency.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            calls: AtomicU64::new(0),
        }
    }

    // == Compute ==
    /// Performs the simulated expensive call for `key`.
    ///
    /// Sleeps for the configured delay, then returns a value derived from
    /// the key and the current Unix time. Deterministic in shape,
    /// timestamp-dependent in content.
    pub async fn compute(&self, key: &str) -> String {
        self.calls.fetch_add(1, Ordering::Relaxed);
        info!(
            key,
            delay_ms = self.delay.as_millis() as u64,
            "performing expensive recomputation"
        );

        tokio::time::sleep(self.delay).await;

        let result = format!(
            "{}_{}_{}",
            VALUE_PREFIX,
            key,
            chrono::Utc::now().timestamp()
        );
        info!(key, %result, "expensive recomputation completed");
        result
    }

    // == Calls ==
    /// Returns the number of compute invocations so far.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}
