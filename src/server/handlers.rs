//! Request Handlers
//!
//! The cache-aside read path shared by every connection handler.
//!
//! The sequence is CHECK -> (hit) RETURN, or CHECK -> (miss) RECOMPUTE ->
//! STORE -> RETURN. The store mutex is held only inside the individual
//! get and set calls, never across the recompute await. Concurrent
//! requests for the same absent key therefore all observe the miss, all
//! recompute, and race to overwrite the store: the cache stampede. That
//! window must stay open; do not add per-key locking or request
//! coalescing here.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::source::RecomputeSource;

/// Application state shared across all connection handlers.
///
/// The cache store and the recomputation source are passed in explicitly
/// so that tests can construct isolated instances; there is no process-wide
/// singleton.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Thread-safe cache store
    pub cache: Arc<Mutex<CacheStore>>,
    /// Simulated expensive backend
    pub source: Arc<RecomputeSource>,
}

impl AppState {
    /// Creates a new AppState from a cache store and a recomputation source.
    pub fn new(cache: CacheStore, source: RecomputeSource) -> Self {
        Self {
            cache: Arc::new(Mutex::new(cache)),
            source: Arc::new(source),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        let source = RecomputeSource::new(Duration::from_millis(config.recompute_delay_ms));
        Self::new(CacheStore::new(), source)
    }
}

/// Resolves one key through the cache-aside sequence.
///
/// On a hit the cached value is returned with no side effect. On a miss
/// the expensive recomputation runs with no lock held, and the result is
/// written back with a plain `set` -- so two concurrent misses on the same
/// key both recompute and the later write silently wins.
pub async fn lookup_or_recompute(state: &AppState, key: &str) -> String {
    // CHECK: a single locked lookup; the guard drops before anything else
    let cached = state.cache.lock().await.get(key);

    if let Some(entry) = cached {
        info!(key, age_ms = entry.age_ms(), "cache hit");
        return entry.value;
    }
    info!(key, "cache miss");

    // RECOMPUTE: no mutual exclusion against other requests for this key
    let fresh = state.source.compute(key).await;

    // STORE: plain overwrite, racing any sibling recomputations
    state.cache.lock().await.set(key.to_string(), fresh.clone());
    debug!(key, "stored recomputed value");

    fresh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state(delay_ms: u64) -> AppState {
        AppState::new(
            CacheStore::new(),
            RecomputeSource::new(Duration::from_millis(delay_ms)),
        )
    }

    #[tokio::test]
    async fn test_hit_short_circuits_recomputation() {
        let state = test_state(10);
        state
            .cache
            .lock()
            .await
            .set("seeded".to_string(), "canned_value".to_string());

        let value = lookup_or_recompute(&state, "seeded").await;

        assert_eq!(value, "canned_value");
        assert_eq!(state.source.calls(), 0);
    }

    #[tokio::test]
    async fn test_miss_populates_store() {
        let state = test_state(10);

        let value = lookup_or_recompute(&state, "fresh_key").await;

        assert!(value.starts_with("expensive_result_for_fresh_key_"));
        assert_eq!(state.source.calls(), 1);

        let entry = state.cache.lock().await.get("fresh_key");
        assert_eq!(entry.unwrap().value, value);
    }

    #[tokio::test]
    async fn test_repeated_hits_are_idempotent() {
        let state = test_state(10);

        let first = lookup_or_recompute(&state, "repeat").await;
        let second = lookup_or_recompute(&state, "repeat").await;
        let third = lookup_or_recompute(&state, "repeat").await;

        assert_eq!(first, second);
        assert_eq!(second, third);
        // Only the initial miss recomputed
        assert_eq!(state.source.calls(), 1);
        assert_eq!(state.cache.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_all_recompute() {
        let state = test_state(50);

        // All four futures pass the CHECK step before the first sleep
        // completes, so every one of them recomputes independently.
        let (a, b, c, d) = tokio::join!(
            lookup_or_recompute(&state, "hot"),
            lookup_or_recompute(&state, "hot"),
            lookup_or_recompute(&state, "hot"),
            lookup_or_recompute(&state, "hot"),
        );

        assert_eq!(state.source.calls(), 4);
        for value in [&a, &b, &c, &d] {
            assert!(value.starts_with("expensive_result_for_hot_"));
        }

        // Exactly one entry survives; it is whichever write landed last
        let mut cache = state.cache.lock().await;
        assert_eq!(cache.len(), 1);
        let stored = cache.get("hot").unwrap().value;
        assert!([a, b, c, d].contains(&stored));
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_interfere() {
        let state = test_state(10);

        let (a, b) = tokio::join!(
            lookup_or_recompute(&state, "alpha"),
            lookup_or_recompute(&state, "beta"),
        );

        assert!(a.contains("_alpha_"));
        assert!(b.contains("_beta_"));
        assert_eq!(state.source.calls(), 2);
        assert_eq!(state.cache.lock().await.len(), 2);
    }
}
