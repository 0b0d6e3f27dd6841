//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use std::time::{SystemTime, UNIX_EPOCH};

// == Cache Entry ==
/// Represents a single cache entry with its value and creation time.
///
/// Entries never expire and carry no version: once stored, an entry is
/// replaced only by a later `set` on the same key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// The stored value
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: String) -> Self {
        Self {
            value,
            created_at: current_timestamp_ms(),
        }
    }

    // == Age ==
    /// Returns the age of the entry in milliseconds.
    ///
    /// Diagnostic only; nothing in the store acts on age.
    pub fn age_ms(&self) -> u64 {
        current_timestamp_ms().saturating_sub(self.created_at)
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_millis() as u64
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string());

        assert_eq!(entry.value, "test_value");
        assert!(entry.created_at > 0);
    }

    #[test]
    fn test_entry_age_grows() {
        let entry = CacheEntry::new("test_value".to_string());

        sleep(Duration::from_millis(20));

        assert!(entry.age_ms() >= 20);
    }

    #[test]
    fn test_entry_clone_is_equal() {
        let entry = CacheEntry::new("test_value".to_string());
        let copy = entry.clone();

        assert_eq!(entry, copy);
    }
}
