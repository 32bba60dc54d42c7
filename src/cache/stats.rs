//! Cache Statistics Module
//!
//! Tracks store activity (hits, misses, evictions, expirations) alongside a
//! snapshot of byte usage.

use serde::Serialize;

// == Cache Stats ==
/// Tracks store performance metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of successful lookups
    pub hits: u64,
    /// Number of failed lookups (absent or expired key)
    pub misses: u64,
    /// Number of entries evicted to honor the byte budget
    pub evictions: u64,
    /// Number of entries removed because they expired
    pub expirations: u64,
    /// Current number of entries in the store
    pub total_entries: usize,
    /// Accounted bytes at snapshot time
    pub size_bytes: u64,
    /// Byte budget at snapshot time
    pub capacity_bytes: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no requests have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }
}
