//! Cache Entry Module
//!
//! Defines the record stored for each key: the value plus optional expiration.

use chrono::{DateTime, Utc};

use crate::types::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and expiration metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Key this entry is indexed under
    pub key: String,
    /// The stored value
    pub value: Value,
    /// Expiration instant, None = no expiration
    pub expire_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    pub fn new(key: String, value: Value, expire_at: Option<DateTime<Utc>>) -> Self {
        Self {
            key,
            value,
            expire_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is expired once `now` reaches its
    /// expiration instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expire_at {
            Some(expire_at) => now >= expire_at,
            None => false,
        }
    }

    /// Checks if the entry has expired as of the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    // == Time To Live ==
    /// Returns remaining time to live, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::zero())` if the entry has expired
    /// - `Some(remaining)` if the entry has not expired yet
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<chrono::Duration> {
        self.expire_at.map(|expire_at| {
            let remaining = expire_at - Utc::now();
            remaining.max(chrono::Duration::zero())
        })
    }
}
