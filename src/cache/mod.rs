//! Cache Module
//!
//! Provides the byte-budgeted LRU store with TTL expiration, and namespaces
//! of independent named stores.

mod entry;
mod lru;
mod namespace;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::{Handle, LruList};
pub use namespace::Namespace;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Byte budget of a standalone store created with `CacheStore::default()` (1 MiB)
pub const DEFAULT_STORE_CAPACITY: u64 = 1024 * 1024;
