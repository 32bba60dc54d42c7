//! Mini KV - An embeddable in-memory typed key-value store
//!
//! Provides Redis-like value types under string keys with TTL expiration and
//! LRU eviction bounded by the total byte size of the stored values.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;
pub mod types;

pub use cache::{CacheStats, CacheStore, Namespace};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
pub use types::{HashValue, ListValue, SetValue, SortedSet, StringValue, Valuer, Value};
