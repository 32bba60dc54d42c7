//! Error types for the store
//!
//! Provides unified error handling using thiserror. Misses are not errors:
//! lookups report absence through `Option`.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the store and its value types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// List access outside `0..len`
    #[error("Index out of bounds: index {index}, length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Malformed configuration value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the store.
pub type Result<T> = std::result::Result<T, CacheError>;
