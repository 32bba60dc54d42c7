//! Configuration Module
//!
//! Handles loading and managing store configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default byte budget for a namespace (10 MiB)
pub const DEFAULT_CAPACITY: u64 = 10 * 1024 * 1024;

/// Default sweep period in seconds
pub const DEFAULT_CLEAN_INTERVAL: u64 = 60;

/// Store configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Byte budget each store enforces
    pub capacity: u64,
    /// Sweep interval in seconds, 0 disables active sweeping
    pub clean_interval: u64,
    /// Reserved for a persistence collaborator; nothing is written here
    pub persist_path: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// Unparseable values fall back to the defaults.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Byte budget (default: 10 MiB)
    /// - `CLEAN_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `PERSIST_PATH` - Reserved persistence path (default: unset)
    pub fn from_env() -> Self {
        Self {
            capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CAPACITY),
            clean_interval: env::var("CLEAN_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CLEAN_INTERVAL),
            persist_path: persist_path_from_env(),
        }
    }

    /// Like [`Config::from_env`], but rejects values that do not parse.
    pub fn try_from_env() -> Result<Self> {
        Ok(Self {
            capacity: parse_var("CACHE_CAPACITY", DEFAULT_CAPACITY)?,
            clean_interval: parse_var("CLEAN_INTERVAL", DEFAULT_CLEAN_INTERVAL)?,
            persist_path: persist_path_from_env(),
        })
    }

    /// Sweep period, or `None` when active sweeping is disabled.
    pub fn clean_interval(&self) -> Option<Duration> {
        (self.clean_interval > 0).then(|| Duration::from_secs(self.clean_interval))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            clean_interval: DEFAULT_CLEAN_INTERVAL,
            persist_path: None,
        }
    }
}

fn parse_var(name: &str, default: u64) -> Result<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CacheError::InvalidConfig(format!("{name}={raw:?} is not an integer"))),
        Err(_) => Ok(default),
    }
}

fn persist_path_from_env() -> Option<PathBuf> {
    env::var("PERSIST_PATH")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
