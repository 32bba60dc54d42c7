//! Namespace Module
//!
//! A namespace owns named stores that share one capacity setting. Stores are
//! created on first use and are otherwise independent: each enforces the
//! shared capacity against its own size, and operations on different stores
//! never contend on the same lock.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::CacheStore;
use crate::config::{Config, DEFAULT_CAPACITY, DEFAULT_CLEAN_INTERVAL};
use crate::tasks::spawn_cleanup_task;

/// A named store and its sweep task, if one is running.
#[derive(Debug)]
struct Database {
    store: Arc<CacheStore>,
    sweeper: Option<JoinHandle<()>>,
}

impl Database {
    fn stop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
    }
}

// == Namespace ==
/// Named stores sharing a byte budget setting.
#[derive(Debug)]
pub struct Namespace {
    capacity: Arc<AtomicU64>,
    clean_interval: Option<Duration>,
    persist_path: Option<PathBuf>,
    databases: RwLock<HashMap<String, Database>>,
}

impl Default for Namespace {
    /// 10 MiB per store, swept every minute.
    fn default() -> Self {
        Self::build(
            DEFAULT_CAPACITY,
            Some(Duration::from_secs(DEFAULT_CLEAN_INTERVAL)),
            None,
        )
    }
}

impl Namespace {
    // == Constructors ==
    /// Creates a namespace with the default sweep interval.
    ///
    /// `persist_path` is recorded for a persistence collaborator; the
    /// namespace itself never writes to it.
    pub fn new(capacity: u64, persist_path: impl Into<PathBuf>) -> Self {
        Self::build(
            capacity,
            Some(Duration::from_secs(DEFAULT_CLEAN_INTERVAL)),
            Some(persist_path.into()),
        )
    }

    pub fn from_config(config: &Config) -> Self {
        Self::build(
            config.capacity,
            config.clean_interval(),
            config.persist_path.clone(),
        )
    }

    /// Sets the sweep period for stores created afterwards; `None` or a zero
    /// duration disables active sweeping.
    pub fn with_clean_interval(mut self, interval: Option<Duration>) -> Self {
        self.clean_interval = interval.filter(|d| !d.is_zero());
        self
    }

    fn build(capacity: u64, clean_interval: Option<Duration>, persist_path: Option<PathBuf>) -> Self {
        Self {
            capacity: Arc::new(AtomicU64::new(capacity)),
            clean_interval,
            persist_path,
            databases: RwLock::new(HashMap::new()),
        }
    }

    // == Use ==
    /// Returns the store called `name`, creating it on first use.
    ///
    /// A new store gets a sweep task when a clean interval is set and a
    /// tokio runtime is available; without a runtime, expired entries are
    /// only removed lazily.
    pub fn use_db(&self, name: &str) -> Arc<CacheStore> {
        if let Some(db) = self.databases.read().get(name) {
            return Arc::clone(&db.store);
        }

        let mut databases = self.databases.write();
        let db = databases
            .entry(name.to_string())
            .or_insert_with(|| self.open(name));
        Arc::clone(&db.store)
    }

    fn open(&self, name: &str) -> Database {
        let store = Arc::new(CacheStore::with_shared_capacity(Arc::clone(&self.capacity)));

        let sweeper = self.clean_interval.and_then(|interval| {
            match tokio::runtime::Handle::try_current() {
                Ok(_) => Some(spawn_cleanup_task(Arc::clone(&store), interval)),
                Err(_) => {
                    warn!(store = name, "No tokio runtime, expiration sweep disabled for store");
                    None
                }
            }
        });

        info!(store = name, capacity = self.capacity(), "Created store");
        Database { store, sweeper }
    }

    // == Management ==
    /// Names of the existing stores, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.databases.read().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Removes the store called `name` and stops its sweep. Handles already
    /// returned by [`Namespace::use_db`] keep working but are detached.
    pub fn drop_db(&self, name: &str) -> bool {
        match self.databases.write().remove(name) {
            Some(mut db) => {
                db.stop();
                true
            }
            None => false,
        }
    }

    /// Flushes every store.
    pub fn flush_all(&self) {
        for db in self.databases.read().values() {
            db.store.flush();
        }
    }

    /// Sum of the stores' accounted sizes, after sweeping each of them.
    pub fn size(&self) -> u64 {
        self.databases
            .read()
            .values()
            .map(|db| db.store.size())
            .sum()
    }

    /// Stops every sweep task. Stores remain usable.
    pub fn shutdown(&self) {
        for db in self.databases.write().values_mut() {
            db.stop();
        }
    }

    // == Accessors ==
    pub fn capacity(&self) -> u64 {
        self.capacity.load(Ordering::Relaxed)
    }

    /// Changes the budget of every store, existing and future. Each store
    /// applies it at its next write.
    pub fn set_capacity(&self, capacity: u64) {
        self.capacity.store(capacity, Ordering::Relaxed);
    }

    pub fn clean_interval(&self) -> Option<Duration> {
        self.clean_interval
    }

    pub fn persist_path(&self) -> Option<&Path> {
        self.persist_path.as_deref()
    }
}

impl Drop for Namespace {
    fn drop(&mut self) {
        for db in self.databases.get_mut().values_mut() {
            db.stop();
        }
    }
}
