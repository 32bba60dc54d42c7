//! Cache Store Module
//!
//! Main cache engine combining a key index with an arena recency list,
//! byte-size accounting and expiration.
//!
//! The store enforces its byte budget on write: after every call that adds
//! or grows a value, least recently used entries are evicted until the
//! accounted size fits. Lowering the capacity takes effect at the next write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::cache::lru::{Handle, LruList};
use crate::cache::{CacheEntry, CacheStats, DEFAULT_STORE_CAPACITY};
use crate::types::{HashValue, ListValue, SetValue, SortedSet, StringValue, Valuer, Value};

/// How a write treats the expiration of an existing entry.
enum ExpireUpdate {
    Keep,
    Replace(Option<DateTime<Utc>>),
}

// == Store State ==
/// Index, recency order, size and stats, guarded together by one lock.
#[derive(Debug, Default)]
struct StoreState {
    index: HashMap<String, Handle>,
    order: LruList<CacheEntry>,
    /// Σ value size over every entry in `order`
    size: u64,
    stats: CacheStats,
}

impl StoreState {
    /// Resolves a live entry, expiring it lazily and promoting it on a hit.
    fn lookup(&mut self, key: &str, now: DateTime<Utc>) -> Option<Handle> {
        let Some(&handle) = self.index.get(key) else {
            self.stats.record_miss();
            return None;
        };

        let expired = self
            .order
            .get(handle)
            .map_or(true, |entry| entry.is_expired_at(now));
        if expired {
            self.remove(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            debug!(key, "expired on access");
            return None;
        }

        self.order.touch(handle);
        self.stats.record_hit();
        Some(handle)
    }

    fn get(&mut self, key: &str, now: DateTime<Utc>) -> Option<&Value> {
        let handle = self.lookup(key, now)?;
        self.order.get(handle).map(|entry| &entry.value)
    }

    fn insert(
        &mut self,
        key: String,
        value: Value,
        expire: ExpireUpdate,
        now: DateTime<Utc>,
        capacity: u64,
    ) {
        let new_size = value.size();

        match self.index.get(&key).copied() {
            Some(handle) => {
                if let Some(entry) = self.order.get_mut(handle) {
                    let old_size = entry.value.size();
                    entry.value = value;
                    match expire {
                        ExpireUpdate::Replace(expire_at) => entry.expire_at = expire_at,
                        // A stale deadline must not carry over to the new value
                        ExpireUpdate::Keep if entry.is_expired_at(now) => entry.expire_at = None,
                        ExpireUpdate::Keep => {}
                    }
                    self.size = self.size - old_size + new_size;
                }
                self.order.touch(handle);
            }
            None => {
                let expire_at = match expire {
                    ExpireUpdate::Replace(expire_at) => expire_at,
                    ExpireUpdate::Keep => None,
                };
                let handle = self
                    .order
                    .push_front(CacheEntry::new(key.clone(), value, expire_at));
                self.index.insert(key, handle);
                self.size += new_size;
            }
        }

        self.evict(capacity);
    }

    fn remove(&mut self, key: &str) -> Option<CacheEntry> {
        let handle = self.index.remove(key)?;
        let entry = self.order.remove(handle)?;
        self.size -= entry.value.size();
        Some(entry)
    }

    /// Drops least recently used entries until `size <= capacity`. A value
    /// larger than the whole budget is evicted too, leaving the store empty.
    fn evict(&mut self, capacity: u64) {
        while self.size > capacity {
            let Some(entry) = self.order.evict_oldest() else {
                break;
            };
            let freed = entry.value.size();
            self.index.remove(&entry.key);
            self.size -= freed;
            self.stats.record_eviction();
            debug!(key = %entry.key, freed, size = self.size, capacity, "evicted entry");
        }
    }

    fn remove_expired(&mut self, now: DateTime<Utc>) -> usize {
        let expired: Vec<String> = self
            .order
            .iter()
            .filter(|entry| entry.is_expired_at(now))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
            self.stats.record_expiration();
        }
        expired.len()
    }
}

/// Re-accounts one entry's size and evicts when dropped.
struct Resize<'a> {
    state: &'a mut StoreState,
    handle: Handle,
    old_size: u64,
    capacity: u64,
}

impl<'a> Resize<'a> {
    fn new(state: &'a mut StoreState, handle: Handle, capacity: u64) -> Self {
        let old_size = state.order.get(handle).map_or(0, |entry| entry.value.size());
        Self {
            state,
            handle,
            old_size,
            capacity,
        }
    }
}

impl Drop for Resize<'_> {
    fn drop(&mut self) {
        let new_size = self
            .state
            .order
            .get(self.handle)
            .map_or(0, |entry| entry.value.size());
        self.state.size = self.state.size - self.old_size + new_size;
        self.state.evict(self.capacity);
    }
}

// == Cache Store ==
/// Thread-safe LRU store bounded by the total byte size of its values.
///
/// One reader/writer lock guards the index, recency order and size. Calls
/// that may promote or expire an entry take the write lock; pure probes
/// (`contains`, `get_expire_time`, `len`, `stats`) take the read lock.
#[derive(Debug)]
pub struct CacheStore {
    state: RwLock<StoreState>,
    /// Byte budget; shared with the other stores of a namespace
    capacity: Arc<AtomicU64>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_CAPACITY)
    }
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new store with a byte budget of `capacity`.
    pub fn new(capacity: u64) -> Self {
        Self::with_shared_capacity(Arc::new(AtomicU64::new(capacity)))
    }

    /// Creates a store whose budget is read from `capacity` on every write.
    pub(crate) fn with_shared_capacity(capacity: Arc<AtomicU64>) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            capacity,
        }
    }

    // == Get ==
    /// Retrieves a value by key and marks it most recently used.
    ///
    /// Expired entries are removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state.write().get(key, Utc::now()).cloned()
    }

    /// Like [`CacheStore::get`], but misses if the value is not a string.
    pub fn get_string(&self, key: &str) -> Option<StringValue> {
        self.state
            .write()
            .get(key, Utc::now())
            .and_then(Value::as_string)
            .cloned()
    }

    /// Like [`CacheStore::get`], but misses if the value is not a list.
    pub fn get_list(&self, key: &str) -> Option<ListValue> {
        self.state
            .write()
            .get(key, Utc::now())
            .and_then(Value::as_list)
            .cloned()
    }

    /// Like [`CacheStore::get`], but misses if the value is not a hash.
    pub fn get_hash(&self, key: &str) -> Option<HashValue> {
        self.state
            .write()
            .get(key, Utc::now())
            .and_then(Value::as_hash)
            .cloned()
    }

    /// Like [`CacheStore::get`], but misses if the value is not a set.
    pub fn get_set(&self, key: &str) -> Option<SetValue> {
        self.state
            .write()
            .get(key, Utc::now())
            .and_then(Value::as_set)
            .cloned()
    }

    /// Like [`CacheStore::get`], but misses if the value is not a sorted set.
    pub fn get_sorted_set(&self, key: &str) -> Option<SortedSet> {
        self.state
            .write()
            .get(key, Utc::now())
            .and_then(Value::as_sorted_set)
            .cloned()
    }

    /// Returns the expiration of `key`: `None` if absent, `Some(None)` if it
    /// never expires. Does not promote the entry or check expiry.
    pub fn get_expire_time(&self, key: &str) -> Option<Option<DateTime<Utc>>> {
        let state = self.state.read();
        let handle = state.index.get(key)?;
        state.order.get(*handle).map(|entry| entry.expire_at)
    }

    /// Returns the time left before `key` expires: `None` if absent or
    /// already expired, `Some(None)` if it never expires. Does not promote
    /// the entry.
    pub fn ttl(&self, key: &str) -> Option<Option<chrono::Duration>> {
        let state = self.state.read();
        let handle = state.index.get(key)?;
        state
            .order
            .get(*handle)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    // == Set ==
    /// Stores a value, keeping the key's current expiration if it has one.
    ///
    /// Overwriting adjusts the accounted size by the difference between the
    /// new and old value sizes. Least recently used entries are then evicted
    /// until the store fits its capacity.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        let capacity = self.capacity();
        self.state.write().insert(
            key.into(),
            value.into(),
            ExpireUpdate::Keep,
            Utc::now(),
            capacity,
        );
    }

    /// Stores a value and replaces its expiration; `None` never expires.
    pub fn set_with_expire(
        &self,
        key: impl Into<String>,
        value: impl Into<Value>,
        expire_at: Option<DateTime<Utc>>,
    ) {
        let capacity = self.capacity();
        self.state.write().insert(
            key.into(),
            value.into(),
            ExpireUpdate::Replace(expire_at),
            Utc::now(),
            capacity,
        );
    }

    /// Stores a value that expires `ttl` from now.
    pub fn set_with_ttl(&self, key: impl Into<String>, value: impl Into<Value>, ttl: Duration) {
        let expire_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_add_signed(ttl));
        self.set_with_expire(key, value, expire_at);
    }

    /// Updates the expiration of `key` and marks it most recently used.
    ///
    /// Returns false, changing nothing, if the key is absent.
    pub fn set_expire_time(&self, key: &str, expire_at: Option<DateTime<Utc>>) -> bool {
        let mut state = self.state.write();
        let Some(&handle) = state.index.get(key) else {
            return false;
        };
        if let Some(entry) = state.order.get_mut(handle) {
            entry.expire_at = expire_at;
        }
        state.order.touch(handle)
    }

    // == Update ==
    /// Mutates a stored value in place under the store's write lock.
    ///
    /// The entry is promoted, its size re-accounted, and eviction runs
    /// afterwards. Misses (absent or expired) return `None` without calling
    /// `f`. This is the way to grow a stored list, hash, set or sorted set.
    pub fn update<R>(&self, key: &str, f: impl FnOnce(&mut Value) -> R) -> Option<R> {
        let capacity = self.capacity();
        let mut state = self.state.write();
        let handle = state.lookup(key, Utc::now())?;

        // Accounting runs when the guard drops, so a panicking `f` still
        // leaves `size` equal to the sum of the stored values.
        let mut resize = Resize::new(&mut state, handle, capacity);
        let entry = resize.state.order.get_mut(handle)?;
        Some(f(&mut entry.value))
    }

    // == Remove ==
    /// Removes an entry by key. Returns false if it was absent.
    pub fn remove(&self, key: &str) -> bool {
        self.state.write().remove(key).is_some()
    }

    // == Remove Expired ==
    /// Removes every expired entry.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&self) -> usize {
        let removed = self.state.write().remove_expired(Utc::now());
        if removed > 0 {
            debug!(removed, "removed expired entries");
        }
        removed
    }

    // == Flush ==
    /// Removes every entry. Capacity and counters are kept.
    pub fn flush(&self) {
        let mut state = self.state.write();
        state.index.clear();
        state.order.clear();
        state.size = 0;
    }

    // == Contains ==
    /// Checks membership without promoting the key or checking expiry, so an
    /// expired entry that has not been swept yet still reports true.
    pub fn contains(&self, key: &str) -> bool {
        self.state.read().index.contains_key(key)
    }

    // == Size ==
    /// Sweeps expired entries, then returns the accounted byte size.
    pub fn size(&self) -> u64 {
        let mut state = self.state.write();
        state.remove_expired(Utc::now());
        state.size
    }

    // == Capacity ==
    pub fn capacity(&self) -> u64 {
        self.capacity.load(Ordering::Relaxed)
    }

    /// Changes the byte budget. Nothing is evicted until the next write.
    pub fn set_capacity(&self, capacity: u64) {
        self.capacity.store(capacity, Ordering::Relaxed);
    }

    // == Length ==
    /// Returns the number of entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.state.read().index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().index.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the store's counters and usage.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.read();
        CacheStats {
            total_entries: state.index.len(),
            size_bytes: state.size,
            capacity_bytes: self.capacity(),
            ..state.stats.clone()
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::thread::sleep;

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.capacity(), 100);
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_store_default_capacity() {
        assert_eq!(CacheStore::default().capacity(), 1024 * 1024);
    }

    #[test]
    fn test_store_set_and_get() {
        let store = CacheStore::new(100);
        store.set("key1", "value1");

        let value = store.get("key1").unwrap();
        assert_eq!(value.as_string().unwrap().as_bytes(), b"value1");
        assert_eq!(store.len(), 1);
        assert_eq!(store.size(), 6);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store = CacheStore::new(100);
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_remove() {
        let store = CacheStore::new(100);
        store.set("key1", "value1");

        assert!(store.remove("key1"));
        assert!(!store.remove("key1"));
        assert!(store.is_empty());
        assert_eq!(store.size(), 0);
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_overwrite_adjusts_size() {
        let store = CacheStore::new(100);
        store.set("key1", "value1");
        store.set("key1", "v2");

        assert_eq!(store.len(), 1);
        assert_eq!(store.size(), 2);
        assert_eq!(store.get_string("key1").unwrap().as_bytes(), b"v2");

        store.set("key1", "a much longer value");
        assert_eq!(store.size(), 19);
    }

    #[test]
    fn test_store_lru_eviction_by_bytes() {
        let store = CacheStore::new(3);
        store.set("a", "1");
        store.set("b", "1");
        store.set("c", "1");
        assert_eq!(store.size(), 3);

        store.set("d", "1");
        assert_eq!(store.size(), 3);
        assert!(!store.contains("a"));
        assert!(store.contains("d"));
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let store = CacheStore::new(3);
        store.set("k1", "1");
        store.set("k2", "1");
        store.set("k3", "1");

        store.get("k1").unwrap();
        store.set("k4", "1");

        assert!(store.contains("k1"));
        assert!(!store.contains("k2"));
        assert!(store.contains("k3"));
    }

    #[test]
    fn test_large_value_evicts_several() {
        let store = CacheStore::new(10);
        store.set("a", "aaa");
        store.set("b", "bbb");
        store.set("c", "ccc");

        store.set("d", "dddddddd");
        assert_eq!(store.len(), 1);
        assert!(store.contains("d"));
        assert_eq!(store.size(), 8);
    }

    #[test]
    fn test_oversized_value_leaves_store_empty() {
        let store = CacheStore::new(4);
        store.set("small", "ab");
        store.set("huge", "abcdefgh");

        assert!(store.is_empty());
        assert_eq!(store.size(), 0);
        assert_eq!(store.stats().evictions, 2);
    }

    #[test]
    fn test_lowered_capacity_applies_on_next_write() {
        let store = CacheStore::new(10);
        store.set("a", "aaaa");
        store.set("b", "bbbb");

        store.set_capacity(5);
        assert_eq!(store.len(), 2);

        store.set("c", "c");
        assert!(!store.contains("a"));
        assert!(store.contains("b"));
        assert!(store.contains("c"));
        assert_eq!(store.size(), 5);
    }

    #[test]
    fn test_typed_getters_miss_on_other_variant() {
        let store = CacheStore::new(100);
        store.set("s", "str");
        store.set("l", ListValue::from(vec!["foo", "bar"]));

        assert!(store.get_string("s").is_some());
        assert!(store.get_list("s").is_none());
        assert!(store.get_hash("s").is_none());
        assert!(store.get_set("s").is_none());
        assert!(store.get_sorted_set("s").is_none());
        assert_eq!(store.get_list("l").unwrap().get(0).unwrap(), "foo");
        assert!(store.contains("s"));
    }

    #[test]
    fn test_update_sorted_set_reaccounts_size() {
        let store = CacheStore::new(10_000);
        store.set("z", SortedSet::new());
        let before = store.size();

        let len = store.update("z", |value| {
            let zset = value.as_sorted_set_mut().unwrap();
            zset.add(1.0, "23");
            zset.add(0.0, "25");
            zset.len()
        });

        assert_eq!(len, Some(2));
        assert!(store.size() > before);
        assert_eq!(store.size(), store.get_sorted_set("z").unwrap().size());
        assert_eq!(
            store.get_sorted_set("z").unwrap().get_range(0.0, 2.0, 1.0),
            vec!["25", "23"]
        );
    }

    #[test]
    fn test_update_growth_triggers_eviction() {
        let store = CacheStore::new(6);
        store.set("old", "abc");
        store.set("list", ListValue::from(vec!["x"]));

        store.update("list", |value| {
            value.as_list_mut().unwrap().push("yyyy");
        });

        assert!(!store.contains("old"));
        assert_eq!(store.size(), 5);
    }

    #[test]
    fn test_update_panic_keeps_size_consistent() {
        let store = CacheStore::new(100);
        store.set("list", ListValue::from(vec!["x"]));

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            store.update("list", |value| {
                value.as_list_mut().unwrap().push("yyyy");
                panic!("mutation failed halfway");
            })
        }));
        assert!(outcome.is_err());

        let list = store.get_list("list").unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(store.size(), list.size());

        assert!(store.remove("list"));
        assert_eq!(store.size(), 0);
    }

    #[test]
    fn test_update_panic_still_evicts() {
        let store = CacheStore::new(6);
        store.set("old", "abc");
        store.set("list", ListValue::from(vec!["x"]));

        let outcome = catch_unwind(AssertUnwindSafe(|| {
            store.update("list", |value| {
                value.as_list_mut().unwrap().push("yyyy");
                panic!("mutation failed halfway");
            })
        }));
        assert!(outcome.is_err());

        assert!(!store.contains("old"));
        assert_eq!(store.size(), 5);
    }

    #[test]
    fn test_ttl() {
        let store = CacheStore::new(100);
        store.set("forever", "v");
        store.set_with_ttl("session", "v", Duration::from_secs(10));
        store.set_with_expire("stale", "v", Some(Utc::now() - ChronoDuration::seconds(1)));

        assert_eq!(store.ttl("forever"), Some(None));
        assert!(store.ttl("missing").is_none());
        assert!(store.ttl("stale").is_none());

        let remaining = store.ttl("session").flatten().unwrap();
        assert!(remaining <= ChronoDuration::seconds(10));
        assert!(remaining >= ChronoDuration::seconds(9));
    }

    #[test]
    fn test_update_missing_key() {
        let store = CacheStore::new(100);
        let called = store.update("missing", |_| ());
        assert!(called.is_none());
    }

    #[test]
    fn test_store_expiration_on_get() {
        let store = CacheStore::new(100);
        store.set_with_ttl("key1", "value1", Duration::from_millis(200));

        assert!(store.get("key1").is_some());
        sleep(Duration::from_millis(300));

        assert!(store.contains("key1"));
        assert!(store.get("key1").is_none());
        assert!(!store.contains("key1"));
        assert_eq!(store.stats().expirations, 1);
    }

    #[test]
    fn test_set_keeps_existing_expiration() {
        let store = CacheStore::new(100);
        let deadline = Utc::now() + ChronoDuration::seconds(60);
        store.set_with_expire("k", "v1", Some(deadline));
        store.set("k", "v2");

        assert_eq!(store.get_expire_time("k"), Some(Some(deadline)));
    }

    #[test]
    fn test_set_clears_stale_expiration() {
        let store = CacheStore::new(100);
        store.set_with_expire("k", "v1", Some(Utc::now() - ChronoDuration::seconds(1)));
        store.set("k", "v2");

        assert_eq!(store.get_expire_time("k"), Some(None));
        assert!(store.get("k").is_some());
    }

    #[test]
    fn test_set_expire_time() {
        let store = CacheStore::new(100);
        assert!(!store.set_expire_time("missing", Some(Utc::now())));
        assert!(store.get_expire_time("missing").is_none());

        store.set("k", "v");
        assert_eq!(store.get_expire_time("k"), Some(None));

        let past = Utc::now() - ChronoDuration::seconds(1);
        assert!(store.set_expire_time("k", Some(past)));
        assert_eq!(store.get_expire_time("k"), Some(Some(past)));
        assert!(store.get("k").is_none());
    }

    #[test]
    fn test_set_expire_time_promotes() {
        let store = CacheStore::new(2);
        store.set("a", "1");
        store.set("b", "1");

        store.set_expire_time("a", Some(Utc::now() + ChronoDuration::seconds(60)));
        store.set("c", "1");

        assert!(store.contains("a"));
        assert!(!store.contains("b"));
    }

    #[test]
    fn test_remove_expired() {
        let store = CacheStore::new(100);
        let past = Utc::now() - ChronoDuration::seconds(1);
        let future = Utc::now() + ChronoDuration::seconds(60);
        store.set_with_expire("gone1", "aa", Some(past));
        store.set_with_expire("gone2", "bb", Some(past));
        store.set_with_expire("kept", "cc", Some(future));
        store.set("forever", "dd");

        assert_eq!(store.remove_expired(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.size(), 4);
        assert!(store.contains("kept"));
        assert!(store.contains("forever"));
    }

    #[test]
    fn test_size_sweeps_first() {
        let store = CacheStore::new(100);
        store.set_with_expire("gone", "abcd", Some(Utc::now() - ChronoDuration::seconds(1)));
        store.set("kept", "ab");

        assert_eq!(store.len(), 2);
        assert_eq!(store.size(), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_flush() {
        let store = CacheStore::new(100);
        store.set("a", "1");
        store.set("b", ListValue::from(vec!["x", "y"]));
        store.flush();

        assert_eq!(store.size(), 0);
        assert!(store.get("a").is_none());
        assert!(store.get("b").is_none());
        assert_eq!(store.capacity(), 100);

        store.set("c", "1");
        assert_eq!(store.size(), 1);
    }

    #[test]
    fn test_store_stats() {
        let store = CacheStore::new(100);
        store.set("key1", "value1");
        store.get("key1").unwrap();
        let _ = store.get("nonexistent");

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.size_bytes, 6);
        assert_eq!(stats.capacity_bytes, 100);
    }

    #[test]
    fn test_shared_capacity() {
        let capacity = Arc::new(AtomicU64::new(4));
        let left = CacheStore::with_shared_capacity(Arc::clone(&capacity));
        let right = CacheStore::with_shared_capacity(capacity);

        left.set_capacity(2);
        assert_eq!(right.capacity(), 2);
        right.set("k", "abc");
        assert!(right.is_empty());
    }
}
