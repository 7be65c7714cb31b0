//! Fixed-capacity LRU cache over [`LinkedHashMap`]

use std::cell::Ref;
use std::fmt::Display;
use std::hash::Hash;

use linkmap::{LinkedHashMap, Result};
use tracing::debug;

use crate::stats::CacheStats;

/// LRU cache with a fixed capacity
///
/// Writes promote an entry to most-recent; once the map outgrows the
/// capacity, the least recently written entry is evicted. Reads do **not**
/// promote: only [`LruCache::save`] affects recency order.
pub struct LruCache<K, V> {
    map: LinkedHashMap<K, V>,
    stats: CacheStats,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone + Display,
    V: Clone + Display,
{
    /// Create a cache holding at most `capacity` entries
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");

        Self {
            map: LinkedHashMap::new(),
            stats: CacheStats::new(),
            capacity,
        }
    }

    /// Store a key/value pair, evicting the least recently written entry
    /// if the cache is over capacity afterwards
    ///
    /// Inserting can grow the cache by at most one entry, so a single
    /// eviction restores the capacity invariant.
    pub fn save(&mut self, key: K, value: V) -> Result<()> {
        self.map.insert(key, value)?;
        self.stats.record_insert();

        if self.map.len() > self.capacity {
            let tail = self.map.last();
            let evicted = self.map.get(tail)?.key.clone();
            self.map.remove(tail)?;
            self.stats.record_eviction();
            debug!(key = %evicted, "evicted least recently written entry");
        }

        Ok(())
    }

    /// Borrow the value for `key`
    ///
    /// Fails with `KeyNotFound` if absent. Never reorders the
    /// entries: a read leaves recency untouched.
    pub fn get(&self, key: &K) -> Result<Ref<'_, V>> {
        match self.map.at(key) {
            Ok(value) => {
                self.stats.record_hit();
                Ok(value)
            }
            Err(err) => {
                self.stats.record_miss();
                Err(err)
            }
        }
    }

    /// Drop the entry for `key`; returns whether one was present
    pub fn remove(&mut self, key: &K) -> bool {
        let cur = self.map.find(key);
        if cur == self.map.end() {
            return false;
        }
        self.map.remove(cur).is_ok()
    }

    /// True if `key` currently has an entry
    pub fn contains(&self, key: &K) -> bool {
        self.map.count(key) == 1
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True if the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry and reset the statistics
    pub fn clear(&mut self) {
        self.map.clear();
        self.stats.reset();
    }

    /// Iterate `(key, value)` pairs most-recent to least-recent
    pub fn iter(&self) -> impl Iterator<Item = (K, V)> + '_ {
        self.map
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
    }

    /// Emit one `"<key> <value>"` debug line per entry, most-recent first
    ///
    /// Pure observer: the order is reported, never changed.
    pub fn print(&self) {
        for entry in self.map.iter() {
            debug!(target: "linkcache::dump", "{} {}", entry.key, entry.value);
        }
    }

    /// Cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
