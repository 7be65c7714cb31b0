//! Separate-chaining hash map
//!
//! Buckets are [`DoubleList`]s of key/value entries; the bucket index is
//! `hash(key) % bucket_count`. The table doubles its bucket count and
//! rehashes every entry whenever an insertion would push the load past the
//! configured load factor. Hashing uses AHash by default, with the policy
//! pluggable through the `S: BuildHasher` parameter.

use std::cell::{Ref, RefMut};
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;

use crate::error::{Error, Result};
use crate::list::{Cursor, DoubleList};

/// Default number of buckets
pub const DEFAULT_CAPACITY: usize = 10;

/// Default load factor threshold triggering expansion
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

/// Key/value pair stored in a bucket
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    /// Lookup key
    pub key: K,
    /// Stored value
    pub value: V,
}

/// Position of an entry inside a [`ChainedMap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapCursor {
    pub(crate) bucket: usize,
    pub(crate) node: Cursor,
}

/// Hash map with separate chaining and dynamic rehashing
pub struct ChainedMap<K, V, S = RandomState> {
    buckets: Vec<DoubleList<Entry<K, V>>>,
    hasher: S,
    load_factor: f64,
    len: usize,
}

impl<K: Hash + Eq, V> ChainedMap<K, V, RandomState> {
    /// Create a map with the default capacity and load factor
    pub fn new() -> Self {
        Self::with_capacity_and_load_factor(DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR)
    }

    /// Create a map with `capacity` buckets and the default load factor
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Create a map with `capacity` buckets and a custom load factor
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f64) -> Self {
        Self::with_hasher(capacity, load_factor, RandomState::new())
    }
}

impl<K: Hash + Eq, V> Default for ChainedMap<K, V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher> ChainedMap<K, V, S> {
    /// Create a map with a caller-supplied hash policy
    pub fn with_hasher(capacity: usize, load_factor: f64, hasher: S) -> Self {
        assert!(capacity > 0, "Capacity must be greater than 0");
        assert!(load_factor > 0.0, "Load factor must be positive");

        Self {
            buckets: (0..capacity).map(|_| DoubleList::new()).collect(),
            hasher,
            load_factor,
            len: 0,
        }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Configured load factor threshold
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Drop every entry; bucket count is retained
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.len = 0;
    }

    /// Locate the entry for `key`, or `None` if absent
    ///
    /// O(1) average, O(bucket length) worst case.
    pub fn find(&self, key: &K) -> Option<MapCursor> {
        let bucket = self.bucket_of(key);
        let list = &self.buckets[bucket];
        for node in list.cursors() {
            if let Ok(entry) = list.get(node) {
                if entry.key == *key {
                    return Some(MapCursor { bucket, node });
                }
            }
        }
        None
    }

    /// Insert or overwrite
    ///
    /// An existing key has its value overwritten in place and `false` is
    /// returned alongside the entry's cursor. A new entry lands at the head
    /// of its bucket and returns `true`; if it would push the load past
    /// `capacity * load_factor`, the table is expanded first.
    pub fn insert(&mut self, key: K, value: V) -> (MapCursor, bool) {
        if let Some(cur) = self.find(&key) {
            if let Ok(mut entry) = self.buckets[cur.bucket].get_mut(cur.node) {
                entry.value = value;
            }
            return (cur, false);
        }

        if (self.len + 1) as f64 > self.buckets.len() as f64 * self.load_factor {
            self.expand();
        }

        let bucket = self.bucket_of(&key);
        let node = self.buckets[bucket].insert_head(Entry { key, value });
        self.len += 1;
        (MapCursor { bucket, node }, true)
    }

    /// Remove the entry for `key`; returns whether one was found
    pub fn remove(&mut self, key: &K) -> bool {
        match self.find(key) {
            Some(cur) => {
                let _ = self.buckets[cur.bucket].erase(cur.node);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Borrow the entry at `cur`
    pub fn get(&self, cur: MapCursor) -> Result<Ref<'_, Entry<K, V>>> {
        self.buckets
            .get(cur.bucket)
            .ok_or(Error::InvalidIterator)?
            .get(cur.node)
    }

    /// Mutably borrow the entry at `cur`
    pub fn get_mut(&mut self, cur: MapCursor) -> Result<RefMut<'_, Entry<K, V>>> {
        self.buckets
            .get_mut(cur.bucket)
            .ok_or(Error::InvalidIterator)?
            .get_mut(cur.node)
    }

    /// Cursor of the node bound to the entry at `cur`, if any
    pub fn dual(&self, cur: MapCursor) -> Option<Cursor> {
        self.buckets.get(cur.bucket)?.dual(cur.node)
    }

    /// Iterate entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = Ref<'_, Entry<K, V>>> + '_ {
        self.buckets.iter().flat_map(|bucket| bucket.iter())
    }

    /// Bind the node at `at` in `order` to the table entry at `cur`, so
    /// both share one cell
    pub(crate) fn bind_from(
        &mut self,
        cur: MapCursor,
        order: &mut DoubleList<Entry<K, V>>,
        at: Cursor,
    ) -> Result<()> {
        let list = self
            .buckets
            .get_mut(cur.bucket)
            .ok_or(Error::InvalidIterator)?;
        order.bind(at, list, cur.node)
    }

    /// Cursors of every entry, bucket by bucket
    pub(crate) fn cursor_list(&self) -> Vec<MapCursor> {
        let mut out = Vec::with_capacity(self.len);
        for (bucket, list) in self.buckets.iter().enumerate() {
            for node in list.cursors() {
                out.push(MapCursor { bucket, node });
            }
        }
        out
    }

    fn bucket_of(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.buckets.len() as u64) as usize
    }

    /// Double the bucket count and rehash every entry
    ///
    /// Nodes migrate with their shared cell and dual field intact, so a
    /// bound partner list keeps reading the same cells afterwards. Popping
    /// from the old head and pushing to the new tail keeps the relative
    /// order of entries that land in the same bucket.
    fn expand(&mut self) {
        let mut next: Vec<DoubleList<Entry<K, V>>> =
            (0..self.buckets.len() * 2).map(|_| DoubleList::new()).collect();

        for list in &mut self.buckets {
            while let Some((cell, dual)) = list.pop_head_parts() {
                let bucket = {
                    let entry = cell.borrow();
                    (self.hasher.hash_one(&entry.key) % next.len() as u64) as usize
                };
                next[bucket].push_tail_parts(cell, dual);
            }
        }

        self.buckets = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_find() {
        let mut map = ChainedMap::new();
        let (_, inserted) = map.insert(1, "a");
        assert!(inserted);
        assert_eq!(map.len(), 1);

        let cur = map.find(&1).unwrap();
        assert_eq!(map.get(cur).unwrap().value, "a");
        assert!(map.find(&2).is_none());
    }

    #[test]
    fn test_overwrite_in_place() {
        let mut map = ChainedMap::new();
        map.insert(1, "a");
        let (cur, inserted) = map.insert(1, "b");
        assert!(!inserted);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(cur).unwrap().value, "b");
    }

    #[test]
    fn test_remove() {
        let mut map = ChainedMap::new();
        map.insert(1, "a");
        map.insert(2, "b");

        assert!(map.remove(&1));
        assert!(!map.remove(&1));
        assert_eq!(map.len(), 1);
        assert!(map.find(&1).is_none());
        assert!(map.find(&2).is_some());
    }

    #[test]
    fn test_defaults() {
        let map: ChainedMap<i32, i32> = ChainedMap::new();
        assert_eq!(map.capacity(), DEFAULT_CAPACITY);
        assert_eq!(map.load_factor(), DEFAULT_LOAD_FACTOR);
        assert!(map.is_empty());
    }

    #[test]
    fn test_expand_doubles_capacity() {
        let mut map = ChainedMap::with_capacity(4);
        // 4 * 0.75 = 3, so the fourth distinct key forces a rehash
        for i in 0..3 {
            map.insert(i, i);
        }
        assert_eq!(map.capacity(), 4);
        map.insert(3, 3);
        assert_eq!(map.capacity(), 8);
        assert_eq!(map.len(), 4);
    }

    #[test]
    fn test_rehash_preserves_contents() {
        let mut map = ChainedMap::with_capacity(4);
        for i in 0..200 {
            map.insert(i, i * 10);
        }
        assert_eq!(map.len(), 200);
        assert!(map.capacity() > 200);

        for i in 0..200 {
            let cur = map.find(&i).unwrap();
            assert_eq!(map.get(cur).unwrap().value, i * 10);
        }
    }

    #[test]
    fn test_overwrite_never_expands() {
        let mut map = ChainedMap::with_capacity(4);
        for i in 0..3 {
            map.insert(i, i);
        }
        let before = map.capacity();
        map.insert(0, 99);
        assert_eq!(map.capacity(), before);
    }

    #[test]
    fn test_clear_keeps_buckets() {
        let mut map = ChainedMap::with_capacity(4);
        for i in 0..20 {
            map.insert(i, i);
        }
        let capacity = map.capacity();
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.capacity(), capacity);
        assert!(map.find(&3).is_none());
    }

    #[test]
    fn test_iter_visits_everything() {
        let mut map = ChainedMap::new();
        for i in 0..8 {
            map.insert(i, i);
        }
        let mut keys: Vec<i32> = map.iter().map(|e| e.key).collect();
        keys.sort_unstable();
        assert_eq!(keys, (0..8).collect::<Vec<_>>());
    }
}
