//! Recency-ordered hash map
//!
//! Composes one [`ChainedMap`] (keyed lookup) with one [`DoubleList`] (the
//! recency list). Each table entry node is bound to exactly one recency
//! node, so the two structures address a single shared cell per entry and
//! never hold independent copies of a key or value.
//!
//! The recency list's head is the most recently written entry and its tail
//! the least recently written one. Reads through [`LinkedHashMap::at`]
//! never change the order; only insertion and overwrite do.

use std::cell::{Ref, RefMut};
use std::hash::{BuildHasher, Hash};

use ahash::RandomState;

use crate::error::{Error, Result};
use crate::list::{Cursor, DoubleList, Iter};
use crate::map::{ChainedMap, Entry};

/// Hash map whose iteration order is most-recent-write first
pub struct LinkedHashMap<K, V, S = RandomState> {
    table: ChainedMap<K, V, S>,
    order: DoubleList<Entry<K, V>>,
}

impl<K: Hash + Eq + Clone, V: Clone> LinkedHashMap<K, V, RandomState> {
    /// Create a map with the default capacity and load factor
    pub fn new() -> Self {
        Self {
            table: ChainedMap::new(),
            order: DoubleList::new(),
        }
    }

    /// Create a map with `capacity` initial buckets
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            table: ChainedMap::with_capacity(capacity),
            order: DoubleList::new(),
        }
    }
}

impl<K: Hash + Eq + Clone, V: Clone> Default for LinkedHashMap<K, V, RandomState> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq + Clone, V: Clone, S: BuildHasher> LinkedHashMap<K, V, S> {
    /// Create a map with a caller-supplied hash policy
    pub fn with_hasher(capacity: usize, load_factor: f64, hasher: S) -> Self {
        Self {
            table: ChainedMap::with_hasher(capacity, load_factor, hasher),
            order: DoubleList::new(),
        }
    }

    /// Insert or overwrite, promoting the entry to most-recent
    ///
    /// A new key is inserted into the table and a recency node holding the
    /// same entry is created at the head and bound to the table node;
    /// returns `(head cursor, true)`. An existing key has its value
    /// overwritten through the shared cell and its recency node spliced to
    /// the head, leaving every other entry's order untouched; returns
    /// `(head cursor, false)`.
    pub fn insert(&mut self, key: K, value: V) -> Result<(Cursor, bool)> {
        if let Some(cur) = self.table.find(&key) {
            self.table.get_mut(cur)?.value = value;
            let partner = self.table.dual(cur).ok_or(Error::InvalidIterator)?;
            self.order.move_to_head(partner)?;
            return Ok((self.order.begin(), false));
        }

        let buckets_before = self.table.capacity();
        let (cur, _) = self.table.insert(key, value);
        if self.table.capacity() != buckets_before {
            // Rehashing moved every table node to a fresh slot; the recency
            // nodes' back-references must follow.
            self.restitch();
        }

        let entry = self.table.get(cur)?.clone();
        let head = self.order.insert_head(entry);
        self.table.bind_from(cur, &mut self.order, head)?;
        Ok((head, true))
    }

    /// Borrow the value for `key`, without touching recency order
    ///
    /// Fails with [`Error::KeyNotFound`] if absent.
    pub fn at(&self, key: &K) -> Result<Ref<'_, V>> {
        let cur = self.table.find(key).ok_or(Error::KeyNotFound)?;
        Ok(Ref::map(self.table.get(cur)?, |entry| &entry.value))
    }

    /// Mutably borrow the value for `key`, without touching recency order
    pub fn at_mut(&mut self, key: &K) -> Result<RefMut<'_, V>> {
        let cur = self.table.find(key).ok_or(Error::KeyNotFound)?;
        Ok(RefMut::map(self.table.get_mut(cur)?, |entry| {
            &mut entry.value
        }))
    }

    /// Recency cursor of the entry for `key`, or `end()` if absent
    pub fn find(&self, key: &K) -> Cursor {
        self.table
            .find(key)
            .and_then(|cur| self.table.dual(cur))
            .unwrap_or_else(|| self.order.end())
    }

    /// Remove the entry at the given recency cursor from both structures
    ///
    /// Fails with [`Error::InvalidIterator`] on `end()` or a stale cursor.
    pub fn remove(&mut self, cur: Cursor) -> Result<()> {
        let key = self.order.get(cur)?.key.clone();
        self.table.remove(&key);
        self.order.erase(cur)?;
        Ok(())
    }

    /// 1 if `key` has an entry, 0 otherwise
    pub fn count(&self, key: &K) -> usize {
        usize::from(self.table.find(key).is_some())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current table bucket count
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Drop every entry from both structures
    pub fn clear(&mut self) {
        self.order.clear();
        self.table.clear();
    }

    /// Cursor to the most recently written entry
    pub fn begin(&self) -> Cursor {
        self.order.begin()
    }

    /// Cursor one past the least recently written entry
    pub fn end(&self) -> Cursor {
        self.order.end()
    }

    /// Cursor to the least recently written entry, or `end()` if empty
    pub fn last(&self) -> Cursor {
        self.order.prev(self.order.end()).unwrap_or_else(|_| self.order.end())
    }

    /// Advance a recency cursor towards the least recent entry
    pub fn next(&self, cur: Cursor) -> Result<Cursor> {
        self.order.next(cur)
    }

    /// Borrow the entry at a recency cursor
    pub fn get(&self, cur: Cursor) -> Result<Ref<'_, Entry<K, V>>> {
        self.order.get(cur)
    }

    /// Iterate entries most-recent to least-recent
    pub fn iter(&self) -> Iter<'_, Entry<K, V>> {
        self.order.iter()
    }

    /// Point every recency node's dual at its entry's post-rehash table node
    fn restitch(&mut self) {
        for cur in self.table.cursor_list() {
            if let Some(partner) = self.table.dual(cur) {
                self.order.set_dual(partner, cur.node);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys<S: BuildHasher>(map: &LinkedHashMap<i32, String, S>) -> Vec<i32> {
        map.iter().map(|entry| entry.key).collect()
    }

    #[test]
    fn test_insert_orders_most_recent_first() {
        let mut map = LinkedHashMap::new();
        map.insert(1, "a".to_string()).unwrap();
        map.insert(2, "b".to_string()).unwrap();
        map.insert(3, "c".to_string()).unwrap();

        assert_eq!(keys(&map), vec![3, 2, 1]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_overwrite_moves_to_head() {
        let mut map = LinkedHashMap::new();
        map.insert(1, "a".to_string()).unwrap();
        map.insert(2, "b".to_string()).unwrap();
        map.insert(3, "c".to_string()).unwrap();

        let (head, inserted) = map.insert(1, "a2".to_string()).unwrap();
        assert!(!inserted);
        assert_eq!(head, map.begin());
        assert_eq!(map.len(), 3);
        assert_eq!(keys(&map), vec![1, 3, 2]);
        assert_eq!(*map.at(&1).unwrap(), "a2");
    }

    #[test]
    fn test_at_does_not_reorder() {
        let mut map = LinkedHashMap::new();
        map.insert(1, "a".to_string()).unwrap();
        map.insert(2, "b".to_string()).unwrap();

        assert_eq!(*map.at(&1).unwrap(), "a");
        assert_eq!(keys(&map), vec![2, 1]);
    }

    #[test]
    fn test_at_missing_key() {
        let map: LinkedHashMap<i32, String> = LinkedHashMap::new();
        assert_eq!(map.at(&7).unwrap_err(), Error::KeyNotFound);
    }

    #[test]
    fn test_find_returns_recency_cursor() {
        let mut map = LinkedHashMap::new();
        map.insert(1, "a".to_string()).unwrap();
        map.insert(2, "b".to_string()).unwrap();

        let cur = map.find(&1);
        assert_eq!(map.get(cur).unwrap().value, "a");
        assert_eq!(map.find(&9), map.end());
    }

    #[test]
    fn test_remove_updates_both_sides() {
        let mut map = LinkedHashMap::new();
        map.insert(1, "a".to_string()).unwrap();
        map.insert(2, "b".to_string()).unwrap();

        let cur = map.find(&1);
        map.remove(cur).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.count(&1), 0);
        assert_eq!(keys(&map), vec![2]);

        assert_eq!(map.remove(map.end()).unwrap_err(), Error::InvalidIterator);
    }

    #[test]
    fn test_last_is_least_recent() {
        let mut map = LinkedHashMap::new();
        assert_eq!(map.last(), map.end());

        map.insert(1, "a".to_string()).unwrap();
        map.insert(2, "b".to_string()).unwrap();
        assert_eq!(map.get(map.last()).unwrap().key, 1);

        // Overwriting key 1 makes key 2 the least recent
        map.insert(1, "a2".to_string()).unwrap();
        assert_eq!(map.get(map.last()).unwrap().key, 2);
    }

    #[test]
    fn test_update_through_shared_cell() {
        let mut map = LinkedHashMap::new();
        map.insert(1, "a".to_string()).unwrap();
        map.insert(1, "b".to_string()).unwrap();

        // One logical value: the recency node sees the overwrite
        assert_eq!(map.get(map.begin()).unwrap().value, "b");
        assert_eq!(*map.at(&1).unwrap(), "b");
    }

    #[test]
    fn test_rehash_keeps_bindings() {
        let mut map = LinkedHashMap::with_capacity(4);
        for i in 0..50 {
            map.insert(i, format!("v{i}")).unwrap();
        }
        assert!(map.capacity() > 4);

        // Overwriting an old key still follows its binding to the recency
        // node created long before the rehashes
        map.insert(0, "fresh".to_string()).unwrap();
        assert_eq!(map.get(map.begin()).unwrap().key, 0);
        assert_eq!(*map.at(&0).unwrap(), "fresh");

        for i in 1..50 {
            assert_eq!(*map.at(&i).unwrap(), format!("v{i}"));
        }
        assert_eq!(map.len(), 50);
    }

    #[test]
    fn test_clear() {
        let mut map = LinkedHashMap::new();
        map.insert(1, "a".to_string()).unwrap();
        map.insert(2, "b".to_string()).unwrap();
        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.begin(), map.end());
        assert_eq!(map.count(&1), 0);

        map.insert(3, "c".to_string()).unwrap();
        assert_eq!(keys(&map), vec![3]);
    }

    #[test]
    fn test_cursor_walk_matches_iter() {
        let mut map = LinkedHashMap::new();
        for i in 0..5 {
            map.insert(i, i.to_string()).unwrap();
        }

        let mut walked = Vec::new();
        let mut cur = map.begin();
        while cur != map.end() {
            walked.push(map.get(cur).unwrap().key);
            cur = map.next(cur).unwrap();
        }
        assert_eq!(walked, keys(&map));
    }
}
