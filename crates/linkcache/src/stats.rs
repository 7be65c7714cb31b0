//! Cache statistics tracking

use std::cell::Cell;

/// Counters for cache performance tracking
///
/// Counters live in `Cell`s so read paths taking `&self` can still record
/// hits and misses; the cache is single-threaded throughout, so no atomics
/// are involved.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: Cell<u64>,
    misses: Cell<u64>,
    inserts: Cell<u64>,
    evictions: Cell<u64>,
}

impl CacheStats {
    /// Create a zeroed stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cache hit
    pub fn record_hit(&self) {
        self.hits.set(self.hits.get() + 1);
    }

    /// Record a cache miss
    pub fn record_miss(&self) {
        self.misses.set(self.misses.get() + 1);
    }

    /// Record an insert or overwrite
    pub fn record_insert(&self) {
        self.inserts.set(self.inserts.get() + 1);
    }

    /// Record an eviction
    pub fn record_eviction(&self) {
        self.evictions.set(self.evictions.get() + 1);
    }

    /// Total hits
    pub fn hits(&self) -> u64 {
        self.hits.get()
    }

    /// Total misses
    pub fn misses(&self) -> u64 {
        self.misses.get()
    }

    /// Total inserts
    pub fn inserts(&self) -> u64 {
        self.inserts.get()
    }

    /// Total evictions
    pub fn evictions(&self) -> u64 {
        self.evictions.get()
    }

    /// Hit ratio over all lookups (0.0 when none happened yet)
    pub fn hit_ratio(&self) -> f64 {
        let hits = self.hits();
        let total = hits + self.misses();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Zero every counter
    pub fn reset(&self) {
        self.hits.set(0);
        self.misses.set(0);
        self.inserts.set(0);
        self.evictions.set(0);
    }
}
