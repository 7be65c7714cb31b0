//! # linkcache
//!
//! Fixed-capacity LRU cache layered on linkmap.
//!
//! ## Architecture
//! - **LinkedHashMap**: O(1) keyed lookup fused with O(1) recency order
//! - **Eviction**: least recently *written* entry goes first; reads never
//!   promote
//! - **Observability**: hit/miss/eviction counters plus tracing events

#![warn(missing_docs)]

mod cache;
mod stats;

pub use cache::LruCache;
pub use stats::CacheStats;
