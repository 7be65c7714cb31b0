//! # linkmap
//!
//! Order-aware map collections built from first principles:
//! - **DoubleList**: slot-arena circular doubly linked list with
//!   generational cursors and cross-list node binding
//! - **ChainedMap**: separate-chaining hash table with dynamic rehashing
//! - **LinkedHashMap**: the two fused into one map, addressable by key in
//!   O(1) and by recency position in O(1), storing each entry exactly once
//!
//! Single-threaded by design; every operation completes or fails
//! synchronously with an explicit [`Error`].

#![warn(missing_docs)]

mod error;
mod linked;
mod list;
mod map;

pub use error::{Error, Result};
pub use linked::LinkedHashMap;
pub use list::{Cursor, DoubleList, Iter};
pub use map::{ChainedMap, Entry, MapCursor, DEFAULT_CAPACITY, DEFAULT_LOAD_FACTOR};
