//! # lrucache
//!
//! Fixed-capacity LRU (Least Recently Used) cache with O(1) `get` and `put`.
//!
//! ## Architecture
//! - **Index**: AHash map from key to slot (O(1) lookup)
//! - **Recency List**: arena-backed doubly-linked list with head/tail
//!   sentinels, most recently used first (O(1) promotion and eviction)
//! - **Wrappers**: [`SyncLruCache`] (one lock, exact LRU) and
//!   [`ShardedLruCache`] (per-shard locks, per-shard LRU)
//!
//! ```
//! use lrucache::LruCache;
//!
//! let mut cache = LruCache::new(2)?;
//! cache.put(1, "A");
//! cache.put(2, "B");
//! cache.get(&1);
//! cache.put(3, "C");
//!
//! assert_eq!(cache.get(&2), None);
//! assert_eq!(cache.get(&1), Some(&"A"));
//! # Ok::<(), lrucache::Error>(())
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod list;
mod lru;
mod sharded;
mod stats;
mod sync;
mod traits;

pub use config::{CacheConfig, DEFAULT_CAPACITY};
pub use error::{Error, Result};
pub use list::Iter;
pub use lru::LruCache;
pub use sharded::{ShardedLruCache, DEFAULT_SHARD_COUNT};
pub use stats::{CacheStats, StatsSnapshot};
pub use sync::SyncLruCache;
pub use traits::ConcurrentCache;
