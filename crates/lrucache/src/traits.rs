//! Shared interface for thread-safe caches

use crate::stats::CacheStats;

/// A cache that can be shared between threads
///
/// Implemented by [`SyncLruCache`](crate::SyncLruCache) and
/// [`ShardedLruCache`](crate::ShardedLruCache). Values are returned by
/// clone since no reference can outlive the internal lock.
///
/// Lookups take `&K` rather than a generic `Borrow<Q>` key so the trait stays
/// object-safe. Callers holding a borrowed form (`&str` for `String` keys)
/// can use the inherent `get`/`remove`/`contains_key` on the concrete types,
/// which accept any `Q` where `K: Borrow<Q>`.
pub trait ConcurrentCache<K, V>: Send + Sync {
    /// Look up a key, marking it most recently used
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or overwrite a key, returning the entry evicted to make room
    fn put(&self, key: K, value: V) -> Option<(K, V)>;

    /// Remove a key, returning its value
    fn remove(&self, key: &K) -> Option<V>;

    /// Check for a key without touching recency order
    fn contains_key(&self, key: &K) -> bool;

    /// Drop every entry and reset statistics
    fn clear(&self);

    /// Number of live entries
    fn len(&self) -> usize;

    /// Whether the cache holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of entries
    fn capacity(&self) -> usize;

    /// Hit/miss and mutation counters
    fn stats(&self) -> &CacheStats;

    /// Snapshot of the keys in recency order (most recent first)
    fn keys(&self) -> Vec<K>;
}
