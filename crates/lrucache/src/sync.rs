//! SyncLruCache: LRU cache behind a single lock

use std::borrow::Borrow;
use std::hash::Hash;

use parking_lot::Mutex;

use crate::error::Result;
use crate::lru::LruCache;
use crate::stats::CacheStats;
use crate::traits::ConcurrentCache;

/// Thread-safe LRU cache guarded by one mutex
///
/// Index and recency list are always updated under the same lock, so global
/// LRU order is exact. Every successful read reorders the list, which is
/// why this is a `Mutex` rather than an `RwLock`.
pub struct SyncLruCache<K, V> {
    /// LRU cache for hot data
    cache: Mutex<LruCache<K, V>>,

    /// Cache statistics
    stats: CacheStats,
}

impl<K, V> SyncLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new SyncLruCache with the given capacity
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of items in cache
    ///
    /// # Returns
    /// * `Result<SyncLruCache>` - `Error::InvalidConfiguration` if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Ok(Self {
            cache: Mutex::new(LruCache::new(capacity)?),
            stats: CacheStats::new(),
        })
    }

    /// Get a copy of a value, marking it most recently used
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.cache.lock().get(key).cloned();

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Get a copy of a value without touching recency order
    ///
    /// Not counted as a hit or miss.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().peek(key).cloned()
    }

    /// Insert or overwrite a value, returning the evicted entry if any
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let (existed, evicted) = {
            let mut cache = self.cache.lock();
            let existed = cache.contains_key(&key);
            (existed, cache.put(key, value))
        };

        if existed {
            self.stats.record_update();
        } else {
            self.stats.record_insert();
        }
        if evicted.is_some() {
            self.stats.record_eviction();
        }
        evicted
    }

    /// Remove a key, returning its value
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.cache.lock().remove(key);
        if value.is_some() {
            self.stats.record_removal();
        }
        value
    }

    /// Check for a key without touching recency order
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.cache.lock().contains_key(key)
    }

    /// Clear the cache and its statistics
    pub fn clear(&self) {
        self.cache.lock().clear();
        self.stats.reset();
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> Vec<K> {
        self.cache.lock().keys().cloned().collect()
    }
}

impl<K, V> ConcurrentCache<K, V> for SyncLruCache<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        SyncLruCache::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Option<(K, V)> {
        SyncLruCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        SyncLruCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        SyncLruCache::contains_key(self, key)
    }

    fn clear(&self) {
        SyncLruCache::clear(self)
    }

    fn len(&self) -> usize {
        SyncLruCache::len(self)
    }

    fn capacity(&self) -> usize {
        SyncLruCache::capacity(self)
    }

    fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn keys(&self) -> Vec<K> {
        SyncLruCache::keys(self)
    }
}
