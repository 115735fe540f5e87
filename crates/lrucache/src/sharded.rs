//! Sharded LRU cache for high-concurrency access
//!
//! Keys are distributed across independent [`LruCache`] shards, each behind
//! its own lock. Threads touching different shards never contend. The price
//! is that recency is tracked per shard: an insert evicts the least recently
//! used entry of its own shard, which need not be the globally oldest one.

use std::borrow::Borrow;
use std::hash::Hash;

use ahash::RandomState;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::lru::LruCache;
use crate::stats::CacheStats;
use crate::traits::ConcurrentCache;

/// Default number of shards
pub const DEFAULT_SHARD_COUNT: usize = 16;

/// LRU cache split into independently locked shards
pub struct ShardedLruCache<K, V> {
    shards: Box<[Mutex<LruCache<K, V>>]>,
    hasher: RandomState,
    capacity: usize,
    stats: CacheStats,
}

impl<K, V> ShardedLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a sharded cache holding at most `capacity` entries in total
    ///
    /// Capacity is split as evenly as possible; the first
    /// `capacity % shard_count` shards hold one extra entry.
    ///
    /// # Errors
    /// * `Error::InvalidConfiguration` - `capacity` is 0, `shard_count` is 0,
    ///   or there are more shards than capacity
    pub fn new(capacity: usize, shard_count: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::invalid("capacity must be greater than 0"));
        }
        if shard_count == 0 {
            return Err(Error::invalid("shard count must be greater than 0"));
        }
        if shard_count > capacity {
            return Err(Error::invalid(format!(
                "shard count {} exceeds capacity {}",
                shard_count, capacity
            )));
        }

        let base = capacity / shard_count;
        let extra = capacity % shard_count;

        let shards = (0..shard_count)
            .map(|i| LruCache::new(base + usize::from(i < extra)).map(Mutex::new))
            .collect::<Result<Vec<_>>>()?;

        debug!(capacity, shards = shard_count, "creating sharded LRU cache");

        Ok(Self {
            shards: shards.into_boxed_slice(),
            hasher: RandomState::new(),
            capacity,
            stats: CacheStats::new(),
        })
    }

    /// Create a sharded cache with [`DEFAULT_SHARD_COUNT`] shards, or fewer
    /// when the capacity is smaller than that
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::new(capacity, DEFAULT_SHARD_COUNT.min(capacity.max(1)))
    }

    #[inline]
    fn shard_index<Q>(&self, key: &Q) -> usize
    where
        Q: Hash + ?Sized,
    {
        (self.hasher.hash_one(key) % self.shards.len() as u64) as usize
    }

    #[inline]
    fn shard<Q>(&self, key: &Q) -> &Mutex<LruCache<K, V>>
    where
        Q: Hash + ?Sized,
    {
        &self.shards[self.shard_index(key)]
    }

    /// Get a copy of a value, marking it most recently used in its shard
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let value = self.shard(key).lock().get(key).cloned();

        match value {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        value
    }

    /// Insert or overwrite a value, returning the entry evicted from the
    /// key's shard if any
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        let (existed, evicted) = {
            let mut shard = self.shard(&key).lock();
            let existed = shard.contains_key(&key);
            (existed, shard.put(key, value))
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
        let value = self.shard(key).lock().remove(key);
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
        self.shard(key).lock().contains_key(key)
    }

    /// Clear every shard and reset statistics
    pub fn clear(&self) {
        for shard in self.shards.iter() {
            shard.lock().clear();
        }
        self.stats.reset();
    }

    /// Total number of entries across shards
    ///
    /// Shards are locked one at a time, so concurrent writers can make this
    /// a slightly stale figure.
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.lock().len()).sum()
    }

    /// Check if every shard is empty
    pub fn is_empty(&self) -> bool {
        self.shards.iter().all(|shard| shard.lock().is_empty())
    }

    /// Total capacity across shards
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of shards
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Keys shard by shard, each shard most recent first
    pub fn keys(&self) -> Vec<K> {
        self.shards
            .iter()
            .flat_map(|shard| shard.lock().keys().cloned().collect::<Vec<_>>())
            .collect()
    }
}

impl<K, V> ConcurrentCache<K, V> for ShardedLruCache<K, V>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    fn get(&self, key: &K) -> Option<V> {
        ShardedLruCache::get(self, key)
    }

    fn put(&self, key: K, value: V) -> Option<(K, V)> {
        ShardedLruCache::put(self, key, value)
    }

    fn remove(&self, key: &K) -> Option<V> {
        ShardedLruCache::remove(self, key)
    }

    fn contains_key(&self, key: &K) -> bool {
        ShardedLruCache::contains_key(self, key)
    }

    fn clear(&self) {
        ShardedLruCache::clear(self)
    }

    fn len(&self) -> usize {
        ShardedLruCache::len(self)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn keys(&self) -> Vec<K> {
        ShardedLruCache::keys(self)
    }
}
