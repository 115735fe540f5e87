//! LRU (Least Recently Used) cache implementation
//!
//! A hash index maps keys to slots in an arena-backed recency list, so
//! lookup, promotion and eviction are all O(1).

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::num::NonZeroUsize;

use ahash::RandomState;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::list::{Iter, RecencyList};

/// Upper bound on slots reserved up front; larger caches grow on demand
const MAX_PREALLOCATED: usize = 1 << 16;

/// LRU cache with fixed capacity
///
/// Not synchronized: every method that touches recency takes `&mut self`.
/// Use [`SyncLruCache`](crate::SyncLruCache) or
/// [`ShardedLruCache`](crate::ShardedLruCache) to share a cache between
/// threads.
///
/// To store "present but empty" entries, use `V = Option<T>`: `get` then
/// returns `Some(&None)` for such a key and `None` for a missing one.
pub struct LruCache<K, V, S = RandomState> {
    map: HashMap<K, usize, S>,
    list: RecencyList<K, V>,
    capacity: NonZeroUsize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Errors
    /// * `Error::InvalidConfiguration` - `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, S> LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    /// Create a new LRU cache using `hasher` for the key index
    pub fn with_hasher(capacity: usize, hasher: S) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::invalid("capacity must be greater than 0"))?;
        let reserve = capacity.get().min(MAX_PREALLOCATED);

        debug!(capacity = capacity.get(), "creating LRU cache");

        Ok(Self {
            map: HashMap::with_capacity_and_hasher(reserve, hasher),
            list: RecencyList::with_capacity(reserve),
            capacity,
        })
    }

    /// Get a value from the cache, marking it most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.list.promote(idx);
        self.list.value(idx)
    }

    /// Get a mutable reference to a value, marking it most recently used
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.list.promote(idx);
        self.list.value_mut(idx)
    }

    /// Get a value without touching recency order
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.map.get(key)?;
        self.list.value(idx)
    }

    /// Insert a key-value pair into the cache
    ///
    /// An existing key has its value replaced and becomes most recently
    /// used. A new key that pushes the cache over capacity evicts the least
    /// recently used entry, which is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            if let Some(slot) = self.list.value_mut(idx) {
                *slot = value;
            }
            self.list.promote(idx);
            return None;
        }

        let idx = self.list.push_front(key.clone(), value);
        self.map.insert(key, idx);

        if self.list.len() > self.capacity.get() {
            self.evict()
        } else {
            None
        }
    }

    /// Remove a key from the cache
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.map.remove(key)?;
        self.list.remove(idx).map(|(_, value)| value)
    }

    /// Check for a key without touching recency order
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.list.clear();
        debug!(capacity = self.capacity.get(), "cleared LRU cache");
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Entries from most to least recently used
    pub fn iter(&self) -> Iter<'_, K, V> {
        self.list.iter()
    }

    /// Keys from most to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.list.iter().map(|(key, _)| key)
    }

    fn evict(&mut self) -> Option<(K, V)> {
        let (key, value) = self.list.pop_back()?;
        self.map.remove(&key);
        trace!(len = self.map.len(), "evicted least recently used entry");
        Some((key, value))
    }
}

impl<K, V, S> fmt::Debug for LruCache<K, V, S>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: fmt::Debug,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, S> IntoIterator for &'a LruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
