//! Cache configuration

use std::hash::Hash;
use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sharded::ShardedLruCache;
use crate::sync::SyncLruCache;
use crate::traits::ConcurrentCache;

/// Default capacity (number of entries)
pub const DEFAULT_CAPACITY: i64 = 1024;

/// Cache configuration
///
/// `capacity` is signed so that a negative value coming from a config file
/// or the command line is reported as `InvalidConfiguration` rather than
/// failing to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries across the whole cache
    pub capacity: i64,

    /// Number of independently locked shards (1 = single lock, exact LRU)
    pub shards: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            shards: 1,
        }
    }
}

impl CacheConfig {
    /// Create config with the given capacity and a single shard
    pub fn new(capacity: i64) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    /// Set the shard count
    pub fn with_shards(mut self, shards: usize) -> Self {
        self.shards = shards;
        self
    }

    /// Check the configuration and return the usable capacity
    pub fn validate(&self) -> Result<NonZeroUsize> {
        if self.capacity <= 0 {
            return Err(Error::invalid(format!(
                "capacity must be greater than 0, got {}",
                self.capacity
            )));
        }

        let capacity = usize::try_from(self.capacity)
            .ok()
            .and_then(NonZeroUsize::new)
            .ok_or_else(|| {
                Error::invalid(format!("capacity {} is out of range", self.capacity))
            })?;

        if self.shards == 0 {
            return Err(Error::invalid("shard count must be greater than 0"));
        }
        if self.shards > capacity.get() {
            return Err(Error::invalid(format!(
                "shard count {} exceeds capacity {}",
                self.shards, capacity
            )));
        }

        Ok(capacity)
    }

    /// Build a thread-safe cache for this configuration
    ///
    /// One shard yields a [`SyncLruCache`] (exact global LRU order); more
    /// yield a [`ShardedLruCache`] (LRU order per shard).
    pub fn build<K, V>(&self) -> Result<Box<dyn ConcurrentCache<K, V>>>
    where
        K: Hash + Eq + Clone + Send + 'static,
        V: Clone + Send + 'static,
    {
        let capacity = self.validate()?.get();

        if self.shards == 1 {
            Ok(Box::new(SyncLruCache::new(capacity)?))
        } else {
            Ok(Box::new(ShardedLruCache::new(capacity, self.shards)?))
        }
    }
}
