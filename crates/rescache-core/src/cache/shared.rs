//! Lock-guarded cache handle shared between request handlers

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::factory::ResourceKind;
use super::policy::{Algorithm, EvictionPolicyCache};

/// Point-in-time statistics for one cache
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CacheStats {
    pub resource: String,
    pub algorithm: Algorithm,
    pub capacity: usize,
    pub len: usize,
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub evictions: u64,
    pub removals: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache
    pub fn hit_ratio(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: u64,
    misses: u64,
    puts: u64,
    evictions: u64,
    removals: u64,
}

struct State<K, V> {
    policy: Box<dyn EvictionPolicyCache<K, V>>,
    counters: Counters,
}

struct Inner<K, V> {
    resource: ResourceKind,
    algorithm: Algorithm,
    state: Mutex<State<K, V>>,
}

/// A policy cache behind a single mutex.
///
/// Each operation holds the lock for its whole body, so index lookups,
/// bucket moves and map writes are never observed half done. Cloning the
/// handle shares the same cache.
pub struct SharedCache<K, V> {
    inner: Arc<Inner<K, V>>,
}

impl<K, V> Clone for SharedCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> SharedCache<K, V> {
    /// Wrap a policy cache for one resource
    pub fn new(resource: ResourceKind, policy: Box<dyn EvictionPolicyCache<K, V>>) -> Self {
        let algorithm = policy.algorithm();
        Self {
            inner: Arc::new(Inner {
                resource,
                algorithm,
                state: Mutex::new(State {
                    policy,
                    counters: Counters::default(),
                }),
            }),
        }
    }

    pub fn resource(&self) -> &ResourceKind {
        &self.inner.resource
    }

    pub fn algorithm(&self) -> Algorithm {
        self.inner.algorithm
    }

    /// Look up a key, recording a hit or a miss
    pub fn get(&self, key: &K) -> Option<V> {
        let value = {
            let mut state = self.inner.state.lock();
            let value = state.policy.get(key);
            if value.is_some() {
                state.counters.hits += 1;
            } else {
                state.counters.misses += 1;
            }
            value
        };

        if value.is_some() {
            self.count("rescache_cache_hits_total", 1);
        } else {
            self.count("rescache_cache_misses_total", 1);
        }
        value
    }

    /// Insert or overwrite a key, returning the value it replaced
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let (previous, evicted) = {
            let mut state = self.inner.state.lock();
            let before = state.policy.evictions();
            let previous = state.policy.put(key, value);
            let evicted = state.policy.evictions() - before;
            state.counters.puts += 1;
            state.counters.evictions += evicted;
            (previous, evicted)
        };

        self.count("rescache_cache_puts_total", 1);
        if evicted > 0 {
            debug!(
                "Evicted {} entr{} from {} cache",
                evicted,
                if evicted == 1 { "y" } else { "ies" },
                self.inner.resource
            );
            self.count("rescache_cache_evictions_total", evicted);
        }
        previous
    }

    /// Remove a key, returning its value if it was present
    pub fn remove_by_key(&self, key: &K) -> Option<V> {
        let removed = {
            let mut state = self.inner.state.lock();
            let removed = state.policy.remove_by_key(key);
            if removed.is_some() {
                state.counters.removals += 1;
            }
            removed
        };

        if removed.is_some() {
            self.count("rescache_cache_removals_total", 1);
        }
        removed
    }

    /// Check for a key without recording a use
    pub fn contains(&self, key: &K) -> bool {
        self.inner.state.lock().policy.contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.state.lock().policy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().policy.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.inner.state.lock().policy.capacity()
    }

    /// Drop every entry, keeping the counters
    pub fn clear(&self) {
        self.inner.state.lock().policy.clear();
        debug!("Cleared {} cache", self.inner.resource);
    }

    /// Snapshot the counters together with the current size
    pub fn stats(&self) -> CacheStats {
        let state = self.inner.state.lock();
        CacheStats {
            resource: self.inner.resource.to_string(),
            algorithm: self.inner.algorithm,
            capacity: state.policy.capacity(),
            len: state.policy.len(),
            hits: state.counters.hits,
            misses: state.counters.misses,
            puts: state.counters.puts,
            evictions: state.counters.evictions,
            removals: state.counters.removals,
        }
    }

    fn count(&self, name: &'static str, value: u64) {
        metrics::counter!(
            name,
            "resource" => self.inner.resource.to_string(),
            "algorithm" => self.inner.algorithm.as_str()
        )
        .increment(value);
    }
}
