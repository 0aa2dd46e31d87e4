//! Least Recently Used cache

use std::collections::HashMap;
use std::hash::Hash;

use super::policy::{Algorithm, EvictionPolicyCache};
use crate::ds::LinkedKeySet;

/// Capacity-bounded cache that evicts the least recently used entry.
///
/// Both `get` and `put` count as a use. Recency is tracked in a
/// [`LinkedKeySet`] whose front is the next eviction victim.
#[derive(Debug)]
pub struct LruCache<K, V> {
    capacity: usize,
    entries: HashMap<K, V>,
    order: LinkedKeySet<K>,
    evictions: u64,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: LinkedKeySet::new(),
            evictions: 0,
        }
    }

    /// Keys from least to most recently used
    pub fn keys_by_recency(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// The key that the next eviction would remove
    pub fn peek_lru(&self) -> Option<&K> {
        self.order.front()
    }

    /// The most recently used key
    pub fn peek_mru(&self) -> Option<&K> {
        self.order.back()
    }

    fn evict_one(&mut self) {
        if let Some(victim) = self.order.pop_front() {
            self.entries.remove(&victim);
            self.evictions += 1;
        }
    }
}

impl<K, V> EvictionPolicyCache<K, V> for LruCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn get(&mut self, key: &K) -> Option<V> {
        let value = self.entries.get(key)?.clone();
        self.order.move_to_back(key);
        Some(value)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(slot) = self.entries.get_mut(&key) {
            let old = std::mem::replace(slot, value);
            self.order.move_to_back(&key);
            return Some(old);
        }

        if self.entries.len() >= self.capacity {
            self.evict_one();
        }

        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        None
    }

    fn remove_by_key(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.remove(key);
        Some(value)
    }

    fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    fn evictions(&self) -> u64 {
        self.evictions
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Lru
    }
}
