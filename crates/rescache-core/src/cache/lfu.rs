//! Least Frequently Used cache
//!
//! Every key carries an access frequency that starts at 1 on insertion and
//! grows by one on each `get` or overwriting `put`. Keys sharing a frequency
//! live in one bucket, ordered by when they reached that frequency:
//!
//! ```text
//!   min_frequency = 1
//!        │
//!        ▼
//!   freq=1: [c] ◄──► [e]        ← c is the next victim
//!   freq=2: [a] ◄──► [b]
//!   freq=5: [d]
//! ```
//!
//! Eviction pops the front of the `min_frequency` bucket, so ties among
//! equally infrequent keys are broken first-in first-out.

use std::collections::HashMap;
use std::hash::Hash;

use super::policy::{Algorithm, EvictionPolicyCache};
use crate::ds::LinkedKeySet;

/// Capacity-bounded cache that evicts the least frequently used entry
#[derive(Debug)]
pub struct LfuCache<K, V> {
    capacity: usize,
    values: HashMap<K, V>,
    frequencies: HashMap<K, u64>,
    buckets: HashMap<u64, LinkedKeySet<K>>,
    min_frequency: u64,
    evictions: u64,
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            values: HashMap::new(),
            frequencies: HashMap::new(),
            buckets: HashMap::new(),
            min_frequency: 0,
            evictions: 0,
        }
    }

    /// Current access frequency of a key
    pub fn frequency(&self, key: &K) -> Option<u64> {
        self.frequencies.get(key).copied()
    }

    /// Smallest frequency tracked for eviction.
    ///
    /// Emptying the cache through `remove_by_key` can leave this pointing
    /// past every bucket; the next insertion resets it to 1.
    pub fn min_frequency(&self) -> u64 {
        self.min_frequency
    }

    /// Keys sharing `frequency`, in the order they reached it
    pub fn bucket(&self, frequency: u64) -> Vec<&K> {
        self.buckets
            .get(&frequency)
            .map(|bucket| bucket.iter().collect())
            .unwrap_or_default()
    }

    /// The key that the next eviction would remove
    pub fn peek_lfu(&self) -> Option<&K> {
        self.buckets
            .get(&self.victim_frequency()?)
            .and_then(|bucket| bucket.front())
    }

    /// Move a key from bucket `f` to bucket `f + 1`
    fn touch(&mut self, key: &K) {
        let Some(frequency) = self.frequencies.get_mut(key) else {
            return;
        };
        let current = *frequency;
        *frequency = current + 1;

        self.detach(key, current);
        self.buckets
            .entry(current + 1)
            .or_default()
            .push_back(key.clone());
    }

    /// Remove a key from its bucket, dropping the bucket once empty
    fn detach(&mut self, key: &K, frequency: u64) {
        if let Some(bucket) = self.buckets.get_mut(&frequency) {
            bucket.remove(key);
            if bucket.is_empty() {
                self.buckets.remove(&frequency);
                if frequency == self.min_frequency {
                    self.min_frequency += 1;
                }
            }
        }
    }

    fn victim_frequency(&self) -> Option<u64> {
        if self.buckets.contains_key(&self.min_frequency) {
            Some(self.min_frequency)
        } else {
            self.buckets.keys().min().copied()
        }
    }

    fn evict_one(&mut self) {
        let Some(frequency) = self.victim_frequency() else {
            return;
        };

        let victim = match self.buckets.get_mut(&frequency) {
            Some(bucket) => {
                let victim = bucket.pop_front();
                if bucket.is_empty() {
                    self.buckets.remove(&frequency);
                }
                victim
            }
            None => None,
        };

        if let Some(victim) = victim {
            self.values.remove(&victim);
            self.frequencies.remove(&victim);
            self.evictions += 1;
        }
    }
}

impl<K, V> EvictionPolicyCache<K, V> for LfuCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn get(&mut self, key: &K) -> Option<V> {
        let value = self.values.get(key)?.clone();
        self.touch(key);
        Some(value)
    }

    fn put(&mut self, key: K, value: V) -> Option<V> {
        if self.capacity == 0 {
            return None;
        }

        if let Some(slot) = self.values.get_mut(&key) {
            let old = std::mem::replace(slot, value);
            self.touch(&key);
            return Some(old);
        }

        if self.values.len() >= self.capacity {
            self.evict_one();
        }

        self.values.insert(key.clone(), value);
        self.frequencies.insert(key.clone(), 1);
        self.buckets.entry(1).or_default().push_back(key);
        self.min_frequency = 1;
        None
    }

    fn remove_by_key(&mut self, key: &K) -> Option<V> {
        let value = self.values.remove(key)?;
        if let Some(frequency) = self.frequencies.remove(key) {
            self.detach(key, frequency);
        }
        Some(value)
    }

    fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    fn len(&self) -> usize {
        self.values.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn clear(&mut self) {
        self.values.clear();
        self.frequencies.clear();
        self.buckets.clear();
        self.min_frequency = 0;
    }

    fn evictions(&self) -> u64 {
        self.evictions
    }

    fn algorithm(&self) -> Algorithm {
        Algorithm::Lfu
    }
}
