//! Cache eviction policies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::CoreError;

/// Eviction algorithm selected by configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Least Recently Used - evict the entry that was read or written longest ago
    Lru,
    /// Least Frequently Used - evict the entry with the lowest access count
    #[default]
    Lfu,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Lru => "lru",
            Algorithm::Lfu => "lfu",
        }
    }

    /// Resolve a configured algorithm name.
    ///
    /// "LRU" in any casing selects [`Algorithm::Lru`]; every other value,
    /// including an empty string, selects [`Algorithm::Lfu`].
    pub fn from_setting(name: &str) -> Self {
        match name.parse() {
            Ok(algorithm) => algorithm,
            Err(e) => {
                if !name.is_empty() {
                    warn!("{}, falling back to lfu", e);
                }
                Algorithm::Lfu
            }
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lru" => Ok(Algorithm::Lru),
            "lfu" => Ok(Algorithm::Lfu),
            _ => Err(CoreError::InvalidAlgorithm(s.to_string())),
        }
    }
}

/// Uniform contract implemented by every eviction policy.
///
/// A missing key is reported as `None`, never as an error. Implementations
/// are not synchronised; wrap them in a [`SharedCache`](super::SharedCache)
/// to share one between threads.
pub trait EvictionPolicyCache<K, V>: Send {
    /// Look up a key, recording a use under the active policy
    fn get(&mut self, key: &K) -> Option<V>;

    /// Insert or overwrite a key, returning the value it replaced.
    ///
    /// With zero capacity this is a no-op that returns `None`. Inserting a
    /// new key into a full cache evicts exactly one entry first.
    fn put(&mut self, key: K, value: V) -> Option<V>;

    /// Remove a key, returning its value if it was present
    fn remove_by_key(&mut self, key: &K) -> Option<V>;

    /// Check for a key without recording a use
    fn contains(&self, key: &K) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn clear(&mut self);

    /// Number of entries evicted to make room since construction
    fn evictions(&self) -> u64;

    fn algorithm(&self) -> Algorithm;
}
