//! Cache construction from configuration

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use tracing::{info, warn};

use super::lfu::LfuCache;
use super::lru::LruCache;
use super::policy::{Algorithm, EvictionPolicyCache};
use super::shared::SharedCache;

/// Cache settings shared by every cache the factory builds
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheSettings {
    /// Eviction algorithm name, "LRU" or "LFU" in any casing
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// Maximum entries per cache; zero or negative disables storage
    #[serde(default = "default_capacity")]
    pub capacity: i64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            capacity: default_capacity(),
        }
    }
}

fn default_algorithm() -> String {
    "LFU".to_string()
}

fn default_capacity() -> i64 {
    100
}

/// Name of a logical resource owning one cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceKind(Cow<'static, str>);

impl ResourceKind {
    pub const USERS: ResourceKind = ResourceKind(Cow::Borrowed("users"));
    pub const PRODUCTS: ResourceKind = ResourceKind(Cow::Borrowed("products"));

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds one cache per resource from a single set of settings
#[derive(Debug, Clone)]
pub struct CacheFactory {
    algorithm: Algorithm,
    capacity: usize,
}

impl CacheFactory {
    pub fn new(settings: &CacheSettings) -> Self {
        let algorithm = Algorithm::from_setting(&settings.algorithm);

        let capacity = if settings.capacity <= 0 {
            warn!(
                "Cache capacity {} is not positive, caches will store nothing",
                settings.capacity
            );
            0
        } else {
            usize::try_from(settings.capacity).unwrap_or(usize::MAX)
        };

        info!(
            "Initializing cache factory (algorithm: {}, capacity: {})",
            algorithm, capacity
        );

        Self {
            algorithm,
            capacity,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Build a fresh, empty cache for `resource`
    pub fn create_cache<K, V>(&self, resource: ResourceKind) -> SharedCache<K, V>
    where
        K: Eq + Hash + Clone + Send + 'static,
        V: Clone + Send + 'static,
    {
        let policy: Box<dyn EvictionPolicyCache<K, V>> = match self.algorithm {
            Algorithm::Lru => Box::new(LruCache::new(self.capacity)),
            Algorithm::Lfu => Box::new(LfuCache::new(self.capacity)),
        };

        info!(
            "Created {} cache for {} (capacity: {})",
            self.algorithm, resource, self.capacity
        );

        SharedCache::new(resource, policy)
    }
}
