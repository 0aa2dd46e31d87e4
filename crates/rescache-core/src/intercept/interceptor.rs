//! Read-through, write-through and invalidate-on-write wrappers

use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use tracing::debug;

use crate::cache::SharedCache;

/// Mediates every cache access for one resource.
///
/// The cache lock is only held inside the individual cache calls, never
/// across the wrapped operation. Two callers missing on the same key may
/// both run the load; the later `put` wins.
pub struct CacheInterceptor<K, V> {
    cache: SharedCache<K, V>,
}

impl<K, V> Clone for CacheInterceptor<K, V> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
        }
    }
}

impl<K, V> CacheInterceptor<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + 'static,
    V: Clone + Send + 'static,
{
    pub fn new(cache: SharedCache<K, V>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &SharedCache<K, V> {
        &self.cache
    }

    /// Serve `key` from the cache, or run `load` and cache its result.
    ///
    /// An error from `load` is returned unchanged and nothing is cached.
    pub async fn read_through<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.cache.get(&key) {
            debug!("Cache hit for {} {:?}", self.cache.resource(), key);
            return Ok(value);
        }

        debug!(
            "Cache miss for {} {:?}, invoking loader",
            self.cache.resource(),
            key
        );
        let value = load().await?;
        self.cache.put(key, value.clone());
        Ok(value)
    }

    /// Run `write`, then cache its result under the key `key_of` extracts.
    pub async fn write_through<F, Fut, E, I>(&self, write: F, key_of: I) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
        I: FnOnce(&V) -> K,
    {
        let value = write().await?;
        let key = key_of(&value);
        debug!("Caching written {} {:?}", self.cache.resource(), key);
        self.cache.put(key, value.clone());
        Ok(value)
    }

    /// Run `delete`, then drop `key` from the cache whether or not it was cached.
    ///
    /// If `delete` fails the cache entry is left as it was.
    pub async fn invalidate<F, Fut, T, E>(&self, key: &K, delete: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let outcome = delete().await?;
        if self.cache.remove_by_key(key).is_some() {
            debug!("Invalidated {} {:?}", self.cache.resource(), key);
        }
        Ok(outcome)
    }
}
