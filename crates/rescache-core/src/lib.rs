//! Rescache Core Engine
//!
//! This crate provides the in-memory cache engine for Rescache,
//! including the LRU and LFU eviction policies, the cache factory,
//! and the interception layer that puts a cache in front of a resource service.

pub mod cache;
pub mod ds;
pub mod error;
pub mod intercept;

pub use cache::{
    Algorithm, CacheFactory, CacheSettings, CacheStats, EvictionPolicyCache, LfuCache, LruCache,
    ResourceKind, SharedCache,
};
pub use error::CoreError;
pub use intercept::{CacheInterceptor, CachedService, Identified, ResourceService};
