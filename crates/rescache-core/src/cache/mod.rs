//! Cache engine module

mod factory;
mod lfu;
mod lru;
mod policy;
mod shared;

pub use factory::{CacheFactory, CacheSettings, ResourceKind};
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use policy::{Algorithm, EvictionPolicyCache};
pub use shared::{CacheStats, SharedCache};
