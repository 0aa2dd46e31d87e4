//! Interception layer placing a cache in front of a resource service
//!
//! The interceptor never changes what the wrapped operation returns. It only
//! short-circuits reads that hit the cache and keeps the cache in step with
//! writes and deletes. A failed operation leaves the cache untouched.

mod interceptor;
mod service;

pub use interceptor::CacheInterceptor;
pub use service::{CachedService, Identified, ResourceService};
