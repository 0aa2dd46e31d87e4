//! Resource service contract and its caching decorator

use async_trait::async_trait;
use std::fmt::Debug;
use std::hash::Hash;

use super::interceptor::CacheInterceptor;
use crate::cache::SharedCache;

/// An entity that exposes the identifier it is cached under
pub trait Identified {
    type Id;

    fn id(&self) -> Self::Id;
}

/// Read, write and delete operations of one resource.
///
/// Implementations own persistence and validation; they know nothing about
/// caching. Wrap one in [`CachedService`] to put a cache in front of it.
#[async_trait]
pub trait ResourceService: Send + Sync {
    type Id: Eq + Hash + Clone + Debug + Send + Sync + 'static;
    type Entity: Identified<Id = Self::Id> + Clone + Send + Sync + 'static;
    type Payload: Send + 'static;
    type Error: Send + 'static;

    /// Fetch an entity by identifier
    async fn find(&self, id: &Self::Id) -> Result<Self::Entity, Self::Error>;

    /// Create an entity from a payload
    async fn create(&self, payload: Self::Payload) -> Result<Self::Entity, Self::Error>;

    /// Replace the fields of an existing entity
    async fn update(
        &self,
        id: &Self::Id,
        payload: Self::Payload,
    ) -> Result<Self::Entity, Self::Error>;

    /// Delete an entity, returning it as confirmation
    async fn delete(&self, id: &Self::Id) -> Result<Self::Entity, Self::Error>;
}

/// Caching decorator over a [`ResourceService`].
///
/// `find` is read-through, `create` and `update` are write-through, and
/// `delete` invalidates the cached entry once the delete succeeds. Results
/// and errors of the wrapped service pass through unchanged.
pub struct CachedService<S: ResourceService> {
    inner: S,
    interceptor: CacheInterceptor<S::Id, S::Entity>,
}

impl<S: ResourceService> CachedService<S> {
    pub fn new(inner: S, cache: SharedCache<S::Id, S::Entity>) -> Self {
        Self {
            inner,
            interceptor: CacheInterceptor::new(cache),
        }
    }

    /// The undecorated service
    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn cache(&self) -> &SharedCache<S::Id, S::Entity> {
        self.interceptor.cache()
    }
}

#[async_trait]
impl<S: ResourceService> ResourceService for CachedService<S> {
    type Id = S::Id;
    type Entity = S::Entity;
    type Payload = S::Payload;
    type Error = S::Error;

    async fn find(&self, id: &Self::Id) -> Result<Self::Entity, Self::Error> {
        self.interceptor
            .read_through(id.clone(), || self.inner.find(id))
            .await
    }

    async fn create(&self, payload: Self::Payload) -> Result<Self::Entity, Self::Error> {
        self.interceptor
            .write_through(|| self.inner.create(payload), |entity| entity.id())
            .await
    }

    async fn update(
        &self,
        id: &Self::Id,
        payload: Self::Payload,
    ) -> Result<Self::Entity, Self::Error> {
        self.interceptor
            .write_through(|| self.inner.update(id, payload), |entity| entity.id())
            .await
    }

    async fn delete(&self, id: &Self::Id) -> Result<Self::Entity, Self::Error> {
        self.interceptor
            .invalidate(id, || self.inner.delete(id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LfuCache, ResourceKind};
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: u32,
        text: String,
    }

    impl Identified for Note {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[derive(Default)]
    struct NoteService {
        notes: Mutex<HashMap<u32, Note>>,
        next_id: AtomicUsize,
        finds: AtomicUsize,
    }

    #[async_trait]
    impl ResourceService for NoteService {
        type Id = u32;
        type Entity = Note;
        type Payload = String;
        type Error = String;

        async fn find(&self, id: &u32) -> Result<Note, String> {
            self.finds.fetch_add(1, Ordering::SeqCst);
            self.notes
                .lock()
                .get(id)
                .cloned()
                .ok_or_else(|| format!("note {} not found", id))
        }

        async fn create(&self, text: String) -> Result<Note, String> {
            if text.is_empty() {
                return Err("empty note".to_string());
            }
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as u32 + 1;
            let note = Note { id, text };
            self.notes.lock().insert(id, note.clone());
            Ok(note)
        }

        async fn update(&self, id: &u32, text: String) -> Result<Note, String> {
            let mut notes = self.notes.lock();
            let note = notes
                .get_mut(id)
                .ok_or_else(|| format!("note {} not found", id))?;
            note.text = text;
            Ok(note.clone())
        }

        async fn delete(&self, id: &u32) -> Result<Note, String> {
            self.notes
                .lock()
                .remove(id)
                .ok_or_else(|| format!("note {} not found", id))
        }
    }

    fn cached() -> CachedService<NoteService> {
        CachedService::new(
            NoteService::default(),
            SharedCache::new(ResourceKind::new("notes"), Box::new(LfuCache::new(8))),
        )
    }

    #[tokio::test]
    async fn test_create_populates_cache() {
        let service = cached();
        let note = service.create("hello".to_string()).await.unwrap();

        assert_eq!(service.cache().get(&note.id), Some(note.clone()));
        assert_eq!(service.find(&note.id).await.unwrap(), note);
        assert_eq!(service.inner().finds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_find_miss_hits_backend_once() {
        let service = cached();
        let note = service.inner().create("direct".to_string()).await.unwrap();

        service.find(&note.id).await.unwrap();
        service.find(&note.id).await.unwrap();
        assert_eq!(service.inner().finds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_find_not_found_propagates() {
        let service = cached();
        let err = service.find(&42).await.unwrap_err();

        assert_eq!(err, "note 42 not found");
        assert!(!service.cache().contains(&42));
    }

    #[tokio::test]
    async fn test_update_refreshes_cache() {
        let service = cached();
        let note = service.create("v1".to_string()).await.unwrap();
        service.update(&note.id, "v2".to_string()).await.unwrap();

        let found = service.find(&note.id).await.unwrap();
        assert_eq!(found.text, "v2");
        assert_eq!(service.inner().finds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_create_caches_nothing() {
        let service = cached();
        assert!(service.create(String::new()).await.is_err());
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_delete_invalidates_only_on_success() {
        let service = cached();
        let note = service.create("bye".to_string()).await.unwrap();

        let deleted = service.delete(&note.id).await.unwrap();
        assert_eq!(deleted, note);
        assert!(!service.cache().contains(&note.id));

        // Deleting again fails in the backend and is reported unchanged
        let err = service.delete(&note.id).await.unwrap_err();
        assert_eq!(err, format!("note {} not found", note.id));
    }

    #[tokio::test]
    async fn test_failed_delete_keeps_cached_entry() {
        let service = cached();
        // Cached but unknown to the backend
        let ghost = Note {
            id: 99,
            text: "ghost".to_string(),
        };
        service.cache().put(99, ghost.clone());

        assert!(service.delete(&99).await.is_err());
        assert_eq!(service.cache().get(&99), Some(ghost));
    }
}
