//! User operations

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use rescache_core::ResourceService;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use crate::error::StoreError;
use crate::models::{NewUser, User};

/// In-memory user service
#[derive(Debug, Default)]
pub struct UserService {
    users: RwLock<HashMap<u64, User>>,
    next_id: AtomicU64,
    backend_calls: AtomicU64,
}

impl UserService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations that reached this service
    pub fn backend_calls(&self) -> u64 {
        self.backend_calls.load(Ordering::Relaxed)
    }

    pub fn count(&self) -> usize {
        self.users.read().len()
    }

    fn record_call(&self) {
        self.backend_calls.fetch_add(1, Ordering::Relaxed);
    }

    fn validate(user: &NewUser) -> Result<(), StoreError> {
        if user.username.trim().is_empty() {
            return Err(StoreError::Validation("username must not be empty".to_string()));
        }
        if !user.email.contains('@') {
            return Err(StoreError::Validation(format!(
                "invalid email address: {}",
                user.email
            )));
        }
        Ok(())
    }

    fn ensure_unique_username(
        users: &HashMap<u64, User>,
        username: &str,
        except: Option<u64>,
    ) -> Result<(), StoreError> {
        let taken = users
            .values()
            .any(|u| u.username == username && Some(u.id) != except);
        if taken {
            return Err(StoreError::Duplicate(format!(
                "User '{}' already exists",
                username
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceService for UserService {
    type Id = u64;
    type Entity = User;
    type Payload = NewUser;
    type Error = StoreError;

    async fn find(&self, id: &u64) -> Result<User, StoreError> {
        self.record_call();
        self.users
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))
    }

    async fn create(&self, payload: NewUser) -> Result<User, StoreError> {
        self.record_call();
        Self::validate(&payload)?;

        let mut users = self.users.write();
        Self::ensure_unique_username(&users, &payload.username, None)?;

        let now = Utc::now();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let user = User {
            id,
            username: payload.username,
            email: payload.email,
            created_at: now,
            updated_at: now,
        };
        users.insert(id, user.clone());

        debug!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    async fn update(&self, id: &u64, payload: NewUser) -> Result<User, StoreError> {
        self.record_call();
        Self::validate(&payload)?;

        let mut users = self.users.write();
        Self::ensure_unique_username(&users, &payload.username, Some(*id))?;

        let user = users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;
        user.username = payload.username;
        user.email = payload.email;
        user.updated_at = Utc::now();

        debug!("Updated user {}", id);
        Ok(user.clone())
    }

    async fn delete(&self, id: &u64) -> Result<User, StoreError> {
        self.record_call();
        let removed = self
            .users
            .write()
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", id)))?;

        debug!("Deleted user {}", id);
        Ok(removed)
    }
}
