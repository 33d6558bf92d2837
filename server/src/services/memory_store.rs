//! In-memory `AccountStore` for local runs without PostgreSQL and for tests.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{AccountStore, NewUser, ProfileChanges, StoreError, UserRecord};

struct Session {
    user_id: Uuid,
    expires_at: Instant,
}

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, UserRecord>,
    sessions: HashMap<String, Session>,
}

#[derive(Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Inner>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::EmailTaken);
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            phone: user.phone,
            address: user.address,
            answer_hash: user.answer_hash,
            role: user.role,
        };
        inner.users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<UserRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(hash) = changes.password_hash {
            user.password_hash = hash;
        }
        if let Some(phone) = changes.phone {
            user.phone = phone;
        }
        if let Some(address) = changes.address {
            user.address = address;
        }
        Ok(Some(user.clone()))
    }

    async fn create_session(&self, user_id: Uuid, token_hash: &str, ttl: Duration) -> Result<(), StoreError> {
        let now = Instant::now();
        let mut inner = self.inner.write().await;
        inner.sessions.retain(|_, s| s.expires_at > now);
        inner.sessions.insert(token_hash.to_owned(), Session { user_id, expires_at: now + ttl });
        Ok(())
    }

    async fn session_user(&self, token_hash: &str) -> Result<Option<UserRecord>, StoreError> {
        let inner = self.inner.read().await;
        let Some(session) = inner.sessions.get(token_hash) else {
            return Ok(None);
        };
        if session.expires_at <= Instant::now() {
            return Ok(None);
        }
        Ok(inner.users.get(&session.user_id).cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), StoreError> {
        self.inner.write().await.sessions.remove(token_hash);
        Ok(())
    }
}

#[cfg(test)]
#[path = "memory_store_test.rs"]
mod tests;
