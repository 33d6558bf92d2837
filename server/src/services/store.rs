//! Account persistence boundary.
//!
//! ARCHITECTURE
//! ============
//! Route handlers and account services talk to an `AccountStore` trait object
//! held in `AppState`. Production uses `PgAccountStore`; local runs without
//! `DATABASE_URL` and the test suite use `MemoryAccountStore`. Both enforce
//! the same contract: unique emails, expiring sessions, and whole-row reads.

use std::time::Duration;

use async_trait::async_trait;
use guard::{Role, UserSummary};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("email already registered")]
    EmailTaken,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Stored account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub answer_hash: String,
    pub role: Role,
}

impl UserRecord {
    #[must_use]
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            address: self.address.clone(),
            role: self.role,
        }
    }
}

/// Validated registration, with secrets already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub answer_hash: String,
    pub role: Role,
}

/// Profile fields to overwrite. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a user. Fails with `EmailTaken` if the email exists.
    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Apply profile changes, returning the updated row if the user exists.
    async fn update_profile(&self, id: Uuid, changes: ProfileChanges) -> Result<Option<UserRecord>, StoreError>;

    /// Store a session keyed by `token_hash`, valid for `ttl`. Sessions that
    /// have already expired are purged first.
    async fn create_session(&self, user_id: Uuid, token_hash: &str, ttl: Duration) -> Result<(), StoreError>;

    /// Resolve an unexpired session token to its user.
    async fn session_user(&self, token_hash: &str) -> Result<Option<UserRecord>, StoreError>;

    async fn delete_session(&self, token_hash: &str) -> Result<(), StoreError>;
}
