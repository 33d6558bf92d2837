//! Persisted session store.
//!
//! ARCHITECTURE
//! ============
//! `AuthStore` is the single source of truth for `{ user, token }`. It keeps
//! an in-memory copy and mirrors every mutation into a key-value [`Storage`]
//! backend (browser `localStorage`, a JSON file, or memory in tests).
//!
//! Only whole-state replacement is exposed. Callers read, modify, and write
//! the complete structure, so a partial write can never be observed.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::types::AuthState;

/// Storage key holding the serialized [`AuthState`].
pub const AUTH_STORAGE_KEY: &str = "auth";
/// Storage key holding the shopping cart, cleared on logout.
pub const CART_STORAGE_KEY: &str = "cart";

/// Error raised by a storage backend that could not persist a value.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("failed to serialize auth state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Minimal string key-value store used to persist session data.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the backend cannot persist the value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns an error if the backend cannot remove the key.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-process storage. Used by tests and by server-side rendering, where
/// there is no browser storage to read.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw value, bypassing serialization.
    #[must_use]
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

/// Decode a persisted auth value, falling back to the signed-out default on
/// missing or malformed data.
#[must_use]
pub fn decode_auth_state(raw: Option<&str>) -> AuthState {
    raw.and_then(|raw| serde_json::from_str(raw).ok()).unwrap_or_default()
}

/// Session store backed by a [`Storage`] implementation.
#[derive(Debug)]
pub struct AuthStore<S> {
    storage: S,
    current: RefCell<AuthState>,
}

impl<S: Storage> AuthStore<S> {
    /// Restore the persisted session, or start signed out.
    pub fn open(storage: S) -> Self {
        let current = decode_auth_state(storage.get(AUTH_STORAGE_KEY).as_deref());
        Self { storage, current: RefCell::new(current) }
    }

    #[must_use]
    pub fn read(&self) -> AuthState {
        self.current.borrow().clone()
    }

    #[must_use]
    pub fn token(&self) -> String {
        self.current.borrow().token.clone()
    }

    /// Replace the whole session and persist it.
    ///
    /// The in-memory state is updated even if persisting fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend rejects the write.
    pub fn write(&self, next: AuthState) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&next)?;
        *self.current.borrow_mut() = next;
        self.storage.set(AUTH_STORAGE_KEY, &raw)
    }

    /// Reset to the signed-out default and drop the persisted auth and cart keys.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered; both keys are still attempted.
    pub fn logout(&self) -> Result<(), StoreError> {
        *self.current.borrow_mut() = AuthState::default();
        let auth = self.storage.remove(AUTH_STORAGE_KEY);
        let cart = self.storage.remove(CART_STORAGE_KEY);
        auth.and(cart)
    }

    /// `Authorization` header value for outbound requests, if signed in.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        let state = self.current.borrow();
        state.is_authenticated().then(|| state.token.clone())
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
