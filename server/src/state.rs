//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the account store behind a trait object so the same router runs on
//! PostgreSQL in production and in memory for local runs and tests.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::store::AccountStore;

/// Clone is required by Axum; all inner fields are Arc-wrapped.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, config: ServerConfig) -> Self {
        Self { accounts, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
pub mod test_helpers {
    use guard::types::{LoginRequest, RegisterRequest};

    use super::*;
    use crate::services::account;
    use crate::services::memory_store::MemoryAccountStore;

    pub const ADMIN_EMAIL: &str = "admin@example.com";

    /// `AppState` over an empty in-memory store, with `ADMIN_EMAIL` as admin.
    #[must_use]
    pub fn test_app_state() -> AppState {
        let config = ServerConfig { admin_email: Some(ADMIN_EMAIL.to_owned()), ..ServerConfig::default() };
        AppState::new(Arc::new(MemoryAccountStore::new()), config)
    }

    #[must_use]
    pub fn registration(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Test User".to_owned(),
            email: email.to_owned(),
            password: "secret1".to_owned(),
            phone: "555-0199".to_owned(),
            address: "9 Test Rd".to_owned(),
            answer: "blue".to_owned(),
        }
    }

    /// Register `email` and return a live session token for it.
    pub async fn seed_session(state: &AppState, email: &str) -> String {
        account::register(state.accounts.as_ref(), registration(email), state.config.admin_email.as_deref())
            .await
            .expect("seed registration");
        let login = LoginRequest { email: email.to_owned(), password: "secret1".to_owned() };
        let (_, token) = account::login(state.accounts.as_ref(), login, state.config.session_ttl)
            .await
            .expect("seed login");
        token
    }
}
