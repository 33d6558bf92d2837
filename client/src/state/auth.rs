//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! `provide_auth` puts one `RwSignal<AuthState>` into context at the root.
//! Route guards and user-aware components read it; the login, logout, and
//! profile flows replace it through `set_auth` / `clear_auth`, which mirror
//! every change into `localStorage` under the `auth` key.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use guard::store::StoreError;
use guard::{AuthState, AuthStore, Storage};
use leptos::prelude::*;

/// Reactive session shared through context.
pub type AuthContext = RwSignal<AuthState>;

/// `window.localStorage` in the browser. On the server there is nothing to
/// read, so every lookup misses and writes are dropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .ok_or_else(|| StoreError::Unavailable("no window".to_owned()))?
        .local_storage()
        .map_err(|e| StoreError::Unavailable(format!("{e:?}")))?
        .ok_or_else(|| StoreError::Unavailable("localStorage disabled".to_owned()))
}

impl Storage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage().ok()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .set_item(key, value)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?
                .remove_item(key)
                .map_err(|e| StoreError::Unavailable(format!("{e:?}")))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

fn browser_store() -> AuthStore<BrowserStorage> {
    AuthStore::open(BrowserStorage)
}

/// Provide the auth context, restoring the persisted session once the app
/// has hydrated.
///
/// The first render always starts signed out so the server and browser
/// markup agree; guards treat that like any other token change.
pub fn provide_auth() -> AuthContext {
    let auth = RwSignal::new(AuthState::default());
    provide_context(auth);
    Effect::new(move |_| {
        let restored = browser_store().read();
        if restored.is_authenticated() {
            auth.set(restored);
        }
    });
    auth
}

pub fn expect_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Current bearer token, or `None` when signed out. Does not track.
pub fn auth_token(auth: AuthContext) -> Option<String> {
    auth.with_untracked(|state| state.is_authenticated().then(|| state.token.clone()))
}

/// Replace the whole session and persist it.
pub fn set_auth(auth: AuthContext, next: AuthState) {
    if let Err(e) = browser_store().write(next.clone()) {
        warn(&format!("failed to persist session: {e}"));
    }
    auth.set(next);
}

/// Sign out: reset to the default state and drop the stored auth and cart.
pub fn clear_auth(auth: AuthContext) {
    if let Err(e) = browser_store().logout() {
        warn(&format!("failed to clear session: {e}"));
    }
    auth.set(AuthState::default());
}

fn warn(message: &str) {
    #[cfg(feature = "hydrate")]
    log::warn!("{message}");
    #[cfg(not(feature = "hydrate"))]
    let _ = message;
}
