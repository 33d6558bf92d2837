//! Shared session model and route-guard logic for the storefront.
//!
//! This crate owns the pieces every other crate agrees on: the JSON wire
//! types exchanged with the auth server, the persisted [`AuthStore`], and the
//! two small state machines behind protected routes ([`RouteGuard`] and
//! [`Countdown`]). It has no UI or HTTP dependency so the same logic runs in
//! the browser client, the native CLI, and tests.

pub mod countdown;
pub mod route;
#[cfg(any(test, feature = "tokio"))]
pub mod runtime;
pub mod store;
pub mod types;
pub mod verify;

pub use countdown::{Countdown, Navigator, Redirect, Step};
pub use route::{DenyReason, GuardMachine, GuardPhase, RouteGuard};
pub use store::{AUTH_STORAGE_KEY, AuthStore, CART_STORAGE_KEY, MemoryStorage, Storage};
pub use types::{AuthState, Role, UserSummary};
pub use verify::{AccessLevel, Verifier, VerifyError};
