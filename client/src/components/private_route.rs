//! Route guards for `/dashboard/user` and `/dashboard/admin`.
//!
//! Each guard re-verifies the session with the server whenever the stored
//! token changes and renders the nested `<Outlet/>` only once the server has
//! confirmed it. Until then, and on any denial, it shows the redirect
//! [`Spinner`]; a pending check looks the same as a refusal.

#[cfg(test)]
#[path = "private_route_test.rs"]
mod private_route_test;

use std::rc::Rc;

use guard::countdown::DEFAULT_REDIRECT_TARGET;
use guard::{AccessLevel, GuardPhase, RouteGuard};
use leptos::prelude::*;
use leptos_router::components::Outlet;

use crate::components::spinner::Spinner;
use crate::net::api::HttpVerifier;
use crate::state::auth::expect_auth;

/// Where a denied visitor is sent. Admin pages bounce to the home page.
fn redirect_target(level: AccessLevel) -> &'static str {
    match level {
        AccessLevel::User => DEFAULT_REDIRECT_TARGET,
        AccessLevel::Admin => "",
    }
}

#[component]
pub fn PrivateRoute() -> impl IntoView {
    guarded(AccessLevel::User)
}

#[component]
pub fn AdminRoute() -> impl IntoView {
    guarded(AccessLevel::Admin)
}

/// Whether the guard has to verify again. Writes that keep the token, such
/// as a profile update, leave the current verdict in place.
fn token_changed(last: Option<&str>, current: &str) -> bool {
    last != Some(current)
}

fn guarded(level: AccessLevel) -> impl IntoView {
    let auth = expect_auth();
    let phase = RwSignal::new(GuardPhase::Unverified);
    let guard = Rc::new(RouteGuard::new(level, HttpVerifier));
    let token = Memo::new(move |_| auth.with(|state| state.token.clone()));

    Effect::new(move |last: Option<String>| {
        let current = token.get();
        if token_changed(last.as_deref(), &current) {
            phase.set(GuardPhase::Unverified);
            let guard = Rc::clone(&guard);
            let pending = current.clone();
            leptos::task::spawn_local(async move {
                let next = guard.evaluate(&pending).await;
                phase.try_set(next);
            });
        }
        current
    });

    let target = redirect_target(level);
    view! {
        <Show
            when=move || phase.get().renders_children()
            fallback=move || view! { <Spinner path=target/> }
        >
            <Outlet/>
        </Show>
    }
}
