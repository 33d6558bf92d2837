//! User dashboard and profile editor, both behind `PrivateRoute`.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use guard::types::{MIN_PASSWORD_LEN, ProfileUpdateRequest};
use guard::{AuthState, UserSummary};
use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::{AuthContext, expect_auth};

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Build the update body. Blank fields are left out so they keep their value.
fn build_profile_update(
    name: &str,
    password: &str,
    phone: &str,
    address: &str,
) -> Result<ProfileUpdateRequest, &'static str> {
    let password = (!password.is_empty()).then(|| password.to_owned());
    if password.as_ref().is_some_and(|p| p.chars().count() < MIN_PASSWORD_LEN) {
        return Err("Password must be at least 6 characters long");
    }
    Ok(ProfileUpdateRequest { name: optional(name), password, phone: optional(phone), address: optional(address) })
}

/// Session after a profile change: same token, new user.
fn with_updated_user(current: &AuthState, user: UserSummary) -> AuthState {
    AuthState { user: Some(user), token: current.token.clone() }
}

fn user_field(auth: AuthContext, field: fn(&UserSummary) -> &str) -> impl Fn() -> String + Copy {
    move || auth.with(|state| state.user.as_ref().map(|u| field(u).to_owned()).unwrap_or_default())
}

#[component]
pub fn UserDashboard() -> impl IntoView {
    let auth = expect_auth();

    view! {
        <section class="dashboard">
            <h1>"Your account"</h1>
            <dl class="dashboard__details">
                <dt>"Name"</dt>
                <dd>{user_field(auth, |u| &u.name)}</dd>
                <dt>"Email"</dt>
                <dd>{user_field(auth, |u| &u.email)}</dd>
                <dt>"Phone"</dt>
                <dd>{user_field(auth, |u| &u.phone)}</dd>
                <dt>"Address"</dt>
                <dd>{user_field(auth, |u| &u.address)}</dd>
            </dl>
            <A href="/dashboard/user/profile">"Edit profile"</A>
        </section>
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_auth();
    let current = auth.get_untracked().user.unwrap_or_default();
    let name = RwSignal::new(current.name);
    let password = RwSignal::new(String::new());
    let phone = RwSignal::new(current.phone);
    let address = RwSignal::new(current.address);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let req = match build_profile_update(&name.get(), &password.get(), &phone.get(), &address.get()) {
            Ok(req) => req,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);

        let token = crate::state::auth::auth_token(auth);
        leptos::task::spawn_local(async move {
            match crate::net::api::update_profile(token, req).await {
                Ok(user) => {
                    let next = auth.with_untracked(|state| with_updated_user(state, user));
                    crate::state::auth::set_auth(auth, next);
                    password.set(String::new());
                    info.set("Profile updated".to_owned());
                }
                Err(e) => info.set(e),
            }
            busy.set(false);
        });
    };

    view! {
        <section class="dashboard">
            <form class="auth-form" on:submit=on_submit>
                <h1>"Profile"</h1>
                <input
                    class="auth-input"
                    placeholder="Name"
                    prop:value=move || name.get()
                    on:input=move |ev| name.set(event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="password"
                    placeholder="New password (optional)"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    placeholder="Phone"
                    prop:value=move || phone.get()
                    on:input=move |ev| phone.set(event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    placeholder="Address"
                    prop:value=move || address.get()
                    on:input=move |ev| address.set(event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || busy.get()>"Update"</button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
            </form>
        </section>
    }
}
