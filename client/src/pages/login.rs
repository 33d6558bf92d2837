//! Login page. On success stores the session and returns the user to the
//! page a guard turned them away from.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use guard::types::LoginRequest;
use leptos::prelude::*;
use leptos_router::components::A;

#[cfg(feature = "hydrate")]
use crate::state::auth::{expect_auth, set_auth};

/// Post-login destination: the preserved location if it is a local path,
/// otherwise the home page.
#[cfg(any(test, feature = "hydrate"))]
fn bounce_target(from: Option<String>) -> String {
    from.filter(|path| path.starts_with('/') && !path.starts_with("//"))
        .unwrap_or_else(|| "/".to_owned())
}

fn validate_login_input(email: &str, password: &str) -> Result<LoginRequest, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    Ok(LoginRequest { email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let auth = expect_auth();
    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();
    #[cfg(feature = "hydrate")]
    let location = leptos_router::hooks::use_location();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let req = match validate_login_input(&email.get(), &password.get()) {
            Ok(req) => req,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            let from = location.state.get_untracked().to_js_value().as_string();
            leptos::task::spawn_local(async move {
                match crate::net::api::login(req).await {
                    Ok(state) => {
                        set_auth(auth, state);
                        navigate(&bounce_target(from), leptos_router::NavigateOptions::default());
                    }
                    Err(e) => {
                        info.set(e);
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = req;
    };

    view! {
        <div class="auth-page">
            <form class="auth-form" on:submit=on_submit>
                <h1>"Login"</h1>
                <input
                    class="auth-input"
                    type="email"
                    placeholder="Email"
                    prop:value=move || email.get()
                    on:input=move |ev| email.set(event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="password"
                    placeholder="Password"
                    prop:value=move || password.get()
                    on:input=move |ev| password.set(event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || busy.get()>"Login"</button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <A href="/forgot-password">"Forgot password?"</A>
                <A href="/register">"Create an account"</A>
            </form>
        </div>
    }
}
