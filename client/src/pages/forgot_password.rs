//! Password reset by recovery answer.

#[cfg(test)]
#[path = "forgot_password_test.rs"]
mod forgot_password_test;

use guard::types::{ForgotPasswordRequest, MIN_PASSWORD_LEN};
use leptos::prelude::*;
use leptos_router::components::A;

fn validate_reset_input(form: &ForgotPasswordRequest) -> Result<ForgotPasswordRequest, &'static str> {
    let req = ForgotPasswordRequest {
        email: form.email.trim().to_owned(),
        answer: form.answer.trim().to_owned(),
        new_password: form.new_password.clone(),
    };
    if req.email.is_empty() {
        return Err("Email is required");
    }
    if req.answer.is_empty() {
        return Err("Answer is required");
    }
    if req.new_password.chars().count() < MIN_PASSWORD_LEN {
        return Err("New password must be at least 6 characters long");
    }
    Ok(req)
}

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let form = RwSignal::new(ForgotPasswordRequest::default());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let req = match form.with(validate_reset_input) {
            Ok(req) => req,
            Err(message) => {
                info.set(message.to_owned());
                return;
            }
        };
        busy.set(true);

        #[cfg(feature = "hydrate")]
        {
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::forgot_password(req).await {
                    Ok(_) => navigate("/login", leptos_router::NavigateOptions::default()),
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
                <h1>"Reset password"</h1>
                <input
                    class="auth-input"
                    type="email"
                    placeholder="Email"
                    prop:value=move || form.with(|f| f.email.clone())
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    placeholder="What is your favorite sport?"
                    prop:value=move || form.with(|f| f.answer.clone())
                    on:input=move |ev| form.update(|f| f.answer = event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="password"
                    placeholder="New password"
                    prop:value=move || form.with(|f| f.new_password.clone())
                    on:input=move |ev| form.update(|f| f.new_password = event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || busy.get()>"Reset"</button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <A href="/login">"Back to login"</A>
            </form>
        </div>
    }
}
