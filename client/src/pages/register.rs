//! Registration page. Sends the visitor to `/login` once the account exists.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use guard::types::{MIN_PASSWORD_LEN, RegisterRequest};
use leptos::prelude::*;
use leptos_router::components::A;

/// Trim every field and check the form is complete, first problem wins.
fn validate_registration_input(form: &RegisterRequest) -> Result<RegisterRequest, &'static str> {
    let req = RegisterRequest {
        name: form.name.trim().to_owned(),
        email: form.email.trim().to_owned(),
        password: form.password.clone(),
        phone: form.phone.trim().to_owned(),
        address: form.address.trim().to_owned(),
        answer: form.answer.trim().to_owned(),
    };
    if req.name.is_empty() {
        return Err("Name is required");
    }
    if req.email.is_empty() {
        return Err("Email is required");
    }
    if req.password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 6 characters long");
    }
    if req.phone.is_empty() {
        return Err("Phone number is required");
    }
    if req.address.is_empty() {
        return Err("Address is required");
    }
    if req.answer.is_empty() {
        return Err("Answer is required");
    }
    Ok(req)
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let form = RwSignal::new(RegisterRequest::default());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let req = match form.with(validate_registration_input) {
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
                match crate::net::api::register(req).await {
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
                <h1>"Register"</h1>
                <input
                    class="auth-input"
                    placeholder="Name"
                    prop:value=move || form.with(|f| f.name.clone())
                    on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="email"
                    placeholder="Email"
                    prop:value=move || form.with(|f| f.email.clone())
                    on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    type="password"
                    placeholder="Password"
                    prop:value=move || form.with(|f| f.password.clone())
                    on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    placeholder="Phone"
                    prop:value=move || form.with(|f| f.phone.clone())
                    on:input=move |ev| form.update(|f| f.phone = event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    placeholder="Address"
                    prop:value=move || form.with(|f| f.address.clone())
                    on:input=move |ev| form.update(|f| f.address = event_target_value(&ev))
                />
                <input
                    class="auth-input"
                    placeholder="What is your favorite sport?"
                    prop:value=move || form.with(|f| f.answer.clone())
                    on:input=move |ev| form.update(|f| f.answer = event_target_value(&ev))
                />
                <button class="auth-button" type="submit" disabled=move || busy.get()>"Register"</button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <A href="/login">"Already registered? Login"</A>
            </form>
        </div>
    }
}
