//! Top navigation bar with session-aware links.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::state::auth::{auth_token, clear_auth, expect_auth};

#[component]
pub fn Header() -> impl IntoView {
    let auth = expect_auth();
    let signed_in = move || auth.with(guard::AuthState::is_authenticated);
    let is_admin = move || auth.with(|state| state.role().is_some_and(guard::Role::is_admin));
    let user_name = move || auth.with(|state| state.user.as_ref().map(|u| u.name.clone()).unwrap_or_default());

    let navigate = use_navigate();
    let on_logout = Callback::new(move |()| {
        let token = auth_token(auth);
        clear_auth(auth);
        navigate("/login", NavigateOptions::default());
        leptos::task::spawn_local(async move {
            crate::net::api::logout(token).await;
        });
    });

    view! {
        <header class="header">
            <A href="/">"Storefront"</A>
            <nav class="header__nav">
                <Show
                    when=signed_in
                    fallback=|| view! {
                        <A href="/register">"Register"</A>
                        <A href="/login">"Login"</A>
                    }
                >
                    <span class="header__user">{user_name}</span>
                    <Show
                        when=is_admin
                        fallback=|| view! { <A href="/dashboard/user">"Dashboard"</A> }
                    >
                        <A href="/dashboard/admin">"Dashboard"</A>
                    </Show>
                    <button class="header__logout" on:click=move |_| on_logout.run(())>"Logout"</button>
                </Show>
            </nav>
        </header>
    }
}
