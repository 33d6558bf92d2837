use leptos::prelude::*;
use leptos_router::components::A;

use crate::state::auth::expect_auth;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_auth();
    let greeting = move || {
        auth.with(|state| match &state.user {
            Some(user) => format!("Welcome back, {}", user.name),
            None => "Welcome".to_owned(),
        })
    };

    view! {
        <section class="home">
            <h1>{greeting}</h1>
            <A href="/dashboard/user">"Go to your dashboard"</A>
        </section>
    }
}
