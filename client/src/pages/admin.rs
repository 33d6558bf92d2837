//! Admin dashboard, behind `AdminRoute`.

use leptos::prelude::*;

use crate::state::auth::expect_auth;

#[component]
pub fn AdminDashboard() -> impl IntoView {
    let auth = expect_auth();
    let name = move || auth.with(|state| state.user.as_ref().map(|u| u.name.clone()).unwrap_or_default());
    let email = move || auth.with(|state| state.user.as_ref().map(|u| u.email.clone()).unwrap_or_default());

    view! {
        <section class="dashboard dashboard--admin">
            <h1>"Admin panel"</h1>
            <p>"Signed in as " {name} " (" {email} ")"</p>
        </section>
    }
}
