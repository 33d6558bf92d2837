use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <section class="not-found">
            <h1>"404"</h1>
            <p>"Oops! Page not found."</p>
            <A href="/">"Go back"</A>
        </section>
    }
}
