//! Redirect countdown shown in place of protected content.
//!
//! Mounting starts a one-second ticker that counts down from three and then
//! navigates to `/{path}`, passing the current location as router state so
//! the login page can send the user back. The ticker is aborted when the
//! component unmounts, so no navigation can fire afterwards.

#[cfg(test)]
#[path = "spinner_test.rs"]
mod spinner_test;

use guard::countdown::{Countdown, DEFAULT_REDIRECT_TARGET};
use leptos::prelude::*;
use leptos_router::hooks::use_location;

fn countdown_label(remaining: u32) -> String {
    let unit = if remaining == 1 { "second" } else { "seconds" };
    format!("Redirecting you in {remaining} {unit}")
}

#[component]
pub fn Spinner(#[prop(default = DEFAULT_REDIRECT_TARGET)] path: &'static str) -> impl IntoView {
    let location = use_location();
    let countdown = Countdown::new(path, location.pathname.get_untracked());
    let remaining = RwSignal::new(countdown.remaining());

    #[cfg(feature = "hydrate")]
    {
        use futures::future::{AbortHandle, Abortable};

        let navigator = router::RouterNavigator::new(leptos_router::hooks::use_navigate());
        let (abort, registration) = AbortHandle::new_pair();
        leptos::task::spawn_local(async move {
            let _ = Abortable::new(router::run(countdown, remaining, navigator), registration).await;
        });
        on_cleanup(move || abort.abort());
    }
    #[cfg(not(feature = "hydrate"))]
    let _ = countdown;

    view! {
        <div class="spinner">
            <h2 class="spinner__label">{move || countdown_label(remaining.get())}</h2>
            <div class="spinner__indicator" role="status">
                <span class="visually-hidden">"Loading..."</span>
            </div>
        </div>
    }
}

#[cfg(feature = "hydrate")]
mod router {
    use futures::StreamExt;
    use gloo_timers::future::IntervalStream;
    use guard::countdown::{Countdown, Navigator, Step, TICK_MS};
    use leptos::prelude::*;
    use leptos_router::NavigateOptions;
    use leptos_router::location::State;
    use wasm_bindgen::JsValue;

    /// Router navigation carrying the denied path as history state.
    pub struct RouterNavigator<F> {
        navigate: F,
    }

    impl<F> RouterNavigator<F> {
        pub fn new(navigate: F) -> Self {
            Self { navigate }
        }
    }

    impl<F: Fn(&str, NavigateOptions)> Navigator for RouterNavigator<F> {
        fn navigate(&self, path: &str, from: &str) {
            let options = NavigateOptions { state: State::new(Some(JsValue::from_str(from))), ..NavigateOptions::default() };
            (self.navigate)(path, options);
        }
    }

    pub async fn run<N: Navigator>(mut countdown: Countdown, remaining: RwSignal<u32>, navigator: N) {
        let mut ticks = IntervalStream::new(TICK_MS);
        while ticks.next().await.is_some() {
            match countdown.tick() {
                Some(Step::Tick(n)) => remaining.set(n),
                Some(Step::Redirect(redirect)) => {
                    remaining.set(0);
                    log::info!("redirecting {} -> {}", redirect.from, redirect.path);
                    navigator.navigate(&redirect.path, &redirect.from);
                    return;
                }
                None => return,
            }
        }
    }
}
