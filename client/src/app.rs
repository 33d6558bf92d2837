//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{ParentRoute, Route, Router, Routes},
};

use crate::components::header::Header;
use crate::components::private_route::{AdminRoute, PrivateRoute};
use crate::pages::{
    admin::AdminDashboard,
    dashboard::{ProfilePage, UserDashboard},
    forgot_password::ForgotPasswordPage,
    home::HomePage,
    login::LoginPage,
    not_found::NotFoundPage,
    register::RegisterPage,
};
use crate::state::auth::provide_auth;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Provides the auth context and sets up client-side routing. Everything
/// under `/dashboard/user` requires a confirmed session and everything under
/// `/dashboard/admin` additionally requires the admin role.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_auth();

    view! {
        <Stylesheet id="leptos" href="/pkg/storefront.css"/>
        <Title text="Storefront"/>

        <Router>
            <Header/>
            <main>
                <Routes fallback=|| view! { <NotFoundPage/> }>
                    <Route path=StaticSegment("") view=HomePage/>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route path=StaticSegment("register") view=RegisterPage/>
                    <Route path=StaticSegment("forgot-password") view=ForgotPasswordPage/>
                    <ParentRoute path=(StaticSegment("dashboard"), StaticSegment("user")) view=PrivateRoute>
                        <Route path=StaticSegment("") view=UserDashboard/>
                        <Route path=StaticSegment("profile") view=ProfilePage/>
                    </ParentRoute>
                    <ParentRoute path=(StaticSegment("dashboard"), StaticSegment("admin")) view=AdminRoute>
                        <Route path=StaticSegment("") view=AdminDashboard/>
                    </ParentRoute>
                </Routes>
            </main>
        </Router>
    }
}
