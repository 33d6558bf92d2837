//! # client
//!
//! Leptos + WASM storefront. Server-rendered by the `server` crate and
//! hydrated in the browser.
//!
//! Protected pages sit behind [`components::private_route::PrivateRoute`] and
//! [`components::private_route::AdminRoute`], which confirm the stored token
//! with the server on every change before rendering anything nested.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;

/// WASM entry point: install logging and hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
