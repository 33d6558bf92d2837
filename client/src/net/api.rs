//! REST API helpers for communicating with the auth server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`, with the session
//! token sent as the `Authorization` header whenever one is passed in.
//! Server-side (SSR): stubs returning errors since these endpoints are only
//! meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs with a display message instead of panics so
//! a failed request shows inline on the form that issued it.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use guard::types::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, ProfileUpdateRequest, RegisterRequest,
};
use guard::{AccessLevel, AuthState, UserSummary, Verifier, VerifyError};

#[cfg(any(test, feature = "hydrate"))]
const REGISTER_ENDPOINT: &str = "/api/v1/auth/register";
#[cfg(any(test, feature = "hydrate"))]
const LOGIN_ENDPOINT: &str = "/api/v1/auth/login";
#[cfg(any(test, feature = "hydrate"))]
const FORGOT_PASSWORD_ENDPOINT: &str = "/api/v1/auth/forgot-password";
#[cfg(any(test, feature = "hydrate"))]
const PROFILE_ENDPOINT: &str = "/api/v1/auth/profile";
#[cfg(any(test, feature = "hydrate"))]
const LOGOUT_ENDPOINT: &str = "/api/v1/auth/logout";

/// Message to show for a failed request: the server's `message` if the body
/// carries one, otherwise the bare status.
#[cfg(any(test, feature = "hydrate"))]
fn failure_message(status: u16, body: &str) -> String {
    serde_json::from_str::<MessageResponse>(body)
        .ok()
        .map(|r| r.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("request failed: {status}"))
}

#[cfg(any(test, feature = "hydrate"))]
fn login_state(resp: AuthResponse) -> Result<AuthState, String> {
    let message = resp.message.clone();
    resp.into_auth_state()
        .ok_or_else(|| if message.is_empty() { "login failed".to_owned() } else { message })
}

#[cfg(feature = "hydrate")]
async fn send_json<B, T>(method: gloo_net::http::Method, url: &str, token: Option<&str>, body: &B) -> Result<T, String>
where
    B: serde::Serialize,
    T: serde::de::DeserializeOwned,
{
    let mut builder = gloo_net::http::RequestBuilder::new(url).method(method);
    if let Some(token) = token {
        builder = builder.header("Authorization", token);
    }
    let resp = builder
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    let status = resp.status();
    let text = resp.text().await.map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(failure_message(status, &text));
    }
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// Ask the server whether `token` is valid for `level`.
///
/// # Errors
///
/// Any transport, status, or body failure. Callers treat every error as
/// "not authorized".
pub async fn verify(level: AccessLevel, token: &str) -> Result<bool, VerifyError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get(level.path())
            .header("Authorization", token)
            .send()
            .await
            .map_err(|e| VerifyError::Unreachable(e.to_string()))?;
        let status = resp.status();
        let body = resp.text().await.map_err(|e| VerifyError::Unreachable(e.to_string()))?;
        guard::verify::interpret_response(status, &body)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (level, token);
        Err(VerifyError::Unreachable("not available on server".to_owned()))
    }
}

/// [`Verifier`] backed by the browser's `fetch`.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpVerifier;

impl Verifier for HttpVerifier {
    async fn verify(&self, level: AccessLevel, token: &str) -> Result<bool, VerifyError> {
        verify(level, token).await
    }
}

/// `POST /api/v1/auth/login`, returning the session to store.
///
/// # Errors
///
/// Returns the server's message on failure.
pub async fn login(req: LoginRequest) -> Result<AuthState, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp: AuthResponse = send_json(gloo_net::http::Method::POST, LOGIN_ENDPOINT, None, &req).await?;
        login_state(resp)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = req;
        Err("not available on server".to_owned())
    }
}

/// `POST /api/v1/auth/register`, returning the server's confirmation.
///
/// # Errors
///
/// Returns the server's message on failure.
pub async fn register(req: RegisterRequest) -> Result<String, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp: AuthResponse = send_json(gloo_net::http::Method::POST, REGISTER_ENDPOINT, None, &req).await?;
        Ok(resp.message)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = req;
        Err("not available on server".to_owned())
    }
}

/// `POST /api/v1/auth/forgot-password`.
///
/// # Errors
///
/// Returns the server's message on failure.
pub async fn forgot_password(req: ForgotPasswordRequest) -> Result<String, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp: MessageResponse =
            send_json(gloo_net::http::Method::POST, FORGOT_PASSWORD_ENDPOINT, None, &req).await?;
        Ok(resp.message)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = req;
        Err("not available on server".to_owned())
    }
}

/// `PUT /api/v1/auth/profile`, returning the updated user.
///
/// # Errors
///
/// Returns the server's message on failure.
pub async fn update_profile(token: Option<String>, req: ProfileUpdateRequest) -> Result<UserSummary, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp: AuthResponse =
            send_json(gloo_net::http::Method::PUT, PROFILE_ENDPOINT, token.as_deref(), &req).await?;
        resp.user.ok_or_else(|| "profile update returned no user".to_owned())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (token, req);
        Err("not available on server".to_owned())
    }
}

/// `POST /api/v1/auth/logout`. Best effort: the local session is cleared
/// whatever the server says.
pub async fn logout(token: Option<String>) {
    #[cfg(feature = "hydrate")]
    {
        let mut builder = gloo_net::http::Request::post(LOGOUT_ENDPOINT);
        if let Some(token) = token.as_deref() {
            builder = builder.header("Authorization", token);
        }
        let _ = builder.send().await;
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = token;
    }
}
