//! Server-side token verification contract.
//!
//! A [`Verifier`] asks the auth server whether a bearer token is still valid
//! for a given [`AccessLevel`]. Implementations live next to their HTTP stack
//! (`gloo-net` in the browser, `reqwest` in the CLI); this module only fixes
//! the endpoints and how a response is interpreted.
//!
//! Verification fails closed: every error collapses to "not authorized".

use std::future::Future;

use serde_json::Value;

/// Path of the endpoint that accepts any valid session.
pub const USER_AUTH_PATH: &str = "/api/v1/auth/user-auth";
/// Path of the endpoint that additionally requires the admin role.
pub const ADMIN_AUTH_PATH: &str = "/api/v1/auth/admin-auth";

/// Privilege a protected route requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessLevel {
    User,
    Admin,
}

impl AccessLevel {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::User => USER_AUTH_PATH,
            Self::Admin => ADMIN_AUTH_PATH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("verification endpoint unreachable: {0}")]
    Unreachable(String),
    #[error("verification rejected with status {0}")]
    Status(u16),
    #[error("malformed verification response: {0}")]
    Malformed(String),
}

/// Issues one verification call per invocation. No retry, no caching.
pub trait Verifier {
    /// Resolve `Ok(true)` iff the server confirms `token` for `level`.
    fn verify(&self, level: AccessLevel, token: &str) -> impl Future<Output = Result<bool, VerifyError>>;
}

impl<V: Verifier + ?Sized> Verifier for &V {
    fn verify(&self, level: AccessLevel, token: &str) -> impl Future<Output = Result<bool, VerifyError>> {
        (**self).verify(level, token)
    }
}

/// Interpret a raw HTTP response from a verification endpoint.
///
/// # Errors
///
/// `Status` for non-2xx responses and `Malformed` when the body is not a JSON
/// object. A body without `ok` is a valid "no".
pub fn interpret_response(status: u16, body: &str) -> Result<bool, VerifyError> {
    if !(200..300).contains(&status) {
        return Err(VerifyError::Status(status));
    }
    let value: Value = serde_json::from_str(body).map_err(|e| VerifyError::Malformed(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(VerifyError::Malformed("expected a JSON object".to_owned()));
    };
    Ok(map.get("ok").is_some_and(is_truthy))
}

/// JavaScript truthiness, since the endpoint contract is "`ok` is truthy".
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Verify a standard session, treating any failure as `false`.
pub async fn verify_user<V: Verifier>(verifier: &V, token: &str) -> bool {
    verifier.verify(AccessLevel::User, token).await.unwrap_or(false)
}

/// Verify an administrator session, treating any failure as `false`.
pub async fn verify_admin<V: Verifier>(verifier: &V, token: &str) -> bool {
    verifier.verify(AccessLevel::Admin, token).await.unwrap_or(false)
}

#[cfg(test)]
#[path = "verify_test.rs"]
mod tests;
