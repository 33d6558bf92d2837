//! Session token generation.
//!
//! HTTP auth uses opaque bearer tokens with a server-side expiry. The store
//! only ever sees the SHA-256 digest of a token, never the token itself.
//! Logout deletes the session row.

use std::fmt::Write;

use rand::Rng;
use sha2::{Digest, Sha256};

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Key under which a session token is stored.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    bytes_to_hex(&hasher.finalize())
}

/// Extract the session token from an `Authorization` header value.
///
/// The storefront client sends the raw token; a `Bearer ` prefix is also
/// accepted. Blank values yield `None`.
#[must_use]
pub fn parse_authorization(value: &str) -> Option<&str> {
    let value = value.trim();
    let token = match value.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => value[7..].trim_start(),
        _ => value,
    };
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
