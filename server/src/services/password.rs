//! Password and recovery-answer hashing with bcrypt.
//!
//! Handlers use the async helpers, which run bcrypt on the blocking pool.

#[cfg(not(test))]
const COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const COST: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Hash `secret` with a fresh salt.
///
/// # Errors
///
/// Returns an error if bcrypt rejects the input.
pub fn hash_secret(secret: &str) -> Result<String, PasswordError> {
    Ok(bcrypt::hash(secret, COST)?)
}

/// Check `secret` against a value produced by [`hash_secret`].
///
/// # Errors
///
/// Returns an error if `stored` is not a bcrypt hash.
pub fn verify_secret(secret: &str, stored: &str) -> Result<bool, PasswordError> {
    Ok(bcrypt::verify(secret, stored)?)
}

/// [`hash_secret`] on the blocking pool.
///
/// # Errors
///
/// See [`hash_secret`].
pub async fn hash(secret: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_secret(&secret)).await?
}

/// [`verify_secret`] on the blocking pool.
///
/// # Errors
///
/// See [`verify_secret`].
pub async fn verify(secret: String, stored: String) -> Result<bool, PasswordError> {
    tokio::task::spawn_blocking(move || verify_secret(&secret, &stored)).await?
}

/// Recovery answers are matched case- and whitespace-insensitively.
#[must_use]
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
