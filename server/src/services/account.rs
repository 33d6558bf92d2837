//! Account flows: registration, login, password recovery, profile updates.
//!
//! VALIDATION
//! ==========
//! Each required field is checked in a fixed order and the first failure
//! ends the request, so a client always gets the message for the first
//! missing field and no later step runs on invalid input.

use std::time::Duration;

use guard::types::{ForgotPasswordRequest, LoginRequest, MIN_PASSWORD_LEN, ProfileUpdateRequest, RegisterRequest};
use guard::{Role, UserSummary};

use super::password::{self, PasswordError, normalize_answer};
use super::session::{generate_token, hash_token};
use super::store::{AccountStore, NewUser, ProfileChanges, StoreError, UserRecord};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Invalid(&'static str),
    #[error("Email is already registered, please login")]
    EmailTaken,
    #[error("Email is not registered")]
    UnknownEmail,
    #[error("Invalid password")]
    WrongPassword,
    #[error("Wrong email or answer")]
    RecoveryMismatch,
    #[error("User not found")]
    UserNotFound,
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl From<StoreError> for AccountError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::EmailTaken => Self::EmailTaken,
            other => Self::Store(other),
        }
    }
}

/// Trimmed, lower-cased email, or `None` if it is not a plausible address.
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

fn require(value: &str, message: &'static str) -> Result<(), AccountError> {
    if value.trim().is_empty() {
        return Err(AccountError::Invalid(message));
    }
    Ok(())
}

fn require_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::Invalid("Password is required and must be at least 6 characters long"));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<String, AccountError> {
    require(email, "Email is required")?;
    normalize_email(email).ok_or(AccountError::Invalid("Email is invalid"))
}

/// Validate a registration body, returning the normalized email.
///
/// # Errors
///
/// `Invalid` naming the first missing or malformed field.
pub fn validate_registration(req: &RegisterRequest) -> Result<String, AccountError> {
    require(&req.name, "Name is required")?;
    let email = require_email(&req.email)?;
    require(&req.password, "Password is required")?;
    require_password(&req.password)?;
    require(&req.phone, "Phone number is required")?;
    require(&req.address, "Address is required")?;
    require(&req.answer, "Answer is required")?;
    Ok(email)
}

/// # Errors
///
/// `Invalid` if the email or password is missing.
pub fn validate_login(req: &LoginRequest) -> Result<String, AccountError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AccountError::Invalid("Invalid email or password"));
    }
    normalize_email(&req.email).ok_or(AccountError::Invalid("Invalid email or password"))
}

/// # Errors
///
/// `Invalid` naming the first missing field among email, answer, new password.
pub fn validate_forgot_password(req: &ForgotPasswordRequest) -> Result<String, AccountError> {
    let email = require_email(&req.email)?;
    require(&req.answer, "Answer is required")?;
    require(&req.new_password, "New password is required")?;
    require_password(&req.new_password)?;
    Ok(email)
}

/// Create an account. The configured admin email is registered as admin.
///
/// # Errors
///
/// `Invalid` on validation failure, `EmailTaken` on a duplicate email.
pub async fn register(
    store: &dyn AccountStore,
    req: RegisterRequest,
    admin_email: Option<&str>,
) -> Result<UserSummary, AccountError> {
    let email = validate_registration(&req)?;
    let role = if admin_email == Some(email.as_str()) { Role::Admin } else { Role::User };
    let password_hash = password::hash(req.password).await?;
    let answer_hash = password::hash(normalize_answer(&req.answer)).await?;

    let record = store
        .insert_user(NewUser {
            name: req.name.trim().to_owned(),
            email,
            password_hash,
            phone: req.phone.trim().to_owned(),
            address: req.address.trim().to_owned(),
            answer_hash,
            role,
        })
        .await?;

    tracing::info!(user_id = %record.id, role = ?record.role, "account registered");
    Ok(record.summary())
}

/// Check credentials and open a session, returning the user and token.
///
/// # Errors
///
/// `Invalid`, `UnknownEmail`, or `WrongPassword`.
pub async fn login(
    store: &dyn AccountStore,
    req: LoginRequest,
    ttl: Duration,
) -> Result<(UserSummary, String), AccountError> {
    let email = validate_login(&req)?;
    let user = store.find_by_email(&email).await?.ok_or(AccountError::UnknownEmail)?;
    if !password::verify(req.password, user.password_hash.clone()).await? {
        return Err(AccountError::WrongPassword);
    }

    let token = generate_token();
    store.create_session(user.id, &hash_token(&token), ttl).await?;
    tracing::info!(user_id = %user.id, "session opened");
    Ok((user.summary(), token))
}

/// Reset a password after checking the recovery answer.
///
/// # Errors
///
/// `Invalid` on validation failure, `RecoveryMismatch` if the email or answer
/// does not match an account.
pub async fn forgot_password(store: &dyn AccountStore, req: ForgotPasswordRequest) -> Result<(), AccountError> {
    let email = validate_forgot_password(&req)?;
    let user = store.find_by_email(&email).await?.ok_or(AccountError::RecoveryMismatch)?;
    if !password::verify(normalize_answer(&req.answer), user.answer_hash.clone()).await? {
        return Err(AccountError::RecoveryMismatch);
    }

    let password_hash = password::hash(req.new_password).await?;
    let changes = ProfileChanges { password_hash: Some(password_hash), ..ProfileChanges::default() };
    store.update_profile(user.id, changes).await?.ok_or(AccountError::UserNotFound)?;
    tracing::info!(user_id = %user.id, "password reset");
    Ok(())
}

fn provided(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty())
}

/// Update the signed-in user's profile. Empty fields keep their value.
///
/// # Errors
///
/// `Invalid` if a new password is too short, `UserNotFound` if the account
/// vanished after the session was resolved.
pub async fn update_profile(
    store: &dyn AccountStore,
    user: &UserRecord,
    req: ProfileUpdateRequest,
) -> Result<UserSummary, AccountError> {
    let password_hash = match req.password.filter(|p| !p.is_empty()) {
        Some(password) => {
            require_password(&password)?;
            Some(password::hash(password).await?)
        }
        None => None,
    };

    let changes = ProfileChanges {
        name: provided(req.name),
        password_hash,
        phone: provided(req.phone),
        address: provided(req.address),
    };
    let updated = store.update_profile(user.id, changes).await?.ok_or(AccountError::UserNotFound)?;
    Ok(updated.summary())
}

/// Resolve a bearer token to its account, if the session is live.
///
/// # Errors
///
/// Store failures only; an unknown token is `Ok(None)`.
pub async fn authenticate(store: &dyn AccountStore, token: &str) -> Result<Option<UserRecord>, AccountError> {
    Ok(store.session_user(&hash_token(token)).await?)
}

/// # Errors
///
/// Store failures only.
pub async fn logout(store: &dyn AccountStore, token: &str) -> Result<(), AccountError> {
    store.delete_session(&hash_token(token)).await?;
    Ok(())
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
