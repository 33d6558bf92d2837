//! Auth routes: registration, login, password recovery, profile, and the
//! `user-auth` / `admin-auth` verification endpoints route guards poll.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRef, FromRequest, FromRequestParts, Request, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Json, Response};
use guard::types::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, ProfileUpdateRequest, RegisterRequest,
    VerifyResponse,
};

use crate::services::account::{self, AccountError};
use crate::services::session::parse_authorization;
use crate::services::store::UserRecord;
use crate::state::AppState;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Unauthorized access")]
    Unauthorized,
    #[error(transparent)]
    Account(#[from] AccountError),
    #[error("{}", .0.body_text())]
    Body(#[from] JsonRejection),
}

pub(crate) fn account_error_status(err: &AccountError) -> StatusCode {
    match err {
        AccountError::Invalid(_) => StatusCode::BAD_REQUEST,
        AccountError::EmailTaken => StatusCode::CONFLICT,
        AccountError::UnknownEmail | AccountError::RecoveryMismatch | AccountError::UserNotFound => {
            StatusCode::NOT_FOUND
        }
        AccountError::WrongPassword => StatusCode::UNAUTHORIZED,
        AccountError::Store(_) | AccountError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Account(err) => account_error_status(err),
            Self::Body(rejection) => rejection.status(),
        };
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "auth request failed");
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };
        (status, Json(MessageResponse::failure(message))).into_response()
    }
}

// =============================================================================
// EXTRACTORS
// =============================================================================

/// `Json` whose rejections use the `MessageResponse` envelope.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

// =============================================================================
// AUTH EXTRACTORS
// =============================================================================

/// Signed-in user resolved from the `Authorization` header.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: UserRecord,
    pub token: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_authorization)
            .ok_or(ApiError::Unauthorized)?
            .to_owned();

        let app_state = AppState::from_ref(state);
        let user = account::authenticate(app_state.accounts.as_ref(), &token)
            .await?
            .ok_or(ApiError::Unauthorized)?;

        Ok(Self { user, token })
    }
}

/// Signed-in user whose current role is administrator.
pub struct AdminUser(pub AuthUser);

impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth = AuthUser::from_request_parts(parts, state).await?;
        if !auth.user.role.is_admin() {
            tracing::warn!(user_id = %auth.user.id, "admin access denied");
            return Err(ApiError::Unauthorized);
        }
        Ok(Self(auth))
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/v1/auth/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let user = account::register(state.accounts.as_ref(), req, state.config.admin_email.as_deref()).await?;
    let body = AuthResponse {
        success: true,
        message: "User registered successfully".to_owned(),
        user: Some(user),
        token: None,
    };
    Ok((StatusCode::CREATED, Json(body)))
}

/// `POST /api/v1/auth/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (user, token) = account::login(state.accounts.as_ref(), req, state.config.session_ttl).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_owned(),
        user: Some(user),
        token: Some(token),
    }))
}

/// `POST /api/v1/auth/forgot-password`
pub async fn forgot_password(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    account::forgot_password(state.accounts.as_ref(), req).await?;
    Ok(Json(MessageResponse::ok("Password reset successfully")))
}

/// `GET /api/v1/auth/user-auth`
pub async fn user_auth(_auth: AuthUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { ok: true })
}

/// `GET /api/v1/auth/admin-auth`
pub async fn admin_auth(_admin: AdminUser) -> Json<VerifyResponse> {
    Json(VerifyResponse { ok: true })
}

/// `PUT /api/v1/auth/profile`
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<ProfileUpdateRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = account::update_profile(state.accounts.as_ref(), &auth.user, req).await?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Profile updated successfully".to_owned(),
        user: Some(user),
        token: None,
    }))
}

/// `POST /api/v1/auth/logout`: revoke the presented session token.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Result<StatusCode, ApiError> {
    account::logout(state.accounts.as_ref(), &auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
