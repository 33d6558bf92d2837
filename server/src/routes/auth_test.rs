use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::*;
use crate::routes::api_routes;
use crate::services::store::StoreError;
use crate::state::test_helpers::{ADMIN_EMAIL, seed_session, test_app_state};

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.expect("router is infallible");
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json body") };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn authed_get(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, authorization)
        .body(Body::empty())
        .expect("request")
}

fn registration_body(email: &str) -> Value {
    json!({
        "name": "Ada",
        "email": email,
        "password": "secret1",
        "phone": "555-0100",
        "address": "1 Main St",
        "answer": "Blue",
    })
}

// =============================================================================
// account_error_status
// =============================================================================

#[test]
fn status_mapping_follows_error_kind() {
    assert_eq!(account_error_status(&AccountError::Invalid("Name is required")), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_status(&AccountError::EmailTaken), StatusCode::CONFLICT);
    assert_eq!(account_error_status(&AccountError::UnknownEmail), StatusCode::NOT_FOUND);
    assert_eq!(account_error_status(&AccountError::WrongPassword), StatusCode::UNAUTHORIZED);
    assert_eq!(account_error_status(&AccountError::RecoveryMismatch), StatusCode::NOT_FOUND);
    assert_eq!(
        account_error_status(&AccountError::Store(StoreError::Db(sqlx::Error::PoolTimedOut))),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    let bad_hash = crate::services::password::verify_secret("x", "not-a-hash").unwrap_err();
    assert_eq!(account_error_status(&AccountError::Password(bad_hash)), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn internal_errors_hide_details() {
    let resp = ApiError::Account(AccountError::Store(StoreError::Db(sqlx::Error::PoolTimedOut))).into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.expect("body");
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Internal server error");
}

#[tokio::test]
async fn malformed_json_uses_message_envelope() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .header("content-type", "application/json")
        .body(Body::from("{\"email\": "))
        .expect("request");
    let (status, body) = send(api_routes(test_app_state()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

#[tokio::test]
async fn mistyped_field_uses_message_envelope() {
    let (status, body) =
        send(api_routes(test_app_state()), json_request(Method::POST, "/api/v1/auth/register", &json!({"name": 5})))
            .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn missing_content_type_uses_message_envelope() {
    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/login")
        .body(Body::from(json!({"email": "a@b.c", "password": "x"}).to_string()))
        .expect("request");
    let (status, body) = send(api_routes(test_app_state()), req).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["success"], false);
}

// =============================================================================
// register / login
// =============================================================================

#[tokio::test]
async fn register_returns_created_user() {
    let app = api_routes(test_app_state());
    let (status, body) =
        send(app, json_request(Method::POST, "/api/v1/auth/register", &registration_body("ada@example.com"))).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], 0);
    assert!(body.get("token").is_none());
}

#[tokio::test]
async fn register_reports_first_missing_field() {
    let app = api_routes(test_app_state());
    let mut req = registration_body("ada@example.com");
    req["name"] = json!("");
    req["phone"] = json!("");

    let (status, body) = send(app, json_request(Method::POST, "/api/v1/auth/register", &req)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Name is required");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let state = test_app_state();
    let body = registration_body("ada@example.com");
    send(api_routes(state.clone()), json_request(Method::POST, "/api/v1/auth/register", &body)).await;

    let (status, _) = send(api_routes(state), json_request(Method::POST, "/api/v1/auth/register", &body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn admin_email_registers_as_admin() {
    let app = api_routes(test_app_state());
    let (_, body) =
        send(app, json_request(Method::POST, "/api/v1/auth/register", &registration_body(ADMIN_EMAIL))).await;
    assert_eq!(body["user"]["role"], 1);
}

#[tokio::test]
async fn login_returns_token_and_user() {
    let state = test_app_state();
    send(
        api_routes(state.clone()),
        json_request(Method::POST, "/api/v1/auth/register", &registration_body("ada@example.com")),
    )
    .await;

    let login = json!({ "email": "ADA@example.com", "password": "secret1" });
    let (status, body) = send(api_routes(state), json_request(Method::POST, "/api/v1/auth/login", &login)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ada");
    assert_eq!(body["token"].as_str().map(str::len), Some(64));
}

#[tokio::test]
async fn login_failures_map_to_statuses() {
    let state = test_app_state();
    seed_session(&state, "ada@example.com").await;

    let cases = [
        (json!({ "email": "", "password": "x" }), StatusCode::BAD_REQUEST),
        (json!({ "email": "nobody@example.com", "password": "secret1" }), StatusCode::NOT_FOUND),
        (json!({ "email": "ada@example.com", "password": "wrong-pass" }), StatusCode::UNAUTHORIZED),
    ];
    for (body, expected) in cases {
        let (status, _) = send(api_routes(state.clone()), json_request(Method::POST, "/api/v1/auth/login", &body)).await;
        assert_eq!(status, expected, "login body {body}");
    }
}

// =============================================================================
// user-auth / admin-auth
// =============================================================================

#[tokio::test]
async fn user_auth_accepts_raw_and_bearer_tokens() {
    let state = test_app_state();
    let token = seed_session(&state, "ada@example.com").await;

    for header in [token.clone(), format!("Bearer {token}")] {
        let (status, body) = send(api_routes(state.clone()), authed_get(USER_AUTH, &header)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "ok": true }));
    }
}

#[tokio::test]
async fn user_auth_rejects_missing_or_unknown_token() {
    let state = test_app_state();
    let missing = Request::builder().uri(USER_AUTH).body(Body::empty()).expect("request");
    let (status, _) = send(api_routes(state.clone()), missing).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(api_routes(state), authed_get(USER_AUTH, "not-a-session")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn admin_auth_requires_admin_role() {
    let state = test_app_state();
    let user_token = seed_session(&state, "ada@example.com").await;
    let admin_token = seed_session(&state, ADMIN_EMAIL).await;

    let (status, _) = send(api_routes(state.clone()), authed_get(ADMIN_AUTH, &user_token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(api_routes(state), authed_get(ADMIN_AUTH, &admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));
}

// =============================================================================
// forgot-password / profile / logout
// =============================================================================

#[tokio::test]
async fn forgot_password_resets_with_correct_answer() {
    let state = test_app_state();
    seed_session(&state, "ada@example.com").await;

    let wrong = json!({ "email": "ada@example.com", "answer": "green", "newPassword": "another1" });
    let (status, _) =
        send(api_routes(state.clone()), json_request(Method::POST, "/api/v1/auth/forgot-password", &wrong)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let right = json!({ "email": "ada@example.com", "answer": " BLUE ", "newPassword": "another1" });
    let (status, body) =
        send(api_routes(state.clone()), json_request(Method::POST, "/api/v1/auth/forgot-password", &right)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let login = json!({ "email": "ada@example.com", "password": "another1" });
    let (status, _) = send(api_routes(state), json_request(Method::POST, "/api/v1/auth/login", &login)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn profile_update_changes_only_provided_fields() {
    let state = test_app_state();
    let token = seed_session(&state, "ada@example.com").await;

    let req = Request::builder()
        .method(Method::PUT)
        .uri("/api/v1/auth/profile")
        .header("content-type", "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(json!({ "name": "Ada L.", "phone": "" }).to_string()))
        .expect("request");
    let (status, body) = send(api_routes(state), req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ada L.");
    assert_eq!(body["user"]["phone"], "555-0199");
}

#[tokio::test]
async fn profile_update_requires_session() {
    let app = api_routes(test_app_state());
    let (status, _) = send(app, json_request(Method::PUT, "/api/v1/auth/profile", &json!({ "name": "x" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let state = test_app_state();
    let token = seed_session(&state, "ada@example.com").await;

    let req = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/logout")
        .header(AUTHORIZATION, token.as_str())
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(api_routes(state.clone()), req).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(api_routes(state), authed_get(USER_AUTH, &token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn healthz_is_ok() {
    let req = Request::builder().uri("/healthz").body(Body::empty()).expect("request");
    let (status, _) = send(api_routes(test_app_state()), req).await;
    assert_eq!(status, StatusCode::OK);
}

const USER_AUTH: &str = guard::verify::USER_AUTH_PATH;
const ADMIN_AUTH: &str = guard::verify::ADMIN_AUTH_PATH;
