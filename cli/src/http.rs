//! HTTP client for the storefront auth API.

use guard::types::{AuthResponse, LoginRequest, MessageResponse, RegisterRequest};
use guard::verify::interpret_response;
use guard::{AccessLevel, AuthState, Verifier, VerifyError};
use reqwest::header::AUTHORIZATION;

use crate::CliError;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self { http: reqwest::Client::new(), base_url: base_url.trim_end_matches('/').to_owned() }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, CliError> {
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(CliError::Server { status, message: server_message(&body) });
        }
        Ok(body)
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse, CliError> {
        let body = self.send(self.http.post(self.url("/api/v1/auth/register")).json(req)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthState, CliError> {
        let body = self.send(self.http.post(self.url("/api/v1/auth/login")).json(req)).await?;
        let resp: AuthResponse = serde_json::from_str(&body)?;
        resp.into_auth_state().ok_or(CliError::MissingSession)
    }

    pub async fn logout(&self, token: &str) -> Result<(), CliError> {
        self.send(self.http.post(self.url("/api/v1/auth/logout")).header(AUTHORIZATION, token)).await?;
        Ok(())
    }
}

impl Verifier for ApiClient {
    async fn verify(&self, level: AccessLevel, token: &str) -> Result<bool, VerifyError> {
        let response = self
            .http
            .get(self.url(level.path()))
            .header(AUTHORIZATION, token)
            .send()
            .await
            .map_err(|e| VerifyError::Unreachable(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| VerifyError::Unreachable(e.to_string()))?;
        tracing::debug!(?level, status, "verification response");
        interpret_response(status, &body)
    }
}

/// `message` from an error body, or the raw body when it is not the usual
/// envelope.
fn server_message(body: &str) -> String {
    serde_json::from_str::<MessageResponse>(body)
        .map(|r| r.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
