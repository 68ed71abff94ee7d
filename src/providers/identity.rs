//! Identity provider: credential validation and session issuance are
//! delegated entirely to the external auth service. Tokens stay opaque to
//! this crate.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;

/// Token pair plus the stable subject id, as returned by a password login.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user_id: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Validate an opaque bearer token, returning the stable subject id.
    async fn validate_token(&self, token: &str) -> Result<String, AppError>;
    /// Create a credential record, returning the new subject id.
    async fn sign_up(&self, email: &str, password: &str) -> Result<String, AppError>;
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError>;
    async fn sign_out(&self, token: &str) -> Result<(), AppError>;
}

#[derive(Debug, Deserialize)]
struct SubjectBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    access_token: String,
    refresh_token: String,
    user: SubjectBody,
}

/// GoTrue-style HTTP identity client.
pub struct HttpIdentity {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl HttpIdentity {
    pub fn new(http: reqwest::Client, base_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.base_url, path)
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentity {
    async fn validate_token(&self, token: &str) -> Result<String, AppError> {
        let resp = self
            .http
            .get(self.url("/user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AppError::Unauthenticated("invalid token".to_string()));
        }

        let subject: SubjectBody = resp.json().await.map_err(AppError::from)?;
        Ok(subject.id)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<String, AppError> {
        let resp = self
            .http
            .post(self.url("/signup"))
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let status = resp.status();
        if status.is_client_error() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "identity provider rejected sign up");
            return Err(AppError::Validation("unable to register user".to_string()));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Upstream(anyhow::anyhow!(
                "identity sign up failed with {status}: {body}"
            )));
        }

        let subject: SubjectBody = resp.json().await.map_err(AppError::from)?;
        Ok(subject.id)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let resp = self
            .http
            .post(self.url("/token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(AppError::Unauthenticated("invalid credentials".to_string()));
        }

        let body: TokenBody = resp.json().await.map_err(AppError::from)?;
        Ok(Session {
            access_token: body.access_token,
            refresh_token: body.refresh_token,
            user_id: body.user.id,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        let resp = self
            .http
            .post(self.url("/logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream(anyhow::anyhow!(
                "identity sign out failed with {status}"
            )));
        }
        Ok(())
    }
}
