//! Registration, login and the per-request principal resolver.

use std::sync::Arc;

use validator::Validate;

use crate::error::AppError;
use crate::models::{LoginRequest, LoginResponse, Principal, RegisterRequest, RegisterResponse};
use crate::providers::{IdentityProvider, Store};

#[derive(Clone)]
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    store: Arc<dyn Store>,
}

impl AuthService {
    pub fn new(identity: Arc<dyn IdentityProvider>, store: Arc<dyn Store>) -> Self {
        Self { identity, store }
    }

    /// Turn an opaque bearer token into a resolved principal. Runs once per
    /// inbound call; no cross-request caching.
    pub async fn resolve(&self, token: &str) -> Result<Principal, AppError> {
        let subject_id = self.identity.validate_token(token).await?;
        self.profile_for_subject(&subject_id).await
    }

    async fn profile_for_subject(&self, subject_id: &str) -> Result<Principal, AppError> {
        let mut rows = self.store.users_by_id(subject_id).await?;

        if rows.is_empty() {
            return Err(AppError::Unauthenticated(
                "user profile not provisioned".to_string(),
            ));
        }
        if rows.len() > 1 {
            // Storage should hold exactly one profile per subject. Fall back
            // to a stable pick rather than failing the request.
            tracing::warn!(
                subject_id,
                count = rows.len(),
                "multiple profile rows for one subject, picking first by id"
            );
            rows.sort_by(|a, b| a.id.cmp(&b.id));
        }
        Ok(rows.remove(0))
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AppError> {
        req.validate()?;

        let subject_id = self.identity.sign_up(&req.email, &req.password).await?;

        let profile = Principal::provisioned(subject_id, req.email, req.name);
        let profile = self.store.insert_user(&profile).await?;

        tracing::info!(user_id = %profile.id, "user registered, awaiting role assignment");
        Ok(RegisterResponse {
            message: "User registered successfully. Awaiting role assignment by a superuser."
                .to_string(),
            user_id: profile.id,
        })
    }

    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        req.validate()?;

        let session = self
            .identity
            .sign_in_with_password(&req.email, &req.password)
            .await?;
        let user = self.profile_for_subject(&session.user_id).await?;

        Ok(LoginResponse {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            user,
        })
    }

    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.identity.sign_out(token).await
    }
}
