//! Bearer authentication middleware: the principal resolver applied to
//! every protected route.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::models::Principal;
use crate::AppState;

/// Raw bearer token as received, kept for the logout delegation.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            AppError::Unauthenticated("missing or invalid Authorization header".to_string())
        })?
        .to_string();

    let principal = state.auth.resolve(&token).await?;

    // Handlers and gate extractors read these from request extensions.
    req.extensions_mut().insert(BearerToken(token));
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

pub(crate) fn principal_from_parts(parts: &Parts) -> Result<Principal, AppError> {
    parts.extensions.get::<Principal>().cloned().ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!(
            "principal missing from request extensions; route not behind auth middleware"
        ))
    })
}

/// Any authenticated principal, no capability required.
pub struct CurrentUser(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(principal_from_parts(parts)?))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<BearerToken>().cloned().ok_or_else(|| {
            AppError::Internal(anyhow::anyhow!(
                "bearer token missing from request extensions"
            ))
        })
    }
}
