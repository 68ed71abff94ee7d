//! Registration and session routes.

use axum::extract::State;

use crate::error::AppError;
use crate::extract::Json;
use crate::middleware::{BearerToken, CurrentUser};
use crate::models::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::AppState;

#[axum::debug_handler]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AppError> {
    let response = state.auth.register(req).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let response = state.auth.login(req).await?;
    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    token: BearerToken,
) -> Result<Json<serde_json::Value>, AppError> {
    state.auth.logout(&token.0).await?;
    tracing::info!(user_id = %user.id, "session closed");
    Ok(Json(serde_json::json!({
        "message": "Session closed successfully"
    })))
}
