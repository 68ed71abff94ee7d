//! Superuser administration routes.

use axum::extract::{Path, State};

use crate::error::AppError;
use crate::extract::Json;
use crate::middleware::Superuser;
use crate::models::{Principal, RoleUpdateRequest};
use crate::AppState;

#[axum::debug_handler]
pub async fn list_users(
    State(state): State<AppState>,
    Superuser(_actor): Superuser,
) -> Result<Json<Vec<Principal>>, AppError> {
    let users = state.admin.list_users().await?;
    Ok(Json(users))
}

#[axum::debug_handler]
pub async fn update_role(
    State(state): State<AppState>,
    Superuser(actor): Superuser,
    Path(user_id): Path<String>,
    Json(req): Json<RoleUpdateRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let user = state.admin.update_role(&actor, &user_id, req).await?;
    Ok(Json(serde_json::json!({
        "message": "Role updated successfully",
        "user": user,
    })))
}
