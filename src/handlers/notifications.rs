//! Notification routes: shared read access, superuser-only writes.

use axum::extract::{Path, State};

use crate::error::AppError;
use crate::extract::Json;
use crate::middleware::{NotificationViewer, Superuser};
use crate::models::{Notification, NotificationInput};
use crate::AppState;

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    NotificationViewer(_actor): NotificationViewer,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = state.notifications.list().await?;
    Ok(Json(notifications))
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    Superuser(actor): Superuser,
    Json(input): Json<NotificationInput>,
) -> Result<Json<Notification>, AppError> {
    let notification = state.notifications.create(&actor, input).await?;
    Ok(Json(notification))
}

#[axum::debug_handler]
pub async fn remove(
    State(state): State<AppState>,
    Superuser(_actor): Superuser,
    Path(notification_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.notifications.delete(&notification_id).await?;
    Ok(Json(serde_json::json!({
        "message": "Notification deleted"
    })))
}
