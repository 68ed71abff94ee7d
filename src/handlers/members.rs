//! Roster routes. Reads are shared across elder and servant; mutations
//! require the elder role. Superusers pass every gate.

use axum::extract::{Path, State};

use crate::error::AppError;
use crate::extract::Json;
use crate::middleware::{RosterEditor, RosterViewer};
use crate::models::{Member, MemberInput};
use crate::AppState;

#[axum::debug_handler]
pub async fn list(
    State(state): State<AppState>,
    RosterViewer(_actor): RosterViewer,
) -> Result<Json<Vec<Member>>, AppError> {
    let members = state.members.list().await?;
    Ok(Json(members))
}

#[axum::debug_handler]
pub async fn create(
    State(state): State<AppState>,
    RosterEditor(actor): RosterEditor,
    Json(input): Json<MemberInput>,
) -> Result<Json<Member>, AppError> {
    let member = state.members.create(&actor, input).await?;
    Ok(Json(member))
}

#[axum::debug_handler]
pub async fn update(
    State(state): State<AppState>,
    RosterEditor(actor): RosterEditor,
    Path(member_id): Path<String>,
    Json(input): Json<MemberInput>,
) -> Result<Json<Member>, AppError> {
    let member = state.members.update(&actor, &member_id, input).await?;
    Ok(Json(member))
}

#[axum::debug_handler]
pub async fn remove(
    State(state): State<AppState>,
    RosterEditor(actor): RosterEditor,
    Path(member_id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.members.delete(&actor, &member_id).await?;
    Ok(Json(serde_json::json!({
        "message": "Member deleted successfully"
    })))
}
