//! Notification model - append-only audit events for privileged mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Well-known event types emitted by the resource services. The column is
/// an open string so superuser broadcasts can carry their own types.
pub mod kinds {
    pub const MEMBER_ADDED: &str = "member_added";
    pub const MEMBER_EDITED: &str = "member_edited";
    pub const MEMBER_DELETED: &str = "member_deleted";
    pub const ROLE_CHANGED: &str = "role_changed";
}

/// Row in the `notifications` table. Never edited after insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Fully rendered at emission time, including actor and subject names.
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind: kind.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }
}

/// Body of a superuser-authored broadcast notification.
#[derive(Debug, Deserialize, Validate)]
pub struct NotificationInput {
    #[serde(rename = "type")]
    #[validate(length(min = 1, message = "type must not be empty"))]
    pub kind: String,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
}
