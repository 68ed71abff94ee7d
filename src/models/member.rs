//! Member model - a roster entry, distinct from a login account.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Roster row in the `members` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    /// Stored as text so arbitrary-length numerals survive untouched.
    pub phone_number: String,
    pub group: i32,
    pub is_pioneer: bool,
    pub is_encouraged: bool,
    /// Stamped once at creation from the acting principal, never changed.
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied member fields for create and edit. Identity and
/// provenance fields are stamped server-side.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct MemberInput {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(length(min = 1, message = "phone_number must not be empty"))]
    pub phone_number: String,
    #[validate(range(min = 1, message = "group must be a positive number"))]
    pub group: i32,
    pub is_pioneer: bool,
    pub is_encouraged: bool,
}

/// Update payload sent to storage. Excludes `created_by` and `created_at`
/// so edits can never rewrite provenance.
#[derive(Debug, Clone, Serialize)]
pub struct MemberChange {
    pub name: String,
    pub phone_number: String,
    pub group: i32,
    pub is_pioneer: bool,
    pub is_encouraged: bool,
    pub updated_at: DateTime<Utc>,
}

impl MemberChange {
    pub fn from_input(input: MemberInput) -> Self {
        Self {
            name: input.name,
            phone_number: input.phone_number,
            group: input.group,
            is_pioneer: input.is_pioneer,
            is_encouraged: input.is_encouraged,
            updated_at: Utc::now(),
        }
    }
}
