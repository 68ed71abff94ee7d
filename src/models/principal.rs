//! Principal model - resolved caller identity with role and superuser flag.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Closed set of congregation roles. Unknown values are rejected at the
/// write boundary, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Pending,
    Publisher,
    Servant,
    Elder,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Pending => "pending",
            Role::Publisher => "publisher",
            Role::Servant => "servant",
            Role::Elder => "elder",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Role::Pending),
            "publisher" => Ok(Role::Publisher),
            "servant" => Ok(Role::Servant),
            "elder" => Ok(Role::Elder),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profile row in the `users` table, resolved once per request.
///
/// `is_superuser` is deliberately independent of `role` so operational
/// accounts are not forced to hold the elder business role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_superuser: bool,
    pub assigned_group: Option<i32>,
}

impl Principal {
    /// Fresh profile as created at registration: pending role, no override.
    pub fn provisioned(id: String, email: String, name: String) -> Self {
        Self {
            id,
            email,
            name,
            role: Role::Pending,
            is_superuser: false,
            assigned_group: None,
        }
    }
}

/// Mutable subset of a profile row. The id, email and name of a principal
/// are never touched by the role-update path.
#[derive(Debug, Clone, Serialize)]
pub struct RoleChange {
    pub role: Role,
    pub is_superuser: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_group: Option<i32>,
}

/// Body of `PUT /admin/users/{id}/role`. The role arrives as a plain string
/// so an unknown value surfaces as a validation error, not a decode failure.
#[derive(Debug, Deserialize)]
pub struct RoleUpdateRequest {
    pub role: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub assigned_group: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: Principal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_its_string_form() {
        for role in [Role::Pending, Role::Publisher, Role::Servant, Role::Elder] {
            assert_eq!(Role::from_str(role.as_str()), Ok(role));
        }
    }

    #[test]
    fn unknown_role_strings_are_rejected() {
        assert!(Role::from_str("anciano").is_err());
        assert!(Role::from_str("admin").is_err());
        assert!(Role::from_str("").is_err());
        assert!(Role::from_str("Elder").is_err());
    }
}
