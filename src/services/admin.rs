//! Superuser-only principal administration.

use std::str::FromStr;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{kinds, Principal, Role, RoleChange, RoleUpdateRequest};
use crate::providers::Store;
use crate::services::Notifier;

#[derive(Clone)]
pub struct AdminService {
    store: Arc<dyn Store>,
    notifier: Notifier,
}

impl AdminService {
    pub fn new(store: Arc<dyn Store>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    pub async fn list_users(&self) -> Result<Vec<Principal>, AppError> {
        self.store.list_users().await
    }

    /// The only write path that can change another principal's role,
    /// superuser flag or assigned group. The submitted role is validated
    /// against the closed enum before anything is persisted.
    pub async fn update_role(
        &self,
        actor: &Principal,
        user_id: &str,
        req: RoleUpdateRequest,
    ) -> Result<Principal, AppError> {
        let role = Role::from_str(&req.role).map_err(AppError::Validation)?;

        let change = RoleChange {
            role,
            is_superuser: req.is_superuser,
            assigned_group: req.assigned_group,
        };
        let updated = self
            .store
            .update_user(user_id, &change)
            .await?
            .ok_or_else(|| AppError::NotFound("user not found".to_string()))?;

        self.notifier
            .emit(
                kinds::ROLE_CHANGED,
                format!(
                    "{} changed the role of '{}' to '{}'",
                    actor.name, updated.name, role
                ),
            )
            .await;

        Ok(updated)
    }
}
