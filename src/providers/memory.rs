//! In-memory fakes shaped like the real providers. Used by the integration
//! tests; the system of record in any deployed configuration is the
//! external provider, never process memory.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{Member, MemberChange, Notification, Principal, RoleChange};
use crate::providers::identity::{IdentityProvider, Session};
use crate::providers::store::Store;

#[derive(Default)]
pub struct MemoryIdentity {
    /// email -> (password, subject id)
    accounts: RwLock<HashMap<String, (String, String)>>,
    /// access token -> subject id
    sessions: RwLock<HashMap<String, String>>,
}

impl MemoryIdentity {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentity {
    async fn validate_token(&self, token: &str) -> Result<String, AppError> {
        self.sessions
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| AppError::Unauthenticated("invalid token".to_string()))
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<String, AppError> {
        let mut accounts = self.accounts.write().unwrap();
        if accounts.contains_key(email) {
            return Err(AppError::Validation("unable to register user".to_string()));
        }
        let user_id = Uuid::new_v4().to_string();
        accounts.insert(email.to_string(), (password.to_string(), user_id.clone()));
        Ok(user_id)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, AppError> {
        let user_id = {
            let accounts = self.accounts.read().unwrap();
            match accounts.get(email) {
                Some((stored, user_id)) if stored == password => user_id.clone(),
                _ => return Err(AppError::Unauthenticated("invalid credentials".to_string())),
            }
        };

        let access_token = Uuid::new_v4().to_string();
        let refresh_token = Uuid::new_v4().to_string();
        self.sessions
            .write()
            .unwrap()
            .insert(access_token.clone(), user_id.clone());

        Ok(Session {
            access_token,
            refresh_token,
            user_id,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), AppError> {
        self.sessions.write().unwrap().remove(token);
        Ok(())
    }
}

/// Rows are plain Vecs so tests can simulate provider oddities such as
/// duplicate profile rows for one subject id.
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<Principal>>,
    members: RwLock<Vec<Member>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn users_by_id(&self, id: &str) -> Result<Vec<Principal>, AppError> {
        Ok(self
            .users
            .read()
            .unwrap()
            .iter()
            .filter(|u| u.id == id)
            .cloned()
            .collect())
    }

    async fn insert_user(&self, user: &Principal) -> Result<Principal, AppError> {
        self.users.write().unwrap().push(user.clone());
        Ok(user.clone())
    }

    async fn list_users(&self) -> Result<Vec<Principal>, AppError> {
        Ok(self.users.read().unwrap().clone())
    }

    async fn update_user(
        &self,
        id: &str,
        change: &RoleChange,
    ) -> Result<Option<Principal>, AppError> {
        let mut users = self.users.write().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = change.role;
                user.is_superuser = change.is_superuser;
                if change.assigned_group.is_some() {
                    user.assigned_group = change.assigned_group;
                }
                Ok(Some(user.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        let mut members = self.members.read().unwrap().clone();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(members)
    }

    async fn member_by_id(&self, id: &str) -> Result<Option<Member>, AppError> {
        Ok(self
            .members
            .read()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn insert_member(&self, member: &Member) -> Result<Member, AppError> {
        self.members.write().unwrap().push(member.clone());
        Ok(member.clone())
    }

    async fn update_member(
        &self,
        id: &str,
        change: &MemberChange,
    ) -> Result<Option<Member>, AppError> {
        let mut members = self.members.write().unwrap();
        match members.iter_mut().find(|m| m.id == id) {
            Some(member) => {
                member.name = change.name.clone();
                member.phone_number = change.phone_number.clone();
                member.group = change.group;
                member.is_pioneer = change.is_pioneer;
                member.is_encouraged = change.is_encouraged;
                member.updated_at = change.updated_at;
                Ok(Some(member.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_member(&self, id: &str) -> Result<bool, AppError> {
        let mut members = self.members.write().unwrap();
        let before = members.len();
        members.retain(|m| m.id != id);
        Ok(members.len() < before)
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        let mut notifications = self.notifications.read().unwrap().clone();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }

    async fn insert_notification(&self, n: &Notification) -> Result<Notification, AppError> {
        self.notifications.write().unwrap().push(n.clone());
        Ok(n.clone())
    }

    async fn delete_notification(&self, id: &str) -> Result<bool, AppError> {
        let mut notifications = self.notifications.write().unwrap();
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        Ok(notifications.len() < before)
    }
}
