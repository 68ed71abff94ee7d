//! Roster CRUD. Every successful mutation emits an audit notification.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{kinds, Member, MemberChange, MemberInput, Principal};
use crate::providers::Store;
use crate::services::Notifier;

#[derive(Clone)]
pub struct MemberService {
    store: Arc<dyn Store>,
    notifier: Notifier,
}

impl MemberService {
    pub fn new(store: Arc<dyn Store>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    pub async fn list(&self) -> Result<Vec<Member>, AppError> {
        self.store.list_members().await
    }

    pub async fn create(
        &self,
        actor: &Principal,
        input: MemberInput,
    ) -> Result<Member, AppError> {
        input.validate()?;

        let now = Utc::now();
        let member = Member {
            id: Uuid::new_v4().to_string(),
            name: input.name,
            phone_number: input.phone_number,
            group: input.group,
            is_pioneer: input.is_pioneer,
            is_encouraged: input.is_encouraged,
            created_by: actor.id.clone(),
            created_at: now,
            updated_at: now,
        };
        let member = self.store.insert_member(&member).await?;

        self.notifier
            .emit(
                kinds::MEMBER_ADDED,
                format!("{} added member '{}'", actor.name, member.name),
            )
            .await;

        Ok(member)
    }

    pub async fn update(
        &self,
        actor: &Principal,
        id: &str,
        input: MemberInput,
    ) -> Result<Member, AppError> {
        input.validate()?;

        // Existence first so an absent target reads as NotFound rather than
        // a silent no-op update.
        if self.store.member_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("member not found".to_string()));
        }

        let change = MemberChange::from_input(input);
        let member = self
            .store
            .update_member(id, &change)
            .await?
            .ok_or_else(|| AppError::NotFound("member not found".to_string()))?;

        self.notifier
            .emit(
                kinds::MEMBER_EDITED,
                format!("{} edited member '{}'", actor.name, member.name),
            )
            .await;

        Ok(member)
    }

    pub async fn delete(&self, actor: &Principal, id: &str) -> Result<(), AppError> {
        // The name has to be captured before the row disappears.
        let existing = self
            .store
            .member_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("member not found".to_string()))?;

        if !self.store.delete_member(id).await? {
            return Err(AppError::NotFound("member not found".to_string()));
        }

        self.notifier
            .emit(
                kinds::MEMBER_DELETED,
                format!("{} deleted member '{}'", actor.name, existing.name),
            )
            .await;

        Ok(())
    }
}
