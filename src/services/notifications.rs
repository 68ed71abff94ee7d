//! Notification service and the best-effort emitter.

use std::sync::Arc;

use validator::Validate;

use crate::error::AppError;
use crate::models::{Notification, NotificationInput, Principal};
use crate::providers::Store;

/// Fire-and-forget audit emitter. A failed write is logged and swallowed;
/// it never fails the mutation that triggered it.
#[derive(Clone)]
pub struct Notifier {
    store: Arc<dyn Store>,
}

impl Notifier {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Record one event. The message must arrive fully rendered; nothing is
    /// interpolated here.
    pub async fn emit(&self, kind: &str, message: String) {
        let notification = Notification::new(kind, message);
        if let Err(err) = self.store.insert_notification(&notification).await {
            tracing::warn!(error = %err, kind, "failed to record notification");
        }
    }
}

#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn Store>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Notification>, AppError> {
        self.store.list_notifications().await
    }

    /// Superuser-authored broadcast. The only path where an end user writes
    /// a notification directly.
    pub async fn create(
        &self,
        actor: &Principal,
        input: NotificationInput,
    ) -> Result<Notification, AppError> {
        input.validate()?;
        let notification = Notification::new(input.kind, input.message);
        let notification = self.store.insert_notification(&notification).await?;
        tracing::info!(
            author = %actor.name,
            kind = %notification.kind,
            "broadcast notification published"
        );
        Ok(notification)
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        if !self.store.delete_notification(id).await? {
            return Err(AppError::NotFound("notification not found".to_string()));
        }
        Ok(())
    }
}
