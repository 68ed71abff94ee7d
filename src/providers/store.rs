//! Row storage provider: the external system of record.
//!
//! The trait mirrors the provider's row-oriented shape (equality filters,
//! newest-first ordering on named tables). Services receive it as an
//! injected `Arc<dyn Store>` so tests can substitute the in-memory fake.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Member, MemberChange, Notification, Principal, RoleChange};

#[async_trait]
pub trait Store: Send + Sync {
    /// All profile rows matching the subject id. The resolver expects one
    /// row but handles duplicates defensively.
    async fn users_by_id(&self, id: &str) -> Result<Vec<Principal>, AppError>;
    async fn insert_user(&self, user: &Principal) -> Result<Principal, AppError>;
    async fn list_users(&self) -> Result<Vec<Principal>, AppError>;
    /// Apply a role change to one profile row. `None` if no row matched.
    async fn update_user(&self, id: &str, change: &RoleChange)
        -> Result<Option<Principal>, AppError>;

    /// Members ordered newest-created-first.
    async fn list_members(&self) -> Result<Vec<Member>, AppError>;
    async fn member_by_id(&self, id: &str) -> Result<Option<Member>, AppError>;
    async fn insert_member(&self, member: &Member) -> Result<Member, AppError>;
    async fn update_member(&self, id: &str, change: &MemberChange)
        -> Result<Option<Member>, AppError>;
    /// `true` if a row was deleted.
    async fn delete_member(&self, id: &str) -> Result<bool, AppError>;

    /// Notifications ordered newest-created-first.
    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError>;
    async fn insert_notification(&self, n: &Notification) -> Result<Notification, AppError>;
    async fn delete_notification(&self, id: &str) -> Result<bool, AppError>;
}

/// PostgREST-style HTTP storage client.
pub struct HttpStore {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl HttpStore {
    pub fn new(http: reqwest::Client, base_url: &str, service_key: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn expect_rows<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
        ctx: &'static str,
    ) -> Result<Vec<T>, AppError> {
        let status = resp.status();
        if status == reqwest::StatusCode::CONFLICT {
            return Err(AppError::Validation(format!("{ctx}: duplicate row")));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Upstream(anyhow::anyhow!(
                "storage {ctx} failed with {status}: {body}"
            )));
        }
        resp.json().await.map_err(AppError::from)
    }

    async fn select_eq<T: DeserializeOwned>(
        &self,
        table: &str,
        column: &str,
        value: &str,
        ctx: &'static str,
    ) -> Result<Vec<T>, AppError> {
        let filter = format!("eq.{}", value);
        let resp = self
            .authed(self.http.get(self.table_url(table)))
            .query(&[("select", "*"), (column, filter.as_str())])
            .send()
            .await?;
        self.expect_rows(resp, ctx).await
    }

    async fn select_all<T: DeserializeOwned>(
        &self,
        table: &str,
        order: Option<&str>,
        ctx: &'static str,
    ) -> Result<Vec<T>, AppError> {
        let mut query = vec![("select", "*")];
        if let Some(order) = order {
            query.push(("order", order));
        }
        let resp = self
            .authed(self.http.get(self.table_url(table)))
            .query(&query)
            .send()
            .await?;
        self.expect_rows(resp, ctx).await
    }

    async fn insert<T, B>(&self, table: &str, body: &B, ctx: &'static str) -> Result<T, AppError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let resp = self
            .authed(self.http.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let mut rows: Vec<T> = self.expect_rows(resp, ctx).await?;
        if rows.is_empty() {
            return Err(AppError::Upstream(anyhow::anyhow!(
                "storage {ctx} returned no representation"
            )));
        }
        Ok(rows.remove(0))
    }

    async fn update_eq<T, B>(
        &self,
        table: &str,
        id: &str,
        body: &B,
        ctx: &'static str,
    ) -> Result<Option<T>, AppError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let resp = self
            .authed(self.http.patch(self.table_url(table)))
            .query(&[("id", &format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let mut rows: Vec<T> = self.expect_rows(resp, ctx).await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    async fn delete_eq(&self, table: &str, id: &str, ctx: &'static str) -> Result<bool, AppError> {
        let resp = self
            .authed(self.http.delete(self.table_url(table)))
            .query(&[("id", &format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .send()
            .await?;
        let rows: Vec<serde_json::Value> = self.expect_rows(resp, ctx).await?;
        Ok(!rows.is_empty())
    }
}

#[async_trait]
impl Store for HttpStore {
    async fn users_by_id(&self, id: &str) -> Result<Vec<Principal>, AppError> {
        self.select_eq("users", "id", id, "users select").await
    }

    async fn insert_user(&self, user: &Principal) -> Result<Principal, AppError> {
        self.insert("users", user, "users insert").await
    }

    async fn list_users(&self) -> Result<Vec<Principal>, AppError> {
        self.select_all("users", None, "users list").await
    }

    async fn update_user(
        &self,
        id: &str,
        change: &RoleChange,
    ) -> Result<Option<Principal>, AppError> {
        self.update_eq("users", id, change, "users update").await
    }

    async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        self.select_all("members", Some("created_at.desc"), "members list")
            .await
    }

    async fn member_by_id(&self, id: &str) -> Result<Option<Member>, AppError> {
        let mut rows: Vec<Member> = self.select_eq("members", "id", id, "members select").await?;
        if rows.is_empty() {
            Ok(None)
        } else {
            Ok(Some(rows.remove(0)))
        }
    }

    async fn insert_member(&self, member: &Member) -> Result<Member, AppError> {
        self.insert("members", member, "members insert").await
    }

    async fn update_member(
        &self,
        id: &str,
        change: &MemberChange,
    ) -> Result<Option<Member>, AppError> {
        self.update_eq("members", id, change, "members update").await
    }

    async fn delete_member(&self, id: &str) -> Result<bool, AppError> {
        self.delete_eq("members", id, "members delete").await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        self.select_all("notifications", Some("created_at.desc"), "notifications list")
            .await
    }

    async fn insert_notification(&self, n: &Notification) -> Result<Notification, AppError> {
        self.insert("notifications", n, "notifications insert").await
    }

    async fn delete_notification(&self, id: &str) -> Result<bool, AppError> {
        self.delete_eq("notifications", id, "notifications delete")
            .await
    }
}
