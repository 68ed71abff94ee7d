//! Shared test harness: the full router wired to in-memory provider fakes.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use async_trait::async_trait;
use roster_service::config::{Config, Environment, ProviderConfig, SecurityConfig};
use roster_service::error::AppError;
use roster_service::models::{
    Member, MemberChange, Notification, Principal, Role, RoleChange,
};
use roster_service::providers::{
    IdentityProvider, MemoryIdentity, MemoryStore, Store,
};
use roster_service::services::{
    AdminService, AuthService, MemberService, NotificationService, Notifier,
};
use roster_service::{build_router, AppState};

pub const PASSWORD: &str = "Password123!";

pub struct TestApp {
    router: Router,
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MemoryIdentity>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_store(store.clone(), store)
    }

    /// Same harness, except every notification write fails at the storage
    /// layer. Members and users still persist normally.
    pub fn with_failing_notifications() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_store(Arc::new(FailingNotificationStore(store.clone())), store)
    }

    fn with_store(store_dyn: Arc<dyn Store>, store: Arc<MemoryStore>) -> Self {
        let identity = Arc::new(MemoryIdentity::new());
        let identity_dyn: Arc<dyn IdentityProvider> = identity.clone();
        let notifier = Notifier::new(store_dyn.clone());

        let state = AppState {
            config: test_config(),
            auth: AuthService::new(identity_dyn, store_dyn.clone()),
            admin: AdminService::new(store_dyn.clone(), notifier.clone()),
            members: MemberService::new(store_dyn.clone(), notifier),
            notifications: NotificationService::new(store_dyn),
        };

        Self {
            router: build_router(state),
            store,
            identity,
        }
    }

    /// One request through the router, returning status and parsed body.
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Register through the endpoint, returning the new user id.
    pub async fn register(&self, email: &str, name: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/register",
                None,
                Some(json!({ "email": email, "password": PASSWORD, "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        body["user_id"].as_str().unwrap().to_string()
    }

    /// Login through the endpoint, returning the access token.
    pub async fn login(&self, email: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/login",
                None,
                Some(json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Register a user and force its role directly in storage, bypassing
    /// the superuser endpoint. Returns (user id, access token).
    pub async fn user_with_role(
        &self,
        email: &str,
        name: &str,
        role: Role,
        is_superuser: bool,
    ) -> (String, String) {
        let user_id = self.register(email, name).await;
        self.store
            .update_user(
                &user_id,
                &RoleChange {
                    role,
                    is_superuser,
                    assigned_group: None,
                },
            )
            .await
            .unwrap();
        let token = self.login(email).await;
        (user_id, token)
    }

    pub async fn notifications(&self) -> Vec<roster_service::models::Notification> {
        self.store.list_notifications().await.unwrap()
    }
}

/// Delegates to the in-memory store, except notification inserts always
/// fail as if the backing table were unreachable.
pub struct FailingNotificationStore(pub Arc<MemoryStore>);

#[async_trait]
impl Store for FailingNotificationStore {
    async fn users_by_id(&self, id: &str) -> Result<Vec<Principal>, AppError> {
        self.0.users_by_id(id).await
    }

    async fn insert_user(&self, user: &Principal) -> Result<Principal, AppError> {
        self.0.insert_user(user).await
    }

    async fn list_users(&self) -> Result<Vec<Principal>, AppError> {
        self.0.list_users().await
    }

    async fn update_user(
        &self,
        id: &str,
        change: &RoleChange,
    ) -> Result<Option<Principal>, AppError> {
        self.0.update_user(id, change).await
    }

    async fn list_members(&self) -> Result<Vec<Member>, AppError> {
        self.0.list_members().await
    }

    async fn member_by_id(&self, id: &str) -> Result<Option<Member>, AppError> {
        self.0.member_by_id(id).await
    }

    async fn insert_member(&self, member: &Member) -> Result<Member, AppError> {
        self.0.insert_member(member).await
    }

    async fn update_member(
        &self,
        id: &str,
        change: &MemberChange,
    ) -> Result<Option<Member>, AppError> {
        self.0.update_member(id, change).await
    }

    async fn delete_member(&self, id: &str) -> Result<bool, AppError> {
        self.0.delete_member(id).await
    }

    async fn list_notifications(&self) -> Result<Vec<Notification>, AppError> {
        self.0.list_notifications().await
    }

    async fn insert_notification(&self, _n: &Notification) -> Result<Notification, AppError> {
        Err(AppError::Upstream(anyhow::anyhow!(
            "notification table unavailable"
        )))
    }

    async fn delete_notification(&self, id: &str) -> Result<bool, AppError> {
        self.0.delete_notification(id).await
    }
}

fn test_config() -> Config {
    Config {
        environment: Environment::Dev,
        service_name: "roster-service-test".to_string(),
        service_version: "0.0.0-test".to_string(),
        log_level: "warn".to_string(),
        port: 0,
        provider: ProviderConfig {
            base_url: "http://localhost:54321".to_string(),
            anon_key: "test-anon-key".to_string(),
            service_key: "test-service-key".to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
    }
}

pub fn member_body(name: &str) -> Value {
    json!({
        "name": name,
        "phone_number": "5551234567",
        "group": 1,
        "is_pioneer": false,
        "is_encouraged": false,
    })
}
