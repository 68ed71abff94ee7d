pub mod authz;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod providers;
pub mod services;

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::services::{AdminService, AuthService, MemberService, NotificationService};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: AuthService,
    pub admin: AdminService,
    pub members: MemberService,
    pub notifications: NotificationService,
}

pub fn build_router(state: AppState) -> Router {
    // Everything behind the resolver; per-operation gates live in the
    // handler extractors so they run before any body is read.
    let protected = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/admin/users", get(handlers::admin::list_users))
        .route(
            "/admin/users/:user_id/role",
            put(handlers::admin::update_role),
        )
        .route(
            "/members",
            get(handlers::members::list).post(handlers::members::create),
        )
        .route(
            "/members/:member_id",
            put(handlers::members::update).delete(handlers::members::remove),
        )
        .route(
            "/notifications",
            get(handlers::notifications::list).post(handlers::notifications::create),
        )
        .route(
            "/notifications/:notification_id",
            delete(handlers::notifications::remove),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ));

    let cors = CorsLayer::new()
        .allow_origin(
            state
                .config
                .security
                .allowed_origins
                .iter()
                .filter_map(|origin| {
                    origin
                        .parse::<HeaderValue>()
                        .map_err(|e| {
                            tracing::error!(origin, error = %e, "skipping invalid CORS origin");
                        })
                        .ok()
                })
                .collect::<Vec<HeaderValue>>(),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            },
        ))
        .layer(cors)
}

/// Health check used by uptime probes.
pub async fn root(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Roster service is up and running",
        "service": state.config.service_name,
        "version": state.config.service_version,
    }))
}
