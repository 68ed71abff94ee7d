use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_service::{
    build_router,
    config::Config,
    error::AppError,
    providers::{HttpIdentity, HttpStore, IdentityProvider, Store},
    services::{AdminService, AuthService, MemberService, NotificationService, Notifier},
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    // Load configuration - fail fast if invalid
    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting roster service"
    );

    let http = reqwest::Client::new();
    let identity: Arc<dyn IdentityProvider> = Arc::new(HttpIdentity::new(
        http.clone(),
        &config.provider.base_url,
        &config.provider.anon_key,
    ));
    let store: Arc<dyn Store> = Arc::new(HttpStore::new(
        http,
        &config.provider.base_url,
        &config.provider.service_key,
    ));
    tracing::info!(provider = %config.provider.base_url, "Provider clients initialized");

    let notifier = Notifier::new(store.clone());
    let state = AppState {
        config: config.clone(),
        auth: AuthService::new(identity, store.clone()),
        admin: AdminService::new(store.clone(), notifier.clone()),
        members: MemberService::new(store.clone(), notifier),
        notifications: NotificationService::new(store),
    };

    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

fn init_tracing(log_level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
