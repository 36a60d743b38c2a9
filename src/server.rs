//! # Server Module
//!
//! HTTP server setup and route configuration for the ShopMarket server.

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use chrono::Duration;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::JwtService;
use crate::config::{Config, CorsConfig};
use crate::database::{DatabaseConfig, DatabaseConnection};
use crate::repositories::{InMemoryStore, ItemRepository, UserRepository};
use crate::routes::health::ping;
use crate::services::{AuthService, ItemService};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub items: Arc<ItemService>,
    /// Present when running against Postgres; used by the health check
    pub db: Option<Arc<DatabaseConnection>>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        jwt: JwtService,
        db: Option<Arc<DatabaseConnection>>,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, jwt)),
            items: Arc::new(ItemService::new(items)),
            db,
        }
    }

    /// State backed by a fresh in-memory store
    pub fn in_memory(jwt: JwtService) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(store.clone(), store, jwt, None)
    }
}

fn cors_layer(cors: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cors
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(cors.max_age_secs))
}

/// Assemble the full application router
pub fn build_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .merge(crate::routes::items::create_item_routes(&state))
        .merge(crate::routes::auth::create_auth_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(cors)),
        )
        .with_state(state)
}

/// Connect storage, then serve until Ctrl-C or SIGTERM.
pub async fn start(config: Config) -> Result<()> {
    let jwt_service = JwtService::new(
        &config.auth.jwt_secret,
        &config.auth.issuer,
        Duration::hours(config.auth.token_ttl_hours),
    );

    let app_state = match &config.database {
        Some(settings) => {
            let db_config = DatabaseConfig::from_url(&settings.url, settings.max_connections)?;
            let db = Arc::new(DatabaseConnection::new(db_config).await?);
            db.migrate().await?;
            AppState::new(db.clone(), db.clone(), jwt_service, Some(db))
        }
        None => {
            tracing::warn!("⚠️  DATABASE_URL not set, using in-memory storage; data is lost on exit");
            AppState::in_memory(jwt_service)
        }
    };

    let app = build_router(app_state, &config.cors);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {} - port may already be in use", addr))?;

    tracing::info!("🚀 ShopMarket server starting...");
    tracing::info!("📡 Listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);
    tracing::info!("🔧 Environment: {}", if config.production { "Production" } else { "Development" });

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("👋 Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
