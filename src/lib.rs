//! LinkReach - LinkedIn connection management over a hosted messaging provider
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Profile endpoints                                        │
//! │  - LinkedIn connection endpoints                            │
//! │  - Provider webhook endpoint                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Connection Workflow                        │
//! │  - Status derivation (pure)                                 │
//! │  - Connect orchestration                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Provider Client + Data Layer                    │
//! │  - Typed provider API client (reqwest)                      │
//! │  - Single-flight credential cache                           │
//! │  - SQLite (sqlx)                                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for profiles and LinkedIn operations
//! - `webhook`: provider callback endpoint
//! - `connection`: status resolver and connect orchestrator
//! - `provider`: provider API client and credential cache
//! - `data`: database layer
//! - `config`: configuration management
//! - `error`: error types

pub mod api;
pub mod config;
pub mod connection;
pub mod data;
pub mod error;
pub mod metrics;
pub mod provider;
pub mod webhook;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like database pool, provider client,
/// and HTTP client.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Process-lifetime provider API key cache
    pub credentials: Arc<provider::CredentialCache>,

    /// Provider API client
    pub provider: Arc<provider::ProviderClient>,

    /// Shared HTTP client for all outbound calls
    pub http_client: Arc<reqwest::Client>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database and run migrations
    /// 2. Build the shared HTTP client
    /// 3. Wire the credential cache and provider client
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Connect to SQLite database
        let db = data::Database::connect(&config.database.path).await?;
        tracing::info!("Database connected");

        // 2. Initialize HTTP client
        let http_client = Arc::new(
            reqwest::Client::builder()
                .user_agent("LinkReach/0.1.0")
                .timeout(std::time::Duration::from_secs(
                    config.provider.request_timeout_seconds,
                ))
                .build()
                .map_err(|e| error::AppError::Internal(e.into()))?,
        );

        // 3. Credential cache + provider client
        let credentials = Arc::new(provider::CredentialCache::new(
            Arc::clone(&http_client),
            config.credential_issuer.url.clone(),
            config.credential_issuer.bearer_token.clone(),
        ));
        let provider_client = Arc::new(provider::ProviderClient::new(
            Arc::clone(&http_client),
            config.provider.base_url.clone(),
            Arc::clone(&credentials),
        ));
        tracing::info!(provider = %config.provider.base_url, "Provider client initialized");

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db: Arc::new(db),
            credentials,
            provider: provider_client,
            http_client,
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::trace::TraceLayer;

    let cors_layer = build_cors_layer(&state.config.server);

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(webhook::webhook_router())
        .nest("/api", api::api_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
        .merge(metrics::metrics_router())
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{Any, CorsLayer};

    if !server.protocol.eq_ignore_ascii_case("https") {
        return CorsLayer::permissive();
    }

    let allowed_origin = server.base_url();
    match HeaderValue::from_str(&allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(Any)
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse CORS origin from server base URL; denying cross-origin requests"
            );
            CorsLayer::new().allow_methods(Any).allow_headers(Any)
        }
    }
}

async fn health_check() -> &'static str {
    "OK"
}
