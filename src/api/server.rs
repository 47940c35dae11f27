//! Sheet Filter API Server implementation
//!
//! HTTP REST API server using Axum. Provides the eligibility, rules and
//! download endpoints.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::store::{TableStore, DEFAULT_STORAGE_DIR};

/// Source workbook for eligibility filtering
pub const DEFAULT_ELIGIBILITY_SOURCE: &str = "ModelCreation.xlsx";

/// Source workbook for rule scoring
pub const DEFAULT_RULES_SOURCE: &str = "storage/Car loan.xlsx";

/// API Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub storage_dir: PathBuf,
    pub eligibility_source: PathBuf,
    pub rules_source: PathBuf,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            eligibility_source: PathBuf::from(DEFAULT_ELIGIBILITY_SOURCE),
            rules_source: PathBuf::from(DEFAULT_RULES_SOURCE),
        }
    }
}

/// Shared application state
///
/// Holds paths only. Every request loads its source afresh, so no table is
/// shared between requests.
#[derive(Debug, Clone)]
pub struct AppState {
    pub version: String,
    pub store: TableStore,
    pub eligibility_source: PathBuf,
    pub rules_source: PathBuf,
}

impl AppState {
    pub fn from_config(config: &ApiConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: TableStore::new(&config.storage_dir),
            eligibility_source: config.eligibility_source.clone(),
            rules_source: config.rules_source.clone(),
        }
    }
}

/// Build the router with all endpoints and middleware
pub fn build_router(state: Arc<AppState>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        // Filter endpoints
        .route("/filter/eligibility/", post(handlers::filter_eligibility))
        .route("/filter/rules/", post(handlers::filter_rules))
        .route("/download/", get(handlers::download))
        // State and middleware
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheet_filter=info,tower_http=info".into()),
        )
        .init();

    let state = Arc::new(AppState::from_config(&config));
    state.store.ensure_dir()?;

    let app = build_router(Arc::clone(&state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Sheet Filter API Server starting on http://{}", addr);
    info!("   Endpoints: /filter/eligibility/, /filter/rules/, /download/");
    info!(
        "   Storage: {}, eligibility source: {}, rules source: {}",
        state.store.dir().display(),
        state.eligibility_source.display(),
        state.rules_source.display()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Sheet Filter API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("failed to install signal handler: {}", e);
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

    info!("Shutdown signal received, stopping server...");
}
