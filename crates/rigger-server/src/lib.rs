//! rigger server - HTTP control plane for cluster installs.
//!
//! Exposes the install manager of `rigger-core` over:
//! - a REST API (`/api/installs`, `/api/workflows`)
//! - the JSON-RPC endpoint `/api/rpc`
//!
//! This crate can be used standalone (`rigger server`) or embedded by
//! starting it with a pre-built `AppState`.

pub mod api;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use rigger_core::state::{AppState, AppStateInner};
use rigger_core::workflow::executor::ExecutorOptions;
use rigger_core::workflow::registry;

/// Configuration for the rigger HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Let async workflow commands overlap with later commands.
    pub concurrent_async: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3310,
            concurrent_async: true,
        }
    }
}

/// Create the shared `AppState` backed by the process-wide command registry.
pub fn create_app_state(config: &ServerConfig) -> AppState {
    Arc::new(AppStateInner::with_registry(
        registry::global(),
        ExecutorOptions {
            concurrent_async: config.concurrent_async,
        },
    ))
}

/// Initialise tracing and start the server.
///
/// Returns the actual address the server is listening on.
pub async fn start_server(config: ServerConfig) -> Result<SocketAddr, String> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rigger_core=info,rigger_server=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting rigger server on {}:{}", config.host, config.port);

    let state = create_app_state(&config);
    start_server_with_state(config, state).await
}

/// Build the axum application for `state`.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::api_router())
        .route("/api/health", axum::routing::get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server with a pre-built `AppState`.
pub async fn start_server_with_state(
    config: ServerConfig,
    state: AppState,
) -> Result<SocketAddr, String> {
    let app = app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("Invalid address: {}", e))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", addr, e))?;

    let local_addr = listener
        .local_addr()
        .map_err(|e| format!("Failed to get local address: {}", e))?;

    tracing::info!("rigger server listening on {}", local_addr);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(local_addr)
}

async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "server": "rigger-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
