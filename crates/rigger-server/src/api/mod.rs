pub mod installs;
pub mod rpc;
pub mod workflows;

use axum::Router;

use rigger_core::state::AppState;

/// Build the complete API router with all sub-routes.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/api/installs", installs::router())
        .nest("/api/workflows", workflows::router())
        .nest("/api/rpc", rpc::router())
}
