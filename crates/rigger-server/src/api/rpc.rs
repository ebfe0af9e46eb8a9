//! JSON-RPC 2.0 endpoint powered by `rigger_core::rpc`.
//!
//! Exposes `POST /api/rpc` for all method calls and `GET /api/rpc/methods`
//! for discovery.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use rigger_core::rpc::RpcRouter;
use rigger_core::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(rpc_handler))
        .route("/methods", get(list_methods))
}

async fn rpc_handler(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Json<serde_json::Value> {
    let rpc = RpcRouter::new(state);
    Json(rpc.handle_value(body).await)
}

async fn list_methods(State(state): State<AppState>) -> Json<serde_json::Value> {
    let rpc = RpcRouter::new(state);
    Json(serde_json::json!({ "methods": rpc.method_list() }))
}
