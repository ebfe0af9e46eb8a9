use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use rigger_core::error::ServerError;
use rigger_core::models::install::{InstallationState, StartInstallRequest};
use rigger_core::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_installs).post(start_install))
        .route("/{id}", get(check_progress).delete(remove_install))
}

async fn start_install(
    State(state): State<AppState>,
    Json(body): Json<StartInstallRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServerError> {
    let install_id = state.install_manager.start_install(body).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "installId": install_id })),
    ))
}

async fn list_installs(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let installs = state.install_manager.list_installs()?;
    Ok(Json(serde_json::json!({ "installs": installs })))
}

async fn check_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InstallationState>, ServerError> {
    state.install_manager.check_progress(&id).map(Json)
}

async fn remove_install(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    state.install_manager.remove_install(&id)?;
    Ok(Json(serde_json::json!({ "removed": true })))
}
