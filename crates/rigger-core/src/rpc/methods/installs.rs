//! RPC methods for install lifecycle management.
//!
//! Methods:
//! - `installs.start`    — parse a workflow and launch it in the background
//! - `installs.progress` — current `InstallationState` of an install
//! - `installs.remove`   — forget an install
//! - `installs.list`     — every tracked install

use serde::{Deserialize, Serialize};

use crate::models::install::{InstallationState, StartInstallRequest};
use crate::rpc::error::RpcError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// installs.start
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResult {
    pub install_id: String,
}

pub async fn start(state: &AppState, params: StartInstallRequest) -> Result<StartResult, RpcError> {
    let install_id = state.install_manager.start_install(params).await?;
    Ok(StartResult { install_id })
}

// ---------------------------------------------------------------------------
// installs.progress
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallIdParams {
    pub install_id: String,
}

pub async fn progress(state: &AppState, params: InstallIdParams) -> Result<InstallationState, RpcError> {
    Ok(state.install_manager.check_progress(&params.install_id)?)
}

// ---------------------------------------------------------------------------
// installs.remove
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct RemoveResult {
    pub removed: bool,
}

pub async fn remove(state: &AppState, params: InstallIdParams) -> Result<RemoveResult, RpcError> {
    state.install_manager.remove_install(&params.install_id)?;
    Ok(RemoveResult { removed: true })
}

// ---------------------------------------------------------------------------
// installs.list
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ListResult {
    pub installs: Vec<InstallationState>,
}

pub async fn list(state: &AppState) -> Result<ListResult, RpcError> {
    let installs = state.install_manager.list_installs()?;
    Ok(ListResult { installs })
}
