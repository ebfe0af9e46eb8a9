//! RPC methods for inspecting workflows without running them.
//!
//! Methods:
//! - `workflows.explain`  — parse a workflow and return its plan
//! - `workflows.commands` — the registered `(type, name)` pairs

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::install::WorkflowPlan;
use crate::rpc::error::RpcError;
use crate::state::AppState;
use crate::workflow::registry::RegisteredCommand;

// ---------------------------------------------------------------------------
// workflows.explain
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainParams {
    pub workflow: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default = "default_plan_name")]
    pub name: String,
}

pub(crate) fn default_plan_name() -> String {
    "plan".to_string()
}

pub async fn explain(state: &AppState, params: ExplainParams) -> Result<WorkflowPlan, RpcError> {
    Ok(state
        .install_manager
        .explain_plan(&params.name, &params.workflow, &params.params)?)
}

// ---------------------------------------------------------------------------
// workflows.commands
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CommandsResult {
    pub commands: Vec<RegisteredCommand>,
}

pub async fn commands(state: &AppState) -> Result<CommandsResult, RpcError> {
    Ok(CommandsResult {
        commands: state.registry.commands(),
    })
}
