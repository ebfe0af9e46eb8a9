//! InstallManager - the install control plane.
//!
//! `start_install`:
//!   1. Parses the workflow (a bad definition rejects the request)
//!   2. Creates the INIT progress record
//!   3. Spawns a detached task that moves the install to IN_PROGRESS,
//!      runs the workflow and finishes in FINISHED or ERROR
//!
//! Clients then poll `check_progress` and eventually `remove_install`.

use std::sync::Arc;

use serde::Serialize;

use crate::error::ServerError;
use crate::models::install::{InstallState, InstallationState, StartInstallRequest, WorkflowPlan};
use crate::store::InstallStore;
use crate::workflow::executor::{ExecutionListener, WorkflowExecutor};
use crate::workflow::model::{StepResult, Workflow};
use crate::workflow::parser::Parser;

// ─── Progress Listener ────────────────────────────────────────────────────

/// Mirrors executor progress into the install store.
struct StoreListener {
    store: Arc<InstallStore>,
}

impl ExecutionListener for StoreListener {
    fn command_finished(&self, workflow: &Workflow, step: &StepResult) {
        if let Err(e) = self.store.record_completed(&workflow.id) {
            tracing::debug!(
                "[InstallManager] Ignoring progress of step {} for {}: {}",
                step.index,
                workflow.id,
                e
            );
        }
    }
}

// ─── Install Manager ──────────────────────────────────────────────────────

pub struct InstallManager {
    store: Arc<InstallStore>,
    parser: Parser,
    executor: WorkflowExecutor,
}

impl InstallManager {
    pub fn new(store: Arc<InstallStore>, parser: Parser, executor: WorkflowExecutor) -> Self {
        Self {
            store,
            parser,
            executor,
        }
    }

    pub fn store(&self) -> &Arc<InstallStore> {
        &self.store
    }

    /// Parse and launch an install. Returns its id as soon as the INIT
    /// record exists; execution continues in the background.
    pub async fn start_install(&self, request: StartInstallRequest) -> Result<String, ServerError> {
        let install_id = request
            .install_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let workflow = self
            .parser
            .parse_workflow(&request.workflow, &install_id, &request.params)
            .map_err(|e| {
                tracing::warn!("[InstallManager] Rejected install {}: {}", install_id, e);
                ServerError::from(e)
            })?;

        self.store.create(&install_id, workflow.len())?;
        tracing::info!(
            "[InstallManager] Install {} accepted ({} command(s)): {}",
            install_id,
            workflow.len(),
            workflow.description
        );

        let store = Arc::clone(&self.store);
        let executor = self.executor.clone();
        tokio::spawn(async move {
            run_install(store, executor, workflow).await;
        });

        Ok(install_id)
    }

    pub fn check_progress(&self, install_id: &str) -> Result<InstallationState, ServerError> {
        self.store
            .get(install_id)?
            .ok_or_else(|| ServerError::NotFound(format!("Install not found: {}", install_id)))
    }

    /// Forget an install. A task that is still running is not stopped.
    pub fn remove_install(&self, install_id: &str) -> Result<(), ServerError> {
        let removed = self.store.remove(install_id)?;
        if !removed.state.is_terminal() {
            tracing::warn!(
                "[InstallManager] Removed install {} while {}; its task keeps running",
                install_id,
                removed.state
            );
        } else {
            tracing::info!("[InstallManager] Removed install {}", install_id);
        }
        Ok(())
    }

    pub fn list_installs(&self) -> Result<Vec<InstallationState>, ServerError> {
        self.store.list()
    }

    /// Parse a workflow and render its plan without running anything.
    pub fn explain_plan<P: Serialize>(
        &self,
        name: &str,
        workflow: &str,
        params: &P,
    ) -> Result<WorkflowPlan, ServerError> {
        let workflow = self.parser.parse_workflow(workflow, name, params)?;
        Ok(WorkflowPlan {
            description: workflow.description.clone(),
            plan: workflow.pretty_print(),
            steps: workflow.user_steps(),
        })
    }
}

async fn run_install(store: Arc<InstallStore>, executor: WorkflowExecutor, workflow: Workflow) {
    let install_id = workflow.id.clone();
    if let Err(e) = store.transition(&install_id, InstallState::InProgress, None) {
        tracing::warn!("[InstallManager] Install {} progress not tracked: {}", install_id, e);
    }

    let listener = StoreListener {
        store: Arc::clone(&store),
    };
    let result = executor.execute(&workflow, &listener).await;

    let (next, last_error) = if result.success {
        (InstallState::Finished, None)
    } else {
        (InstallState::Error, result.error.clone())
    };
    match store.transition(&install_id, next, last_error) {
        Ok(state) => tracing::info!("[InstallManager] Install {} is {}", install_id, state.state),
        Err(e) => tracing::warn!(
            "[InstallManager] Install {} ended as {} but was not updated: {}",
            install_id,
            next,
            e
        ),
    }
}
