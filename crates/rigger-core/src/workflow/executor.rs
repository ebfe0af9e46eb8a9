//! Workflow Executor — runs a workflow's commands in order.
//!
//! The executor:
//! 1. Iterates commands strictly in sequence order
//! 2. Runs `Sync` commands inline, blocking until they finish
//! 3. Dispatches `Async` commands onto a `JoinSet` (unless disabled),
//!    and always joins them before the workflow is declared finished
//! 4. Stops starting new commands after the first observed failure
//!    (fail-fast); commands already in flight complete on their own
//! 5. Reports every finished command to an `ExecutionListener`

use std::sync::Arc;

use tokio::task::JoinSet;

use crate::error::CommandError;
use crate::workflow::command::{Category, Command, CommandResult};
use crate::workflow::model::{StepResult, Workflow, WorkflowResult};

/// Tunables for the executor.
#[derive(Debug, Clone)]
pub struct ExecutorOptions {
    /// Let `Async` commands run in the background while later commands
    /// start. When false every command is awaited inline.
    pub concurrent_async: bool,
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            concurrent_async: true,
        }
    }
}

/// Receives per-command progress notifications.
pub trait ExecutionListener: Send + Sync {
    fn command_started(&self, _workflow: &Workflow, _index: usize) {}

    fn command_finished(&self, _workflow: &Workflow, _step: &StepResult) {}
}

/// Listener that ignores every notification.
pub struct NoopListener;

impl ExecutionListener for NoopListener {}

/// The workflow executor engine.
#[derive(Debug, Clone, Default)]
pub struct WorkflowExecutor {
    options: ExecutorOptions,
}

type Outcome = Result<CommandResult, CommandError>;

impl WorkflowExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExecutorOptions) -> Self {
        Self { options }
    }

    /// Execute a workflow to completion.
    pub async fn execute(&self, workflow: &Workflow, listener: &dyn ExecutionListener) -> WorkflowResult {
        tracing::info!(
            "[Executor] Starting workflow {} ({} command(s)): {}",
            workflow.id,
            workflow.len(),
            workflow.description
        );

        let mut run = RunState::default();
        let mut in_flight: JoinSet<(usize, Outcome)> = JoinSet::new();

        for (index, command) in workflow.commands.iter().enumerate() {
            while let Some(joined) = in_flight.try_join_next() {
                run.record_joined(workflow, joined, listener);
            }
            if run.failed() {
                break;
            }

            listener.command_started(workflow, index);
            tracing::debug!("[Executor] {} step {}: {}", workflow.id, index, command);

            if command.category() == Category::Async && self.options.concurrent_async {
                let command = Arc::clone(command);
                let workflow_id = workflow.id.clone();
                in_flight.spawn(async move {
                    let outcome = command.run(&workflow_id).await;
                    (index, outcome)
                });
            } else {
                let outcome = command.run(&workflow.id).await;
                run.record(workflow, index, outcome, listener);
            }

            if run.failed() {
                break;
            }
        }

        while let Some(joined) = in_flight.join_next().await {
            run.record_joined(workflow, joined, listener);
        }

        let result = run.finish(workflow);
        if result.success {
            tracing::info!("[Executor] Workflow {} completed successfully", workflow.id);
        } else {
            tracing::warn!(
                "[Executor] Workflow {} failed after {}/{} command(s): {}",
                workflow.id,
                result.steps.len(),
                workflow.len(),
                result.error.as_deref().unwrap_or("unknown")
            );
        }
        result
    }
}

#[derive(Default)]
struct RunState {
    steps: Vec<StepResult>,
    /// (index, message) of the earliest failing command.
    first_failure: Option<(usize, String)>,
}

impl RunState {
    fn failed(&self) -> bool {
        self.first_failure.is_some()
    }

    fn record_joined(
        &mut self,
        workflow: &Workflow,
        joined: Result<(usize, Outcome), tokio::task::JoinError>,
        listener: &dyn ExecutionListener,
    ) {
        match joined {
            Ok((index, outcome)) => self.record(workflow, index, outcome, listener),
            Err(e) => {
                // The task id is all we know about a panicked command
                tracing::error!("[Executor] {} async command task failed: {}", workflow.id, e);
                let message = format!("async command task failed: {}", e);
                self.first_failure.get_or_insert((usize::MAX, message));
            }
        }
    }

    fn record(&mut self, workflow: &Workflow, index: usize, outcome: Outcome, listener: &dyn ExecutionListener) {
        let command = &workflow.commands[index];
        let step = match outcome {
            Ok(result) => StepResult {
                index,
                command_id: command.id().to_string(),
                name: command.name().to_string(),
                success: result.success,
                error: (!result.success).then(|| result.failure_message()),
                output: result.output,
            },
            Err(e) => StepResult {
                index,
                command_id: command.id().to_string(),
                name: command.name().to_string(),
                success: false,
                output: String::new(),
                error: Some(e.to_string()),
            },
        };

        if !step.success {
            let message = format!("{}: {}", command, step.error.as_deref().unwrap_or("failed"));
            tracing::warn!("[Executor] {} step {} failed: {}", workflow.id, index, message);
            match &self.first_failure {
                Some((first, _)) if *first <= index => {}
                _ => self.first_failure = Some((index, message)),
            }
        }

        listener.command_finished(workflow, &step);
        self.steps.push(step);
    }

    fn finish(mut self, workflow: &Workflow) -> WorkflowResult {
        self.steps.sort_by_key(|s| s.index);
        let error = self.first_failure.map(|(_, message)| message);
        WorkflowResult {
            workflow_id: workflow.id.clone(),
            success: error.is_none(),
            error,
            steps: self.steps,
        }
    }
}
