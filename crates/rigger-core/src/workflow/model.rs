//! Parsed workflow and execution result types.

use std::sync::Arc;

use serde::Serialize;

use crate::workflow::command::Command;

/// An ordered, immutable sequence of commands produced by the parser.
#[derive(Debug, Clone)]
pub struct Workflow {
    pub id: String,
    pub description: String,
    pub commands: Vec<Arc<dyn Command>>,
}

impl Workflow {
    pub fn new(id: impl Into<String>, description: impl Into<String>, commands: Vec<Arc<dyn Command>>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            commands,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Render the install plan without executing anything.
    pub fn pretty_print(&self) -> String {
        let mut plan = format!("Workflow {}: {}", self.id, self.description);
        for command in &self.commands {
            plan.push('\n');
            plan.push_str(&command.pretty_print(2));
        }
        plan
    }

    /// One user-facing line per command, in execution order.
    pub fn user_steps(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.user_string()).collect()
    }
}

/// Result of executing a single workflow command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub index: usize,
    pub command_id: String,
    pub name: String,
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of executing the entire workflow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResult {
    pub workflow_id: String,
    pub success: bool,
    /// Message of the first failing command, in sequence order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub steps: Vec<StepResult>,
}

impl WorkflowResult {
    /// Number of commands that never ran because of an earlier failure.
    pub fn skipped(&self, workflow: &Workflow) -> usize {
        workflow.len().saturating_sub(self.steps.len())
    }
}
