//! `try` — run a command and fall back to another one if it fails.
//!
//! ```json
//! {"type": "sync", "name": "try", "description": "Install ingress",
//!  "cmd":    {"type": "sync", "name": "exec", "cmd": "kubectl", "args": ["apply", "-f", "ingress.yaml"]},
//!  "onFail": {"type": "sync", "name": "logger", "msg": "ingress already present"}}
//! ```
//!
//! The fallback runs iff the primary returns a transport error or an
//! unsuccessful result; its outcome (including errors) is returned as-is.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CommandError, WorkflowError};
use crate::workflow::command::{Category, Command, CommandId, CommandResult};
use crate::workflow::registry::{decode_fields, CommandRegistry};

use super::TRY;

#[derive(Debug)]
pub struct Try {
    id: CommandId,
    pub description: String,
    pub try_command: Box<dyn Command>,
    pub on_fail_command: Box<dyn Command>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TryFields {
    #[serde(default)]
    description: String,
    cmd: Value,
    on_fail: Value,
}

impl Try {
    pub fn new(
        description: impl Into<String>,
        try_command: Box<dyn Command>,
        on_fail_command: Box<dyn Command>,
    ) -> Self {
        Self {
            id: CommandId::generate(TRY),
            description: description.into(),
            try_command,
            on_fail_command,
        }
    }

    pub fn decode(value: &Value, registry: &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError> {
        let fields: TryFields = decode_fields(TRY, value)?;
        let try_command = registry.decode(&fields.cmd)?;
        let on_fail_command = registry.decode(&fields.on_fail)?;
        Ok(Box::new(Self::new(fields.description, try_command, on_fail_command)))
    }
}

#[async_trait]
impl Command for Try {
    fn id(&self) -> &CommandId {
        &self.id
    }

    fn name(&self) -> &str {
        TRY
    }

    fn category(&self) -> Category {
        Category::Sync
    }

    async fn run(&self, workflow_id: &str) -> Result<CommandResult, CommandError> {
        let reason = match self.try_command.run(workflow_id).await {
            Ok(result) if result.success => return Ok(result),
            Ok(result) => result.failure_message(),
            Err(e) => e.to_string(),
        };

        tracing::warn!(
            "[Try] workflow={} {} failed ({}), running fallback {}",
            workflow_id,
            self.try_command.id(),
            reason,
            self.on_fail_command.id()
        );
        self.on_fail_command.run(workflow_id).await
    }

    fn pretty_print(&self, indentation: usize) -> String {
        let pad = " ".repeat(indentation);
        format!(
            "{}{}\n{}  Try:\n{}\n{}  OnFail:\n{}",
            pad,
            self,
            pad,
            self.try_command.pretty_print(indentation + 4),
            pad,
            self.on_fail_command.pretty_print(indentation + 4)
        )
    }

    fn user_string(&self) -> String {
        format!(
            "{} (on failure: {})",
            self.try_command.user_string(),
            self.on_fail_command.user_string()
        )
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Try {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SYNC Try: {}", self.description)
    }
}
