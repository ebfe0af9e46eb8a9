//! `exec` — run a local process.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CommandError, WorkflowError};
use crate::workflow::command::{Category, Command, CommandId, CommandResult};
use crate::workflow::registry::{decode_fields, CommandRegistry};

use super::EXEC;

#[derive(Debug, Clone)]
pub struct Exec {
    id: CommandId,
    pub cmd: String,
    pub args: Vec<String>,
}

#[derive(Deserialize)]
struct ExecFields {
    cmd: String,
    #[serde(default)]
    args: Vec<String>,
}

impl Exec {
    pub fn new(cmd: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            id: CommandId::generate(EXEC),
            cmd: cmd.into(),
            args,
        }
    }

    pub fn decode(value: &Value, _registry: &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError> {
        let fields: ExecFields = decode_fields(EXEC, value)?;
        Ok(Box::new(Self::new(fields.cmd, fields.args)))
    }
}

#[async_trait]
impl Command for Exec {
    fn id(&self) -> &CommandId {
        &self.id
    }

    fn name(&self) -> &str {
        EXEC
    }

    fn category(&self) -> Category {
        Category::Sync
    }

    async fn run(&self, workflow_id: &str) -> Result<CommandResult, CommandError> {
        tracing::debug!("[Exec] workflow={} running {} {:?}", workflow_id, self.cmd, self.args);

        let output = tokio::process::Command::new(&self.cmd)
            .args(&self.args)
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| CommandError::Transport(format!("cannot execute '{}': {}", self.cmd, e)))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
        if output.status.success() {
            return Ok(CommandResult::success(stdout));
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
        let reason = match output.status.code() {
            Some(code) => format!("'{}' exited with status {}", self.cmd, code),
            None => format!("'{}' was terminated by a signal", self.cmd),
        };
        let detail = if stderr.is_empty() { stdout } else { stderr };
        Ok(CommandResult::failure(detail, reason))
    }

    fn user_string(&self) -> String {
        format!("Executing {}", self.cmd)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Exec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SYNC Exec: {}", self.cmd)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
