//! `logger` — write a message to the install log.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CommandError, WorkflowError};
use crate::workflow::command::{Category, Command, CommandId, CommandResult};
use crate::workflow::registry::{decode_fields, CommandRegistry};

use super::LOGGER;

#[derive(Debug, Clone)]
pub struct Logger {
    id: CommandId,
    pub msg: String,
}

#[derive(Deserialize)]
struct LoggerFields {
    msg: String,
}

impl Logger {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            id: CommandId::generate(LOGGER),
            msg: msg.into(),
        }
    }

    pub fn decode(value: &Value, _registry: &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError> {
        let fields: LoggerFields = decode_fields(LOGGER, value)?;
        Ok(Box::new(Self::new(fields.msg)))
    }
}

#[async_trait]
impl Command for Logger {
    fn id(&self) -> &CommandId {
        &self.id
    }

    fn name(&self) -> &str {
        LOGGER
    }

    fn category(&self) -> Category {
        Category::Sync
    }

    async fn run(&self, workflow_id: &str) -> Result<CommandResult, CommandError> {
        tracing::info!(workflow_id, "{}", self.msg);
        Ok(CommandResult::success(self.msg.clone()))
    }

    fn user_string(&self) -> String {
        self.msg.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SYNC Logger: {}", self.msg)
    }
}
