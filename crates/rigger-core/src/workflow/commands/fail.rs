//! `fail` — always fails. Registered under both categories; mostly useful
//! to exercise `try` branches and fail-fast handling.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{CommandError, WorkflowError};
use crate::workflow::command::{Category, Command, CommandId, CommandResult};
use crate::workflow::registry::CommandRegistry;

use super::FAIL;

#[derive(Debug, Clone)]
pub struct Fail {
    id: CommandId,
    category: Category,
}

impl Fail {
    pub fn new(category: Category) -> Self {
        Self {
            id: CommandId::generate(FAIL),
            category,
        }
    }

    pub fn sync() -> Self {
        Self::new(Category::Sync)
    }

    pub fn async_() -> Self {
        Self::new(Category::Async)
    }

    pub fn decode_sync(_value: &Value, _registry: &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError> {
        Ok(Box::new(Self::sync()))
    }

    pub fn decode_async(_value: &Value, _registry: &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError> {
        Ok(Box::new(Self::async_()))
    }
}

#[async_trait]
impl Command for Fail {
    fn id(&self) -> &CommandId {
        &self.id
    }

    fn name(&self) -> &str {
        FAIL
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn run(&self, _workflow_id: &str) -> Result<CommandResult, CommandError> {
        Ok(CommandResult::failure("Fail command", "command failed on purpose"))
    }

    fn user_string(&self) -> String {
        "Failing on purpose".to_string()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Fail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Fail", self.category.label())
    }
}
