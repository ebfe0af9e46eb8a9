//! The command contract shared by every workflow step.
//!
//! A command is either `Sync` (the executor blocks on it) or `Async` (the
//! executor may let it run in the background, but always joins on it
//! before the workflow is finished). `run` distinguishes two kinds of
//! failure:
//!
//! - `Err(CommandError)` — the effect could not even be attempted
//!   (cannot spawn a process, cannot reach a backend).
//! - `Ok(CommandResult { success: false, .. })` — the effect was attempted
//!   and failed.
//!
//! Both abort the workflow unless the command is wrapped in a `try`.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Scheduling category of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Sync,
    Async,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sync => "sync",
            Self::Async => "async",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "sync" => Some(Self::Sync),
            "async" => Some(Self::Async),
            _ => None,
        }
    }

    /// Upper-case label used in plan renderings, e.g. `SYNC Exec ...`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sync => "SYNC",
            Self::Async => "ASYNC",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static NEXT_COMMAND_SEQ: AtomicU64 = AtomicU64::new(1);

/// Process-unique command identifier, derived from the command name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CommandId(String);

impl CommandId {
    /// Generate the next identifier for a command called `name`.
    pub fn generate(name: &str) -> Self {
        let seq = NEXT_COMMAND_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("{}-{}", name, seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a single `run` invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub success: bool,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CommandResult {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    pub fn failure(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
            error: Some(error.into()),
        }
    }

    /// Human-readable reason for a failed result.
    pub fn failure_message(&self) -> String {
        match &self.error {
            Some(err) if self.output.is_empty() => err.clone(),
            Some(err) => format!("{}: {}", self.output, err),
            None => self.output.clone(),
        }
    }
}

/// Capability set implemented by every command variant.
///
/// `Display` is the one-line plan rendering (`String()` in plan output);
/// `pretty_print` and `user_string` must never execute anything.
#[async_trait]
pub trait Command: fmt::Display + fmt::Debug + Send + Sync {
    fn id(&self) -> &CommandId;

    /// Registry discriminant, e.g. `"exec"` or `"try"`.
    fn name(&self) -> &str;

    fn category(&self) -> Category;

    async fn run(&self, workflow_id: &str) -> Result<CommandResult, CommandError>;

    fn pretty_print(&self, indentation: usize) -> String {
        format!("{}{}", " ".repeat(indentation), self)
    }

    /// Short description suitable for end users.
    fn user_string(&self) -> String;

    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_ids_are_unique_per_name() {
        let a = CommandId::generate("exec");
        let b = CommandId::generate("exec");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("exec-"));
    }

    #[test]
    fn test_category_roundtrip() {
        assert_eq!(Category::from_str("sync"), Some(Category::Sync));
        assert_eq!(Category::from_str("async"), Some(Category::Async));
        assert_eq!(Category::from_str("SYNC"), None);
        assert_eq!(
            serde_json::to_value(Category::Async).unwrap(),
            serde_json::json!("async")
        );
    }

    #[test]
    fn test_failure_message() {
        let r = CommandResult::failure("cannot launch", "exit status 2");
        assert_eq!(r.failure_message(), "cannot launch: exit status 2");
        let r = CommandResult::failure("", "boom");
        assert_eq!(r.failure_message(), "boom");
    }
}
