//! `sleep` — async pause, mostly used to pace installs and in tests.

use std::any::Any;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CommandError, WorkflowError};
use crate::workflow::command::{Category, Command, CommandId, CommandResult};
use crate::workflow::registry::{decode_fields, CommandRegistry};

use super::SLEEP;

#[derive(Debug, Clone)]
pub struct Sleep {
    id: CommandId,
    /// Duration as written in the definition, in seconds.
    pub duration: String,
    period: Duration,
}

#[derive(Deserialize)]
struct SleepFields {
    duration: String,
}

impl Sleep {
    /// Build a sleep of `duration` seconds (fractions allowed).
    pub fn new(duration: &str) -> Result<Self, WorkflowError> {
        let secs: f64 = duration
            .trim()
            .parse()
            .map_err(|_| WorkflowError::MalformedDefinition(format!("invalid sleep duration '{}'", duration)))?;
        // Rejects negative, non-finite and out-of-range values alike.
        let period = Duration::try_from_secs_f64(secs)
            .map_err(|_| WorkflowError::MalformedDefinition(format!("invalid sleep duration '{}'", duration)))?;
        Ok(Self {
            id: CommandId::generate(SLEEP),
            duration: duration.to_string(),
            period,
        })
    }

    pub fn decode(value: &Value, _registry: &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError> {
        let fields: SleepFields = decode_fields(SLEEP, value)?;
        Ok(Box::new(Self::new(&fields.duration)?))
    }
}

#[async_trait]
impl Command for Sleep {
    fn id(&self) -> &CommandId {
        &self.id
    }

    fn name(&self) -> &str {
        SLEEP
    }

    fn category(&self) -> Category {
        Category::Async
    }

    async fn run(&self, _workflow_id: &str) -> Result<CommandResult, CommandError> {
        tokio::time::sleep(self.period).await;
        Ok(CommandResult::success(format!("Slept for {}", self.duration)))
    }

    fn user_string(&self) -> String {
        format!("Waiting {} seconds", self.duration)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Sleep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ASYNC Sleep for {}", self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_durations() {
        assert!(Sleep::new("soon").is_err());
        assert!(Sleep::new("-1").is_err());
        assert!(Sleep::new("0.5").is_ok());
    }

    #[test]
    fn test_rejects_oversized_duration() {
        assert!(matches!(
            Sleep::new("1e300"),
            Err(WorkflowError::MalformedDefinition(_))
        ));
        assert!(matches!(Sleep::new("inf"), Err(WorkflowError::MalformedDefinition(_))));

        let decoded = CommandRegistry::with_builtins().decode(&serde_json::json!({
            "type": "async", "name": "sleep", "duration": "1e300"
        }));
        assert!(matches!(decoded, Err(WorkflowError::MalformedDefinition(_))));
    }

    #[tokio::test]
    async fn test_output_mentions_duration() {
        let sleep = Sleep::new("0").unwrap();
        let result = sleep.run("wf").await.unwrap();
        assert_eq!(result, CommandResult::success("Slept for 0"));
    }
}
