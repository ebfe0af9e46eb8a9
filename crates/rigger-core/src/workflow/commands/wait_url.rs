//! `waitUrl` — block until an HTTP endpoint answers with a 2xx status.

use std::any::Any;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{CommandError, WorkflowError};
use crate::workflow::command::{Category, Command, CommandId, CommandResult};
use crate::workflow::poll::poll_until;
use crate::workflow::registry::{decode_fields, CommandRegistry};

use super::WAIT_URL;

const DEFAULT_INTERVAL_SECS: u64 = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct WaitUrl {
    id: CommandId,
    pub url: String,
    pub interval: Duration,
    pub timeout: Duration,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WaitUrlFields {
    url: String,
    #[serde(default = "default_interval")]
    interval_secs: u64,
    #[serde(default = "default_timeout")]
    timeout_secs: u64,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl WaitUrl {
    pub fn new(url: impl Into<String>, interval: Duration, timeout: Duration) -> Self {
        Self {
            id: CommandId::generate(WAIT_URL),
            url: url.into(),
            interval,
            timeout,
        }
    }

    pub fn decode(value: &Value, _registry: &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError> {
        let fields: WaitUrlFields = decode_fields(WAIT_URL, value)?;
        if fields.interval_secs == 0 {
            return Err(WorkflowError::MalformedDefinition(
                "waitUrl intervalSecs must be greater than zero".to_string(),
            ));
        }
        Ok(Box::new(Self::new(
            fields.url,
            Duration::from_secs(fields.interval_secs),
            Duration::from_secs(fields.timeout_secs),
        )))
    }
}

#[async_trait]
impl Command for WaitUrl {
    fn id(&self) -> &CommandId {
        &self.id
    }

    fn name(&self) -> &str {
        WAIT_URL
    }

    fn category(&self) -> Category {
        Category::Sync
    }

    async fn run(&self, workflow_id: &str) -> Result<CommandResult, CommandError> {
        let url = reqwest::Url::parse(&self.url)
            .map_err(|e| CommandError::Transport(format!("invalid url '{}': {}", self.url, e)))?;
        let client = reqwest::Client::builder()
            .timeout(self.interval.max(Duration::from_secs(1)))
            .build()?;

        let probe = || {
            let client = client.clone();
            let url = url.clone();
            async move {
                match client.get(url).send().await {
                    Ok(resp) => resp.status().is_success(),
                    Err(e) => {
                        tracing::debug!("[WaitUrl] workflow={} not ready yet: {}", workflow_id, e);
                        false
                    }
                }
            }
        };

        match poll_until(self.interval, self.timeout, probe).await {
            Ok(()) => Ok(CommandResult::success(format!("{} is ready", self.url))),
            Err(e) => Ok(CommandResult::failure(format!("{} is not ready", self.url), e.to_string())),
        }
    }

    fn user_string(&self) -> String {
        format!("Waiting for {} to become available", self.url)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for WaitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SYNC WaitUrl: {} (timeout {:?})", self.url, self.timeout)
    }
}
