//! `scp` — copy a local file to a remote host.
//!
//! Uses the system `scp` binary in batch mode, so authentication must be
//! key based. A definition that only carries a password cannot be run
//! unattended and is reported as a transport error.

use std::any::Any;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CommandError, WorkflowError};
use crate::workflow::command::{Category, Command, CommandId, CommandResult};
use crate::workflow::registry::{decode_fields, CommandRegistry};

use super::SCP;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub private_key: String,
}

#[derive(Debug, Clone)]
pub struct Scp {
    id: CommandId,
    pub target_host: String,
    pub credentials: Credentials,
    pub source: String,
    pub destination: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScpFields {
    target_host: String,
    credentials: Credentials,
    source: String,
    destination: String,
}

impl Scp {
    pub fn new(
        target_host: impl Into<String>,
        credentials: Credentials,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            id: CommandId::generate(SCP),
            target_host: target_host.into(),
            credentials,
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn decode(value: &Value, _registry: &CommandRegistry) -> Result<Box<dyn Command>, WorkflowError> {
        let fields: ScpFields = decode_fields(SCP, value)?;
        Ok(Box::new(Self::new(
            fields.target_host,
            fields.credentials,
            fields.source,
            fields.destination,
        )))
    }

    /// Arguments passed to `scp`.
    pub fn scp_args(&self) -> Vec<String> {
        vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-i".to_string(),
            self.credentials.private_key.clone(),
            self.source.clone(),
            format!(
                "{}@{}:{}",
                self.credentials.username, self.target_host, self.destination
            ),
        ]
    }
}

#[async_trait]
impl Command for Scp {
    fn id(&self) -> &CommandId {
        &self.id
    }

    fn name(&self) -> &str {
        SCP
    }

    fn category(&self) -> Category {
        Category::Sync
    }

    async fn run(&self, workflow_id: &str) -> Result<CommandResult, CommandError> {
        if self.credentials.private_key.is_empty() {
            return Err(CommandError::Transport(format!(
                "cannot copy to {}: scp requires a private key",
                self.target_host
            )));
        }

        tracing::info!(
            "[Scp] workflow={} copying {} to {}:{}",
            workflow_id,
            self.source,
            self.target_host,
            self.destination
        );

        let output = tokio::process::Command::new("scp")
            .args(self.scp_args())
            .stdin(std::process::Stdio::null())
            .output()
            .await
            .map_err(|e| CommandError::Transport(format!("cannot execute scp: {}", e)))?;

        if output.status.success() {
            Ok(CommandResult::success(format!(
                "{} copied to {}:{}",
                self.source, self.target_host, self.destination
            )))
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Ok(CommandResult::failure(
                format!("cannot copy {} to {}", self.source, self.target_host),
                stderr,
            ))
        }
    }

    fn user_string(&self) -> String {
        format!("Copying {} to {}", self.source, self.target_host)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for Scp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SYNC SCP from {} to {}:{}",
            self.source, self.target_host, self.destination
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Value {
        serde_json::json!({
            "type": "sync", "name": "scp", "targetHost": "127.0.0.1",
            "credentials": {"username": "username", "password": "passwd", "privateKey": ""},
            "source": "script.sh", "destination": "/opt/scripts/."
        })
    }

    #[test]
    fn test_decode_scp() {
        let registry = CommandRegistry::with_builtins();
        let cmd = Scp::decode(&sample(), &registry).unwrap();
        let scp = cmd.as_any().downcast_ref::<Scp>().unwrap();
        assert_eq!(scp.target_host, "127.0.0.1");
        assert_eq!(scp.credentials.username, "username");
        assert_eq!(scp.destination, "/opt/scripts/.");
    }

    #[test]
    fn test_scp_args_target() {
        let scp = Scp::new(
            "10.0.0.1",
            Credentials {
                username: "core".to_string(),
                password: String::new(),
                private_key: "/keys/id_rsa".to_string(),
            },
            "a.sh",
            "/tmp/a.sh",
        );
        let args = scp.scp_args();
        assert_eq!(args.last().unwrap(), "core@10.0.0.1:/tmp/a.sh");
        assert!(args.contains(&"/keys/id_rsa".to_string()));
    }

    #[tokio::test]
    async fn test_password_only_is_transport_error() {
        let registry = CommandRegistry::with_builtins();
        let cmd = Scp::decode(&sample(), &registry).unwrap();
        assert!(matches!(cmd.run("wf").await, Err(CommandError::Transport(_))));
    }
}
