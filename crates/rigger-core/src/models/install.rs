use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstallState {
    Init,
    InProgress,
    Finished,
    Error,
}

impl InstallState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "INIT",
            Self::InProgress => "IN_PROGRESS",
            Self::Finished => "FINISHED",
            Self::Error => "ERROR",
        }
    }

    /// FINISHED and ERROR never change again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Error)
    }

    pub fn can_transition_to(&self, next: InstallState) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::InProgress)
                | (Self::Init, Self::Error)
                | (Self::InProgress, Self::Finished)
                | (Self::InProgress, Self::Error)
        )
    }
}

impl std::fmt::Display for InstallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress record of one install, as returned by `CheckProgress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationState {
    pub install_id: String,
    pub state: InstallState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub total_commands: usize,
    pub completed_commands: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InstallationState {
    pub fn new(install_id: String, total_commands: usize) -> Self {
        let now = Utc::now();
        Self {
            install_id,
            state: InstallState::Init,
            last_error: None,
            total_commands,
            completed_commands: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Body of a `StartInstall` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartInstallRequest {
    #[serde(default)]
    pub install_id: Option<String>,
    /// Workflow source text (templated JSON with `//` comments).
    pub workflow: String,
    #[serde(default)]
    pub params: Value,
}

/// Rendering of a workflow that was parsed but not executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowPlan {
    pub description: String,
    pub plan: String,
    pub steps: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monotonic_transitions() {
        use InstallState::*;
        assert!(Init.can_transition_to(InProgress));
        assert!(Init.can_transition_to(Error));
        assert!(InProgress.can_transition_to(Finished));
        assert!(InProgress.can_transition_to(Error));
        assert!(!Init.can_transition_to(Finished));
        assert!(!Finished.can_transition_to(Error));
        assert!(!Error.can_transition_to(InProgress));
        assert!(!InProgress.can_transition_to(Init));
    }

    #[test]
    fn test_state_serializes_screaming_case() {
        assert_eq!(
            serde_json::to_value(InstallState::InProgress).unwrap(),
            serde_json::json!("IN_PROGRESS")
        );
        let state = InstallationState::new("i-1".to_string(), 3);
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["installId"], "i-1");
        assert_eq!(value["state"], "INIT");
        assert_eq!(value["totalCommands"], 3);
        assert!(value.get("lastError").is_none());
    }

    #[test]
    fn test_start_request_defaults() {
        let req: StartInstallRequest =
            serde_json::from_value(serde_json::json!({"workflow": "{}"})).unwrap();
        assert!(req.install_id.is_none());
        assert!(req.params.is_null());
    }
}
