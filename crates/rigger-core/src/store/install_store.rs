use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;

use crate::error::ServerError;
use crate::models::install::{InstallState, InstallationState};

/// In-memory progress records, keyed by install id.
///
/// Reads return cloned snapshots so callers never observe a record while
/// the install task is updating it.
#[derive(Default)]
pub struct InstallStore {
    installs: RwLock<HashMap<String, InstallationState>>,
}

fn poisoned() -> ServerError {
    ServerError::Internal("install store lock poisoned".to_string())
}

fn not_found(install_id: &str) -> ServerError {
    ServerError::NotFound(format!("Install not found: {}", install_id))
}

impl InstallStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh INIT record.
    pub fn create(&self, install_id: &str, total_commands: usize) -> Result<InstallationState, ServerError> {
        let mut installs = self.installs.write().map_err(|_| poisoned())?;
        if installs.contains_key(install_id) {
            return Err(ServerError::Conflict(format!(
                "Install already exists: {}",
                install_id
            )));
        }
        let state = InstallationState::new(install_id.to_string(), total_commands);
        installs.insert(install_id.to_string(), state.clone());
        Ok(state)
    }

    pub fn get(&self, install_id: &str) -> Result<Option<InstallationState>, ServerError> {
        let installs = self.installs.read().map_err(|_| poisoned())?;
        Ok(installs.get(install_id).cloned())
    }

    /// Move an install to `next`. Only forward transitions are accepted;
    /// `last_error` is recorded when entering ERROR.
    pub fn transition(
        &self,
        install_id: &str,
        next: InstallState,
        last_error: Option<String>,
    ) -> Result<InstallationState, ServerError> {
        let mut installs = self.installs.write().map_err(|_| poisoned())?;
        let record = installs
            .get_mut(install_id)
            .ok_or_else(|| not_found(install_id))?;

        if !record.state.can_transition_to(next) {
            return Err(ServerError::Conflict(format!(
                "Install {} cannot move from {} to {}",
                install_id, record.state, next
            )));
        }

        record.state = next;
        if next == InstallState::Error {
            record.last_error = last_error;
        }
        record.updated_at = Utc::now();
        Ok(record.clone())
    }

    /// Bump the completed-command counter.
    pub fn record_completed(&self, install_id: &str) -> Result<(), ServerError> {
        let mut installs = self.installs.write().map_err(|_| poisoned())?;
        let record = installs
            .get_mut(install_id)
            .ok_or_else(|| not_found(install_id))?;
        record.completed_commands = (record.completed_commands + 1).min(record.total_commands);
        record.updated_at = Utc::now();
        Ok(())
    }

    pub fn remove(&self, install_id: &str) -> Result<InstallationState, ServerError> {
        let mut installs = self.installs.write().map_err(|_| poisoned())?;
        installs
            .remove(install_id)
            .ok_or_else(|| not_found(install_id))
    }

    /// All records, oldest first.
    pub fn list(&self) -> Result<Vec<InstallationState>, ServerError> {
        let installs = self.installs.read().map_err(|_| poisoned())?;
        let mut all: Vec<_> = installs.values().cloned().collect();
        all.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.install_id.cmp(&b.install_id))
        });
        Ok(all)
    }
}
