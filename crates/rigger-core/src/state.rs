//! Shared application state for the HTTP server, the RPC router and the CLI.

use std::sync::Arc;

use crate::orchestration::InstallManager;
use crate::store::InstallStore;
use crate::workflow::executor::{ExecutorOptions, WorkflowExecutor};
use crate::workflow::parser::Parser;
use crate::workflow::registry::{self, CommandRegistry};

/// Shared state accessible by all API handlers.
pub struct AppStateInner {
    pub install_store: Arc<InstallStore>,
    pub install_manager: InstallManager,
    pub registry: Arc<CommandRegistry>,
}

pub type AppState = Arc<AppStateInner>;

impl AppStateInner {
    /// State backed by the process-wide command registry.
    pub fn new() -> Self {
        Self::with_registry(registry::global(), ExecutorOptions::default())
    }

    pub fn with_registry(registry: Arc<CommandRegistry>, options: ExecutorOptions) -> Self {
        let install_store = Arc::new(InstallStore::new());
        let install_manager = InstallManager::new(
            Arc::clone(&install_store),
            Parser::with_registry(Arc::clone(&registry)),
            WorkflowExecutor::with_options(options),
        );
        Self {
            install_store,
            install_manager,
            registry,
        }
    }
}

impl Default for AppStateInner {
    fn default() -> Self {
        Self::new()
    }
}
