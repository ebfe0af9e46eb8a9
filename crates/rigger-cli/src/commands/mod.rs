//! CLI command implementations.
//!
//! Each submodule corresponds to a top-level CLI command and reuses
//! the rigger-core engine through `AppState`.

pub mod rpc;
pub mod server;
pub mod workflow;

use std::sync::Arc;

use rigger_core::state::{AppState, AppStateInner};

/// Build a fresh in-process `AppState` for commands that do not need a server.
pub fn init_state() -> AppState {
    Arc::new(AppStateInner::new())
}

/// Pretty-print a JSON value to stdout.
pub fn print_json(value: &serde_json::Value) {
    println!(
        "{}",
        serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
    );
}
