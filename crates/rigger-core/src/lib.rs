//! Rigger Core — Transport-agnostic workflow engine for cluster installs.
//!
//! This crate contains the workflow definition language, the command
//! engine, and the install progress tracking. It has **no HTTP framework
//! dependency** by default, making it suitable for use in:
//!
//! - HTTP servers (via `rigger-server`)
//! - CLI tools (via `rigger-cli`)
//! - Embedding in other control-plane services
//!
//! # Architecture
//!
//! ```text
//! source + params ──► Parser ──► CommandRegistry ──► Workflow
//!                                                      │
//!                            InstallManager ──► WorkflowExecutor
//!                                  │
//!                             InstallStore ◄── progress queries
//! ```
//!
//! # Feature Flags
//!
//! - `axum` — Enables `IntoResponse` impl on `ServerError` for use in axum handlers.

pub mod error;
pub mod models;
pub mod orchestration;
pub mod rpc;
pub mod state;
pub mod store;
pub mod workflow;

// Convenience re-exports
pub use error::{CommandError, ServerError, WorkflowError};
pub use state::{AppState, AppStateInner};
