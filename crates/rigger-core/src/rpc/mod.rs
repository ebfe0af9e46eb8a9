//! Transport-agnostic JSON-RPC 2.0 layer for the install control plane.
//!
//! The same router backs every transport:
//!
//! - **HTTP** — via the axum endpoint at `/api/rpc` in `rigger-server`
//! - **CLI** — in-process dispatch with `rigger rpc`
//!
//! # Example
//!
//! ```ignore
//! use rigger_core::rpc::RpcRouter;
//!
//! let router = RpcRouter::new(app_state);
//! let response = router.handle_request(r#"{
//!     "jsonrpc": "2.0",
//!     "id": 1,
//!     "method": "installs.progress",
//!     "params": { "installId": "cluster-01" }
//! }"#).await;
//! ```

pub mod error;
pub mod methods;
pub mod router;
pub mod types;

pub use error::RpcError;
pub use router::RpcRouter;
pub use types::{JsonRpcRequest, JsonRpcResponse};
