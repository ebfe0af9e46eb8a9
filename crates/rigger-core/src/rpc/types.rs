//! JSON-RPC 2.0 protocol types.
//!
//! Kept free of any HTTP framework so the same envelopes serve `/api/rpc`
//! and the CLI's in-process `rigger rpc`.

use serde::{Deserialize, Serialize};

/// JSON-RPC 2.0 request object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Must be "2.0".
    pub jsonrpc: String,
    /// Request identifier — number or string. `None` for notifications.
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    /// Method name, e.g. `"installs.start"`.
    pub method: String,
    /// Named parameters such as `{"installId": "..."}`. Omitted means `{}`.
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response; exactly one of `result` / `error` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Always "2.0".
    pub jsonrpc: String,
    /// Echoed from the request, `null` when the request could not be parsed.
    pub id: Option<serde_json::Value>,
    /// Method result, e.g. an install's progress record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// One of the codes below.
    pub code: i64,
    /// Human-readable reason, e.g. `"Not found: Install not found: abc"`.
    pub message: String,
}

// ---------------------------------------------------------------------------
// Standard JSON-RPC 2.0 error codes
// ---------------------------------------------------------------------------

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

// Application-defined error codes (server range: -32000 to -32099)
/// Unknown install id.
pub const NOT_FOUND: i64 = -32001;
/// Workflow failed to render, decode or resolve a command.
pub const BAD_REQUEST: i64 = -32002;
/// Install id already in use.
pub const CONFLICT: i64 = -32003;

impl JsonRpcResponse {
    /// Build a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Build an error response.
    pub fn error(id: Option<serde_json::Value>, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
            }),
        }
    }
}
