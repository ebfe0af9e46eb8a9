//! Transport-agnostic JSON-RPC 2.0 dispatcher.
//!
//! `RpcRouter` takes an `AppState` and dispatches incoming JSON-RPC requests
//! to the appropriate method handler. It is free of any HTTP dependency so
//! it can be driven from an axum handler or straight from the CLI.

use serde::Serialize;

use crate::state::AppState;

use super::error::RpcError;
use super::methods;
use super::types::*;

const SERIALIZE_FAILURE: &str =
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Failed to serialize response"},"id":null}"#;

#[derive(Clone)]
pub struct RpcRouter {
    state: AppState,
}

impl RpcRouter {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Handle a raw JSON string (single request or batch) and return the
    /// serialized response.
    pub async fn handle_request(&self, raw: &str) -> String {
        if let Ok(batch) = serde_json::from_str::<Vec<JsonRpcRequest>>(raw) {
            let mut responses = Vec::with_capacity(batch.len());
            for req in batch {
                responses.push(self.dispatch(req).await);
            }
            return serde_json::to_string(&responses).unwrap_or_else(|_| SERIALIZE_FAILURE.into());
        }

        let request: JsonRpcRequest = match serde_json::from_str(raw) {
            Ok(req) => req,
            Err(e) => {
                return serde_json::to_string(&JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Parse error: {}", e),
                ))
                .unwrap_or_else(|_| SERIALIZE_FAILURE.into());
            }
        };

        let response = self.dispatch(request).await;
        serde_json::to_string(&response).unwrap_or_else(|_| SERIALIZE_FAILURE.into())
    }

    /// Handle a pre-parsed `serde_json::Value` (e.g. from axum's `Json`).
    pub async fn handle_value(&self, value: serde_json::Value) -> serde_json::Value {
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(req) => req,
            Err(e) => {
                return serde_json::to_value(JsonRpcResponse::error(
                    None,
                    PARSE_ERROR,
                    format!("Invalid request: {}", e),
                ))
                .unwrap_or_default();
            }
        };

        let response = self.dispatch(request).await;
        serde_json::to_value(response).unwrap_or_default()
    }

    pub async fn dispatch(&self, req: JsonRpcRequest) -> JsonRpcResponse {
        if req.jsonrpc != "2.0" {
            return JsonRpcResponse::error(
                req.id,
                INVALID_REQUEST,
                "Invalid JSON-RPC version, expected \"2.0\"",
            );
        }

        let id = req.id.clone();
        let params = req
            .params
            .unwrap_or(serde_json::Value::Object(Default::default()));

        tracing::debug!("[Rpc] {}", req.method);
        match self.route(&req.method, params).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => {
                tracing::debug!("[Rpc] {} failed: {}", req.method, err);
                err.to_response(id)
            }
        }
    }

    async fn route(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, RpcError> {
        match method {
            // ----- Installs -----
            "installs.start" => {
                let p = parse_params(params)?;
                to_json(methods::installs::start(&self.state, p).await?)
            }
            "installs.progress" => {
                let p = parse_params(params)?;
                to_json(methods::installs::progress(&self.state, p).await?)
            }
            "installs.remove" => {
                let p = parse_params(params)?;
                to_json(methods::installs::remove(&self.state, p).await?)
            }
            "installs.list" => to_json(methods::installs::list(&self.state).await?),

            // ----- Workflows -----
            "workflows.explain" => {
                let p = parse_params(params)?;
                to_json(methods::workflows::explain(&self.state, p).await?)
            }
            "workflows.commands" => to_json(methods::workflows::commands(&self.state).await?),

            _ => Err(RpcError::MethodNotFound(format!(
                "Method not found: {}",
                method
            ))),
        }
    }

    /// All supported RPC method names.
    pub fn method_list(&self) -> Vec<&'static str> {
        vec![
            "installs.start",
            "installs.progress",
            "installs.remove",
            "installs.list",
            "workflows.explain",
            "workflows.commands",
        ]
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, RpcError> {
    serde_json::from_value(value)
        .map_err(|e| RpcError::InvalidParams(format!("Invalid params: {}", e)))
}

fn to_json<T: Serialize>(result: T) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(result).map_err(|e| RpcError::Internal(format!("Cannot serialize result: {}", e)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::state::AppStateInner;

    fn router() -> RpcRouter {
        RpcRouter::new(Arc::new(AppStateInner::new()))
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let resp = router()
            .handle_value(json!({"jsonrpc": "2.0", "id": 1, "method": "installs.pause"}))
            .await;
        assert_eq!(resp["error"]["code"], METHOD_NOT_FOUND);
        assert_eq!(resp["id"], 1);
    }

    #[tokio::test]
    async fn test_wrong_version() {
        let resp = router()
            .handle_value(json!({"jsonrpc": "1.0", "id": 1, "method": "installs.list"}))
            .await;
        assert_eq!(resp["error"]["code"], INVALID_REQUEST);
    }

    #[tokio::test]
    async fn test_parse_error() {
        let raw = router().handle_request("{not json").await;
        let resp: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(resp["error"]["code"], PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_progress_unknown_install_is_not_found() {
        let resp = router()
            .handle_value(json!({
                "jsonrpc": "2.0", "id": 2, "method": "installs.progress",
                "params": {"installId": "missing"}
            }))
            .await;
        assert_eq!(resp["error"]["code"], NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_params_are_invalid() {
        let resp = router()
            .handle_value(json!({"jsonrpc": "2.0", "id": 3, "method": "installs.remove"}))
            .await;
        assert_eq!(resp["error"]["code"], INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_bad_workflow_is_bad_request() {
        let resp = router()
            .handle_value(json!({
                "jsonrpc": "2.0", "id": 4, "method": "installs.start",
                "params": {"workflow": "{\"commands\": [{\"type\": \"sync\", \"name\": \"nope\"}]}"}
            }))
            .await;
        assert_eq!(resp["error"]["code"], BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_batch_request() {
        let raw = router()
            .handle_request(
                r#"[{"jsonrpc":"2.0","id":1,"method":"installs.list"},
                    {"jsonrpc":"2.0","id":2,"method":"workflows.commands"}]"#,
            )
            .await;
        let resp: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(resp.as_array().unwrap().len(), 2);
        assert!(resp[0]["result"]["installs"].as_array().unwrap().is_empty());
        assert!(resp[1]["result"]["commands"]
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["type"] == "sync" && c["name"] == "try"));
    }
}
