use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use rigger_core::error::ServerError;
use rigger_core::models::install::WorkflowPlan;
use rigger_core::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/explain", post(explain_workflow))
        .route("/commands", get(list_commands))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExplainRequest {
    workflow: String,
    #[serde(default)]
    params: serde_json::Value,
    name: Option<String>,
}

/// Parse a workflow and return its plan; nothing is executed.
async fn explain_workflow(
    State(state): State<AppState>,
    Json(body): Json<ExplainRequest>,
) -> Result<Json<WorkflowPlan>, ServerError> {
    let name = body.name.as_deref().unwrap_or("plan");
    state
        .install_manager
        .explain_plan(name, &body.workflow, &body.params)
        .map(Json)
}

async fn list_commands(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "commands": state.registry.commands() }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use rigger_core::state::AppStateInner;

    async fn call(request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let app = crate::app(Arc::new(AppStateInner::new()));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_explain_returns_plan() {
        let body = serde_json::json!({
            "workflow": r#"{"description": "demo", "commands": [
                // comment
                {"type": "sync", "name": "logger", "msg": "{{Greeting}}"}
            ]}"#,
            "params": {"Greeting": "hi"},
        });
        let (status, json) = call(
            Request::post("/api/workflows/explain")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["description"], "demo");
        assert!(json["plan"].as_str().unwrap().contains("SYNC Logger: hi"));
    }

    #[tokio::test]
    async fn test_explain_bad_template_is_400() {
        let body = serde_json::json!({"workflow": "{\"description\": \"{{Missing}}\", \"commands\": []}"});
        let (status, json) = call(
            Request::post("/api/workflows/explain")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("Template"));
    }

    #[tokio::test]
    async fn test_list_commands() {
        let (status, json) = call(Request::get("/api/workflows/commands").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let commands = json["commands"].as_array().unwrap();
        assert!(commands.iter().any(|c| c["type"] == "async" && c["name"] == "sleep"));
    }
}
