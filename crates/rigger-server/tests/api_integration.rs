//! End-to-end tests against a real listening server.

use std::net::SocketAddr;
use std::time::Duration;

use rigger_core::workflow::poll::poll_until;
use rigger_server::{create_app_state, start_server_with_state, ServerConfig};
use serde_json::{json, Value};

async fn spawn_server() -> SocketAddr {
    let config = ServerConfig {
        port: 0,
        ..ServerConfig::default()
    };
    let state = create_app_state(&config);
    start_server_with_state(config, state).await.unwrap()
}

const INSTALL_WORKFLOW: &str = r#"
{
 "description": "Install {{InstallRequest.ClusterId}}",
 "commands": [
  {"type": "sync", "name": "logger", "msg": "installing {{InstallRequest.InstallId}}"}
  {{#each InstallRequest.Nodes}}
  ,{"type": "async", "name": "sleep", "duration": "0"}
  {{/each}}
 ]
}
"#;

async fn wait_for_terminal(client: &reqwest::Client, base: &str, id: &str) -> Value {
    let url = format!("{}/api/installs/{}", base, id);
    poll_until(Duration::from_millis(20), Duration::from_secs(10), || {
        let client = client.clone();
        let url = url.clone();
        async move {
            let Ok(resp) = client.get(&url).send().await else {
                return false;
            };
            let Ok(body) = resp.json::<Value>().await else {
                return false;
            };
            body["state"] == "FINISHED" || body["state"] == "ERROR"
        }
    })
    .await
    .unwrap();
    client.get(&url).send().await.unwrap().json().await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let addr = spawn_server().await;
    let body: Value = reqwest::get(format!("http://{}/api/health", addr))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_install_lifecycle() {
    let addr = spawn_server().await;
    let base = format!("http://{}", addr);
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/installs", base))
        .json(&json!({
            "installId": "cluster-install-1",
            "workflow": INSTALL_WORKFLOW,
            "params": {"InstallRequest": {
                "InstallId": "cluster-install-1",
                "ClusterId": "c-1",
                "Nodes": ["10.0.0.1", "10.0.0.2"]
            }}
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::ACCEPTED);
    let started: Value = resp.json().await.unwrap();
    assert_eq!(started["installId"], "cluster-install-1");

    let state = wait_for_terminal(&client, &base, "cluster-install-1").await;
    assert_eq!(state["state"], "FINISHED");
    assert_eq!(state["totalCommands"], 3);
    assert_eq!(state["completedCommands"], 3);

    let listed: Value = client
        .get(format!("{}/api/installs", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["installs"].as_array().unwrap().len(), 1);

    let resp = client
        .delete(format!("{}/api/installs/cluster-install-1", base))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());

    let resp = client
        .get(format!("{}/api/installs/cluster-install-1", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failing_install_reports_error() {
    let addr = spawn_server().await;
    let base = format!("http://{}", addr);
    let client = reqwest::Client::new();

    let started: Value = client
        .post(format!("{}/api/installs", base))
        .json(&json!({
            "workflow": r#"{"description": "broken", "commands": [
                {"type": "async", "name": "fail"},
                {"type": "sync", "name": "logger", "msg": "after"}
            ]}"#
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = started["installId"].as_str().unwrap().to_string();

    let state = wait_for_terminal(&client, &base, &id).await;
    assert_eq!(state["state"], "ERROR");
    assert!(state["lastError"].as_str().unwrap().contains("ASYNC Fail"));
}

#[tokio::test]
async fn test_rejected_install_is_400() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let resp = client
        .post(format!("http://{}/api/installs", addr))
        .json(&json!({
            "installId": "rejected",
            "workflow": r#"{"commands": [{"type": "sync", "name": "installIstio"}]}"#
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);

    let resp = client
        .get(format!("http://{}/api/installs/rejected", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rpc_endpoint() {
    let addr = spawn_server().await;
    let client = reqwest::Client::new();
    let body: Value = client
        .post(format!("http://{}/api/rpc", addr))
        .json(&json!({
            "jsonrpc": "2.0", "id": 7, "method": "installs.progress",
            "params": {"installId": "nope"}
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["id"], 7);
    assert_eq!(body["error"]["code"], -32001);
}
