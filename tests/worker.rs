use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::bail;
use tokio::net::TcpListener;

use pod_worker::serverless::{build_router, Handler, Job};

/// Handler used across the tests: requires a `text` input field.
fn echo_handler() -> Handler {
    Arc::new(|job: Job| match job.input.get("text").and_then(|t| t.as_str()) {
        Some(text) => Ok(text.to_string()),
        None => bail!("Missing required input field 'text'"),
    })
}

/// Start a worker on a random port and return the address
async fn start_test_server(handler: Handler) -> SocketAddr {
    let app = build_router(handler);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

#[tokio::test]
async fn test_health_endpoint() {
    let addr = start_test_server(echo_handler()).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_run_returns_completed_result() {
    let addr = start_test_server(echo_handler()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/run", addr))
        .json(&serde_json::json!({"id": "job-1", "input": {"text": "hi"}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], "job-1");
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["output"], "hi");
}

#[tokio::test]
async fn test_job_id_defaults_when_absent() {
    let addr = start_test_server(echo_handler()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/run", addr))
        .json(&serde_json::json!({"input": {"text": "hi"}}))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], "local");
}

#[tokio::test]
async fn test_handler_failure_propagates_as_server_error() {
    let addr = start_test_server(echo_handler()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/run", addr))
        .json(&serde_json::json!({"input": {}}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("text"));
}

#[tokio::test]
async fn test_null_input_is_rejected() {
    let addr = start_test_server(echo_handler()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/run", addr))
        .json(&serde_json::json!({"input": null}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_missing_input_field_is_rejected() {
    let addr = start_test_server(echo_handler()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/run", addr))
        .json(&serde_json::json!({"id": "job-2"}))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_greeting_template_contract() {
    let handler: Handler = Arc::new(|job: Job| {
        let name = job
            .input
            .get("name")
            .and_then(|n| n.as_str())
            .unwrap_or("World");
        Ok(format!("Hello, {name}!"))
    });
    let addr = start_test_server(handler).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/run", addr))
        .json(&serde_json::json!({"input": {}}))
        .send()
        .await
        .unwrap();

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["output"], "Hello, World!");
}
