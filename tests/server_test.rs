//! Integration tests for the HTTP bridge server.
//! Spins up the axum server on a random port and speaks JSON-RPC over HTTP.

use nexus_bridge::config::StaticSettings;
use nexus_bridge::{server, AppContext};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;

/// Find a free local port by binding to port 0.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Start a bridge on a random port over a temp workspace; return its base URL.
async fn start_test_bridge(dir: &TempDir) -> String {
    let port = find_free_port();
    let settings = StaticSettings::rooted(dir.path());
    let ctx = Arc::new(AppContext::new(settings));

    tokio::spawn(server::start_server(ctx, port));

    // Wait for the listener to come up.
    let url = format!("http://127.0.0.1:{port}");
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            return url;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("bridge did not start on port {port}");
}

async fn call(url: &str, body: Value) -> Value {
    reqwest::Client::new()
        .post(format!("{url}/mcp"))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn health_reports_status_and_workspace() {
    let dir = tempfile::tempdir().unwrap();
    let url = start_test_bridge(&dir).await;

    let body: Value = reqwest::get(format!("{url}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["workspace"], dir.path().to_str().unwrap());
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn capability_call_echoes_string_id() {
    let dir = tempfile::tempdir().unwrap();
    let url = start_test_bridge(&dir).await;

    let resp = call(
        &url,
        json!({
            "jsonrpc": "2.0",
            "id": "req-abc-1",
            "method": "tools/call",
            "params": { "capability": "get_system_info" }
        }),
    )
    .await;

    assert_eq!(resp["jsonrpc"], "2.0");
    assert_eq!(resp["id"], "req-abc-1");
    assert_eq!(resp["result"]["content"][0]["type"], "text");
    assert!(resp.get("error").is_none());
}

#[tokio::test]
async fn error_response_echoes_integer_id() {
    let dir = tempfile::tempdir().unwrap();
    let url = start_test_bridge(&dir).await;

    let resp = call(
        &url,
        json!({
            "jsonrpc": "2.0",
            "id": 42,
            "method": "tools/call",
            "params": { "capability": "no_such_capability" }
        }),
    )
    .await;

    assert_eq!(resp["id"], 42);
    assert_eq!(resp["error"]["code"], -32601);
    assert!(resp["error"]["message"]
        .as_str()
        .unwrap()
        .contains("no_such_capability"));
    assert!(resp.get("result").is_none());
}

#[tokio::test]
async fn non_envelope_body_yields_invalid_request_with_null_id() {
    let dir = tempfile::tempdir().unwrap();
    let url = start_test_bridge(&dir).await;

    let resp = call(&url, json!({"foo": "bar"})).await;
    assert_eq!(resp["id"], Value::Null);
    assert_eq!(resp["error"]["code"], -32600);
}

#[tokio::test]
async fn non_envelope_body_still_echoes_a_present_id() {
    let dir = tempfile::tempdir().unwrap();
    let url = start_test_bridge(&dir).await;

    let resp = call(&url, json!({"id": 5, "foo": true})).await;
    assert_eq!(resp["id"], 5);
    assert_eq!(resp["error"]["code"], -32600);
}

#[tokio::test]
async fn write_and_read_over_the_wire() {
    let dir = tempfile::tempdir().unwrap();
    let url = start_test_bridge(&dir).await;

    let write = call(
        &url,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {
                "capability": "write_file",
                "arguments": { "filepath": "hello.txt", "content": "over the wire" }
            }
        }),
    )
    .await;
    assert!(write["result"]["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("Successfully wrote to"));

    let read = call(
        &url,
        json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {
                "capability": "read_file",
                "arguments": { "filepath": "hello.txt" }
            }
        }),
    )
    .await;
    assert_eq!(read["id"], 2);
    assert_eq!(read["result"]["content"][0]["text"], "over the wire");
}

#[tokio::test]
async fn missing_argument_over_the_wire_is_invalid_params() {
    let dir = tempfile::tempdir().unwrap();
    let url = start_test_bridge(&dir).await;

    let resp = call(
        &url,
        json!({
            "jsonrpc": "2.0",
            "id": "m1",
            "method": "tools/call",
            "params": { "capability": "read_file" }
        }),
    )
    .await;
    assert_eq!(resp["error"]["code"], -32602);
    assert!(resp["error"]["message"]
        .as_str()
        .unwrap()
        .contains("filepath"));
}
