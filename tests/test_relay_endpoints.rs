//! End-to-end tests of the relay HTTP API against an in-process mock Ethereum node.

use authority_relay::domain::{AuthorityService, ReceiptPolicy, RelayMode};
use authority_relay::{transport, ContractHandle, EthClient};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value as JsonValue};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ACCOUNTS: [&str; 3] = [
    "0x627306090abab3a6e1400e9345bc60c78a8bef57",
    "0xf17f52151ebef6c7334fad080c5704d77216b732",
    "0xc5fdf4076b8f3a5357c5e395ab970b5b54098fef",
];

#[derive(Clone, Default)]
struct MockNode {
    sent: Arc<Mutex<Vec<JsonValue>>>,
    /// When set, every call answers with this JSON-RPC error message.
    fail_with: Option<&'static str>,
    /// When set, only `eth_sendTransaction` answers with this JSON-RPC error message.
    reject_send: Option<&'static str>,
}

async fn rpc_handler(State(node): State<MockNode>, Json(req): Json<JsonValue>) -> Json<JsonValue> {
    let id = req["id"].clone();
    if let Some(message) = node.fail_with {
        return Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": message }
        }));
    }

    let result = match req["method"].as_str().unwrap_or_default() {
        "net_listening" => json!(true),
        "eth_accounts" => json!(ACCOUNTS),
        "eth_sendTransaction" if node.reject_send.is_some() => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32000, "message": node.reject_send }
            }));
        }
        "eth_sendTransaction" => {
            node.sent.lock().unwrap().push(req["params"][0].clone());
            json!(format!("0x{}", "11".repeat(32)))
        }
        "eth_getTransactionReceipt" => json!({
            "transactionHash": req["params"][0],
            "blockHash": format!("0x{}", "22".repeat(32)),
            "blockNumber": "0x7",
            "from": ACCOUNTS[0],
            "to": "0x56f8195d5d8f271d3e9ed045e99a7d734608893d",
            "gasUsed": "0xb411",
            "status": "0x1",
            "logs": []
        }),
        other => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": format!("Method {} not found", other) }
            }))
        }
    };
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

fn lowercase(value: &JsonValue) -> String {
    value.as_str().unwrap_or_default().to_lowercase()
}

async fn spawn_mock_node(node: MockNode) -> String {
    let router = Router::new().route("/", post(rpc_handler)).with_state(node);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

/// A URL nothing listens on.
async fn dead_node_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

async fn spawn_relay(node_url: &str, mode: RelayMode) -> String {
    let artifact = concat!(env!("CARGO_MANIFEST_DIR"), "/contracts/Reputation.json");
    let contract =
        Arc::new(ContractHandle::load(artifact, "0x56f8195D5d8F271D3e9ED045E99A7d734608893D").unwrap());
    let node = Arc::new(EthClient::new(node_url, Some(Duration::from_secs(5))).unwrap());
    let authority = AuthorityService::new(node.clone(), contract, mode).with_receipt_policy(
        ReceiptPolicy {
            attempts: 3,
            interval: Duration::from_millis(10),
        },
    );
    let app_state = transport::http::AppState {
        authority: Arc::new(authority),
        node,
    };
    let router = transport::http::create_router(app_state);

    // Bind to an ephemeral port to avoid conflicts if an API server is already running.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn root_always_greets() {
    let base_url = spawn_relay(&dead_node_url().await, RelayMode::Diagnostic).await;
    let client = reqwest::Client::new();

    let plain = client.get(&base_url).send().await.unwrap();
    assert_eq!(plain.status(), 200);
    assert_eq!(plain.text().await.unwrap(), "Hiiiii!!!!!!!!");

    let noisy = client
        .get(&base_url)
        .header("x-anything", "1")
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(noisy.status(), 200);
}

#[tokio::test]
async fn diagnostic_returns_accounts_for_any_body() {
    let node_url = spawn_mock_node(MockNode::default()).await;
    let base_url = spawn_relay(&node_url, RelayMode::Diagnostic).await;
    let client = reqwest::Client::new();
    let url = format!("{}/add-authority-node", base_url);

    let expected = vec![
        "0x627306090abaB3A6e1400e9345bC60c78a8BEf57",
        "0xf17f52151EbEF6C7334FAD080c5704D77216b732",
        "0xC5fdf4076b8F3A5357c5E395ab970B5B54098Fef",
    ];

    let bodies = [
        json!({ "address": "0xf17f52151EbEF6C7334FAD080c5704D77216b732" }),
        json!({}),
        json!({ "address": 42 }),
        json!({ "address": "not an address" }),
        json!([]),
    ];
    for body in bodies {
        // Repeat each request: no state is carried between calls.
        for _ in 0..2 {
            let resp = client.post(&url).json(&body).send().await.unwrap();
            assert_eq!(resp.status(), 200, "body {}", body);
            let accounts: Vec<String> = resp.json().await.unwrap();
            assert_eq!(accounts, expected);
        }
    }

    let no_body = client.post(&url).send().await.unwrap();
    assert_eq!(no_body.status(), 200);
}

#[tokio::test]
async fn unreachable_node_yields_500() {
    let base_url = spawn_relay(&dead_node_url().await, RelayMode::Diagnostic).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let resp = client
            .post(format!("{}/add-authority-node", base_url))
            .json(&json!({ "address": ACCOUNTS[1] }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 500);
        let body: JsonValue = resp.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["kind"], "upstream_unavailable");
        assert!(!body["error"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn node_errors_are_not_leaked() {
    let node_url = spawn_mock_node(MockNode {
        fail_with: Some("db corrupted at /var/lib/ganache"),
        ..MockNode::default()
    })
    .await;
    let base_url = spawn_relay(&node_url, RelayMode::Diagnostic).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/add-authority-node", base_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let text = resp.text().await.unwrap();
    assert!(!text.is_empty());
    assert!(!text.contains("/var/lib/ganache"));

    let body: JsonValue = serde_json::from_str(&text).unwrap();
    assert_eq!(body["kind"], "node_rejected");
    assert_eq!(body["error"], "Node rejected the request");
}

#[tokio::test]
async fn health_reflects_node_reachability() {
    let client = reqwest::Client::new();

    let up = spawn_relay(&spawn_mock_node(MockNode::default()).await, RelayMode::Diagnostic).await;
    let resp = client.get(format!("{}/health", up)).send().await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: JsonValue = resp.json().await.unwrap();
    assert_eq!(body["data"]["status"], "ok");

    let down = spawn_relay(&dead_node_url().await, RelayMode::Diagnostic).await;
    let resp = client.get(format!("{}/health", down)).send().await.unwrap();
    assert_eq!(resp.status(), 503);
}

#[tokio::test]
async fn commit_mode_submits_add_authority_node() {
    let mock = MockNode::default();
    let node_url = spawn_mock_node(mock.clone()).await;
    let base_url = spawn_relay(&node_url, RelayMode::Commit).await;
    let client = reqwest::Client::new();
    let url = format!("{}/add-authority-node", base_url);

    let resp = client
        .post(&url)
        .json(&json!({ "address": "0xf17f52151EbEF6C7334FAD080c5704D77216b732" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let receipt: JsonValue = resp.json().await.unwrap();
    assert_eq!(receipt["status"], "0x1");
    assert_eq!(receipt["blockNumber"], "0x7");

    let sent = mock.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(lowercase(&sent[0]["from"]), ACCOUNTS[0]);
    assert_eq!(
        lowercase(&sent[0]["to"]),
        "0x56f8195d5d8f271d3e9ed045e99a7d734608893d"
    );
    assert_eq!(
        sent[0]["data"],
        "0xf907314d000000000000000000000000f17f52151ebef6c7334fad080c5704d77216b732"
    );
}

#[tokio::test]
async fn commit_mode_accepts_form_bodies() {
    let mock = MockNode::default();
    let node_url = spawn_mock_node(mock.clone()).await;
    let base_url = spawn_relay(&node_url, RelayMode::Commit).await;
    let client = reqwest::Client::new();
    let url = format!("{}/add-authority-node", base_url);

    let resp = client
        .post(&url)
        .form(&[("address", "0xf17f52151EbEF6C7334FAD080c5704D77216b732")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let receipt: JsonValue = resp.json().await.unwrap();
    assert_eq!(receipt["status"], "0x1");

    let bad_address = client
        .post(&url)
        .form(&[("address", "0x1234")])
        .send()
        .await
        .unwrap();
    assert_eq!(bad_address.status(), 400);

    let sent = mock.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0]["data"],
        "0xf907314d000000000000000000000000f17f52151ebef6c7334fad080c5704d77216b732"
    );
}

#[tokio::test]
async fn diagnostic_mode_accepts_form_bodies() {
    let node_url = spawn_mock_node(MockNode::default()).await;
    let base_url = spawn_relay(&node_url, RelayMode::Diagnostic).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/add-authority-node", base_url))
        .form(&[("address", "anything")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let accounts: Vec<String> = resp.json().await.unwrap();
    assert_eq!(accounts.len(), ACCOUNTS.len());
}

#[tokio::test]
async fn commit_mode_reports_contract_revert_as_rejection() {
    let node_url = spawn_mock_node(MockNode {
        reject_send: Some(
            "VM Exception while processing transaction: revert Ownable: caller is not the owner",
        ),
        ..MockNode::default()
    })
    .await;
    let base_url = spawn_relay(&node_url, RelayMode::Commit).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/add-authority-node", base_url))
        .json(&json!({ "address": ACCOUNTS[1] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 500);
    let body: JsonValue = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["kind"], "node_rejected");
    assert_eq!(body["error"], "Node rejected the request");
    assert!(!body.to_string().contains("Ownable"));
}

#[tokio::test]
async fn commit_mode_validates_input() {
    let mock = MockNode::default();
    let node_url = spawn_mock_node(mock.clone()).await;
    let base_url = spawn_relay(&node_url, RelayMode::Commit).await;
    let client = reqwest::Client::new();
    let url = format!("{}/add-authority-node", base_url);

    let bad_address = client
        .post(&url)
        .json(&json!({ "address": "0x1234" }))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_address.status(), 400);
    let body: JsonValue = bad_address.json().await.unwrap();
    assert_eq!(body["kind"], "validation");

    let missing = client.post(&url).json(&json!({})).send().await.unwrap();
    assert_eq!(missing.status(), 400);

    let malformed = client
        .post(&url)
        .header("content-type", "application/json")
        .body("{\"address\":")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), 422);

    assert!(mock.sent.lock().unwrap().is_empty());
}
