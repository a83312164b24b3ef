//! HTTP transport against an in-process fake CometBFT node.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use axum::{Json, Router, extract::State, routing::post};
use dango_core::{
    Addr, Message, Query, QueryResponse, Tx,
    codec::{decode_base64, decode_hex, encode_base64, encode_hex, sha256},
};
use dango_rpc::{BatchConfig, HttpConfig, HttpTransport, JsonRpcClient, RpcError, Transport};
use serde_json::{Value, json};

const REJECTED_SENDER: Addr = Addr::from_inner([0xee; 20]);

#[derive(Default)]
struct FakeNode {
    posts: AtomicUsize,
    batch_sizes: Mutex<Vec<usize>>,
    heights: Mutex<Vec<String>>,
}

impl FakeNode {
    fn answer(&self, req: &Value) -> Value {
        let id = req["id"].clone();
        let params = &req["params"];
        match req["method"].as_str() {
            Some("abci_query") => {
                self.heights.lock().unwrap().push(params["height"].as_str().unwrap().to_string());
                let path = params["path"].as_str().unwrap();
                let response = if path == "/fail" {
                    json!({ "code": 1, "codespace": "app", "log": "boom", "height": "9" })
                } else {
                    let data = decode_hex(params["data"].as_str().unwrap()).unwrap();
                    let query: Query = serde_json::from_slice(&data).unwrap();
                    let body = match query {
                        Query::Info {} => json!({ "info": { "chain_id": "fake-1" } }),
                        other => json!({ "wasm_smart": { "echo": other.kind() } }),
                    };
                    json!({
                        "code": 0,
                        "value": encode_base64(serde_json::to_vec(&body).unwrap()),
                        "height": "9",
                    })
                };
                json!({ "jsonrpc": "2.0", "id": id, "result": { "response": response } })
            },
            Some("broadcast_tx_sync") => {
                let bytes = decode_base64(params["tx"].as_str().unwrap()).unwrap();
                let tx: Tx = serde_json::from_slice(&bytes).unwrap();
                let (code, codespace, log) = if tx.sender == REJECTED_SENDER {
                    (7, "auth", "sequence mismatch")
                } else {
                    (0, "", "")
                };
                let hash = encode_hex(sha256(&bytes)).to_uppercase();
                json!({
                    "jsonrpc": "2.0",
                    "id": id,
                    "result": { "code": code, "codespace": codespace, "log": log, "hash": hash },
                })
            },
            Some("misnumbered") => json!({ "jsonrpc": "2.0", "id": 424_242, "result": {} }),
            _ => json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": "Method not found" },
            }),
        }
    }
}

async fn rpc_handler(State(node): State<Arc<FakeNode>>, Json(body): Json<Value>) -> Json<Value> {
    node.posts.fetch_add(1, Ordering::SeqCst);
    match body {
        Value::Array(requests) => {
            node.batch_sizes.lock().unwrap().push(requests.len());
            Json(Value::Array(requests.iter().map(|req| node.answer(req)).collect()))
        },
        single => Json(node.answer(&single)),
    }
}

async fn spawn_node() -> (String, Arc<FakeNode>) {
    let node = Arc::new(FakeNode::default());
    let app = Router::new().route("/", post(rpc_handler)).with_state(node.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    (url, node)
}

fn batched(max_size: usize) -> HttpConfig {
    HttpConfig {
        batch: Some(BatchConfig { max_size, max_wait: Duration::from_millis(50) }),
        ..Default::default()
    }
}

fn info_query() -> Vec<u8> {
    serde_json::to_vec(&Query::info()).unwrap()
}

fn sample_tx(sender: Addr) -> Tx {
    Tx::unsigned(sender, 100_000, vec![Message::upload(vec![1u8, 2, 3])], json!({}))
}

#[tokio::test]
async fn test_query_decodes_value() {
    let (url, node) = spawn_node().await;
    let transport = HttpTransport::new(url, HttpConfig::default()).unwrap();

    let res = transport.query("/app", &info_query(), 0, false).await.unwrap();
    assert_eq!(res.code, 0);
    assert_eq!(res.height, 9);

    let body: Value = serde_json::from_slice(&res.value).unwrap();
    let info = QueryResponse::from_json(body).unwrap().as_info().unwrap();
    assert_eq!(info.chain_id, "fake-1");

    // Height 0 goes out verbatim, as a string.
    assert_eq!(*node.heights.lock().unwrap(), vec!["0".to_string()]);
}

#[tokio::test]
async fn test_non_zero_code_is_chain_rejection() {
    let (url, _node) = spawn_node().await;
    let transport = HttpTransport::new(url, HttpConfig::default()).unwrap();

    let err = transport.query("/fail", &[], 0, false).await.unwrap_err();
    match err {
        RpcError::ChainRejection { codespace, code, log } => {
            assert_eq!((codespace.as_str(), code, log.as_str()), ("app", 1, "boom"));
        },
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_json_rpc_error_is_not_chain_rejection() {
    let (url, _node) = spawn_node().await;
    let client = JsonRpcClient::new(url, HttpConfig::default()).unwrap();

    let err = client.call("no_such_method", json!({})).await.unwrap_err();
    assert!(matches!(err, RpcError::JsonRpc { code: -32601, .. }));
    assert!(!err.is_chain_rejection());
}

#[tokio::test]
async fn test_broadcast_returns_node_hash() {
    let (url, _node) = spawn_node().await;
    let transport = HttpTransport::new(url, HttpConfig::default()).unwrap();

    let tx = sample_tx(Addr::from_inner([1; 20]));
    let hash = transport.broadcast(&tx).await.unwrap();
    assert_eq!(hash, tx.tx_hash().unwrap());

    let err = transport.broadcast(&sample_tx(REJECTED_SENDER)).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "chain rejected the request! codespace: auth, code: 7, log: sequence mismatch"
    );
}

#[tokio::test]
async fn test_concurrent_calls_share_one_batch() {
    let (url, node) = spawn_node().await;
    let transport = HttpTransport::new(url, batched(20)).unwrap();
    let data = info_query();

    let (a, b, c) = tokio::join!(
        transport.query("/app", &data, 0, false),
        transport.query("/app", &data, 0, false),
        transport.query("/app", &data, 0, false),
    );
    for res in [a, b, c] {
        assert_eq!(res.unwrap().height, 9);
    }

    assert_eq!(node.posts.load(Ordering::SeqCst), 1);
    assert_eq!(*node.batch_sizes.lock().unwrap(), vec![3]);
}

#[tokio::test]
async fn test_full_batch_starts_a_new_one() {
    let (url, node) = spawn_node().await;
    let transport = HttpTransport::new(url, batched(2)).unwrap();
    let data = info_query();

    let results = tokio::join!(
        transport.query("/app", &data, 0, false),
        transport.query("/app", &data, 0, false),
        transport.query("/app", &data, 0, false),
        transport.query("/app", &data, 0, false),
        transport.query("/app", &data, 0, false),
    );
    for res in [results.0, results.1, results.2, results.3, results.4] {
        assert!(res.is_ok());
    }

    assert_eq!(node.posts.load(Ordering::SeqCst), 3);
    let mut sizes = node.batch_sizes.lock().unwrap().clone();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 2, 2]);
}

#[tokio::test]
async fn test_batched_errors_stay_with_their_call() {
    let (url, node) = spawn_node().await;
    let transport = HttpTransport::new(url.clone(), batched(20)).unwrap();
    let data = info_query();
    let tx = sample_tx(Addr::from_inner([2; 20]));

    let (good, rejected, broadcast) = tokio::join!(
        transport.query("/app", &data, 0, false),
        transport.query("/fail", &[], 0, false),
        transport.broadcast(&tx),
    );
    assert!(good.is_ok());
    assert!(rejected.unwrap_err().is_chain_rejection());
    assert!(broadcast.is_ok());
    assert_eq!(*node.batch_sizes.lock().unwrap(), vec![3]);

    let client = JsonRpcClient::new(url, batched(20)).unwrap();
    let (unknown, known) = tokio::join!(
        client.call("no_such_method", json!({})),
        client.call(
            "abci_query",
            json!({ "path": "/fail", "data": "", "prove": false, "height": "0" }),
        ),
    );
    assert!(matches!(unknown, Err(RpcError::JsonRpc { .. })));
    assert!(known.is_ok());
}

#[tokio::test]
async fn test_response_with_foreign_id_is_malformed() {
    let (url, _node) = spawn_node().await;

    let single = JsonRpcClient::new(url.clone(), HttpConfig::default()).unwrap();
    let err = single.call("misnumbered", json!({})).await.unwrap_err();
    assert!(matches!(err, RpcError::Malformed { .. }), "unexpected error: {err:?}");

    let batching = JsonRpcClient::new(url, batched(20)).unwrap();
    let err = batching.call("misnumbered", json!({})).await.unwrap_err();
    assert!(matches!(err, RpcError::Malformed { .. }), "unexpected error: {err:?}");
}
