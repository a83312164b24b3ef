//! CometBFT RPC methods
//!
//! `abci_query` carries its data as hex and its height as a decimal string;
//! the node answers with base64 key/value. `broadcast_tx_sync` carries the
//! transaction bytes as base64.

use async_trait::async_trait;
use dango_core::{
    Hash256, Tx,
    codec::{decode_base64, encode_base64, encode_hex},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    client::{HttpConfig, JsonRpcClient},
    error::RpcError,
    transport::{AbciQuery, Transport},
};

/// [`Transport`] backed by a CometBFT JSON-RPC endpoint.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    rpc: JsonRpcClient,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, config: HttpConfig) -> Result<Self, RpcError> {
        Ok(Self { rpc: JsonRpcClient::new(url, config)? })
    }

    pub const fn from_client(rpc: JsonRpcClient) -> Self {
        Self { rpc }
    }

    pub const fn rpc(&self) -> &JsonRpcClient {
        &self.rpc
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn query(
        &self,
        path: &str,
        data: &[u8],
        height: u64,
        prove: bool,
    ) -> Result<AbciQuery, RpcError> {
        let params = abci_query_params(path, data, height, prove);
        let result = self.rpc.call("abci_query", params).await?;
        parse_abci_query(result)
    }

    async fn broadcast(&self, tx: &Tx) -> Result<Hash256, RpcError> {
        let bytes = tx.to_canonical_bytes().map_err(|err| RpcError::Encode(err.to_string()))?;
        debug!(target: "dango::rpc", sender = %tx.sender, size = bytes.len(), "broadcasting tx");
        let result = self.rpc.call("broadcast_tx_sync", broadcast_params(&bytes)).await?;
        parse_broadcast(result)
    }
}

pub(crate) fn abci_query_params(path: &str, data: &[u8], height: u64, prove: bool) -> Value {
    json!({
        "path": path,
        "data": encode_hex(data),
        "prove": prove,
        "height": height.to_string(),
    })
}

pub(crate) fn broadcast_params(tx_bytes: &[u8]) -> Value {
    json!({ "tx": encode_base64(tx_bytes) })
}

/// CometBFT encodes 64-bit integers as strings; accept both.
#[derive(Deserialize)]
#[serde(untagged)]
enum Int {
    Num(i64),
    Str(String),
}

impl Int {
    fn parse(field: &str, value: Option<Self>, body: &Value) -> Result<i64, RpcError> {
        match value {
            None => Ok(0),
            Some(Self::Num(n)) => Ok(n),
            Some(Self::Str(s)) if s.is_empty() => Ok(0),
            Some(Self::Str(s)) => {
                s.parse()
                    .map_err(|_| RpcError::malformed(format!("bad integer in `{field}`"), body))
            },
        }
    }
}

#[derive(Deserialize)]
struct RawAbciQuery {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    log: String,
    #[serde(default)]
    info: String,
    #[serde(default)]
    index: Option<Int>,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    height: Option<Int>,
    #[serde(default)]
    codespace: String,
}

#[derive(Deserialize)]
struct RawAbciQueryResult {
    response: RawAbciQuery,
}

pub(crate) fn parse_abci_query(result: Value) -> Result<AbciQuery, RpcError> {
    let raw: RawAbciQueryResult =
        serde_json::from_value(result.clone()).map_err(|err| RpcError::malformed(err, &result))?;
    let raw = raw.response;

    if raw.code != 0 {
        return Err(RpcError::ChainRejection {
            codespace: raw.codespace,
            code: raw.code,
            log: raw.log,
        });
    }

    let decode = |field: &str, encoded: Option<String>| match encoded.as_deref() {
        None | Some("") => Ok(Vec::new()),
        Some(s) => decode_base64(s)
            .map_err(|err| RpcError::malformed(format!("`{field}` is not base64: {err}"), &result)),
    };

    let height = Int::parse("height", raw.height, &result)?;
    Ok(AbciQuery {
        code: raw.code,
        index: Int::parse("index", raw.index, &result)?,
        height: u64::try_from(height)
            .map_err(|_| RpcError::malformed("negative height", &result))?,
        key: decode("key", raw.key)?,
        value: decode("value", raw.value)?,
        log: raw.log,
        info: raw.info,
        codespace: raw.codespace,
    })
}

#[derive(Deserialize)]
struct RawBroadcast {
    #[serde(default)]
    code: u32,
    #[serde(default)]
    codespace: String,
    #[serde(default)]
    log: String,
    hash: String,
}

pub(crate) fn parse_broadcast(result: Value) -> Result<Hash256, RpcError> {
    let raw: RawBroadcast =
        serde_json::from_value(result.clone()).map_err(|err| RpcError::malformed(err, &result))?;

    if raw.code != 0 {
        return Err(RpcError::ChainRejection {
            codespace: raw.codespace,
            code: raw.code,
            log: raw.log,
        });
    }

    raw.hash.parse().map_err(|err| RpcError::malformed(format!("bad tx hash: {err}"), &result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abci_query_params() {
        assert_eq!(
            abci_query_params("/app", b"{}", 0, false),
            json!({ "path": "/app", "data": "7b7d", "prove": false, "height": "0" })
        );
        assert_eq!(abci_query_params("/store", &[], 42, true)["height"], json!("42"));
        assert_eq!(abci_query_params("/store", &[], 42, true)["data"], json!(""));
    }

    #[test]
    fn test_broadcast_params() {
        assert_eq!(broadcast_params(b"{\"a\":1}"), json!({ "tx": "eyJhIjoxfQ==" }));
    }

    #[test]
    fn test_parse_abci_query_ok() {
        let query = parse_abci_query(json!({
            "response": {
                "code": 0,
                "log": "",
                "info": "",
                "index": "0",
                "key": "a2V5",
                "value": "dmFsdWU=",
                "height": "1234",
                "codespace": "",
            }
        }))
        .unwrap();
        assert_eq!(query.key, b"key");
        assert_eq!(query.value, b"value");
        assert_eq!(query.height, 1234);
    }

    #[test]
    fn test_parse_abci_query_missing_fields() {
        let query = parse_abci_query(json!({ "response": { "height": 7 } })).unwrap();
        assert_eq!(query, AbciQuery { height: 7, ..Default::default() });
    }

    #[test]
    fn test_parse_abci_query_rejection() {
        let err = parse_abci_query(json!({
            "response": { "code": 1, "codespace": "app", "log": "contract not found" }
        }))
        .unwrap_err();
        match err {
            RpcError::ChainRejection { codespace, code, log } => {
                assert_eq!(codespace, "app");
                assert_eq!(code, 1);
                assert_eq!(log, "contract not found");
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_abci_query_malformed() {
        assert!(matches!(parse_abci_query(json!({ "nope": 1 })), Err(RpcError::Malformed { .. })));
        assert!(matches!(
            parse_abci_query(json!({ "response": { "value": "%%%" } })),
            Err(RpcError::Malformed { .. })
        ));
    }

    #[test]
    fn test_parse_broadcast() {
        let hash = "A".repeat(64);
        let ok = parse_broadcast(json!({ "code": 0, "codespace": "", "log": "", "hash": hash }));
        assert_eq!(ok.unwrap(), Hash256::from_inner([0xaa; 32]));

        let rejected = parse_broadcast(json!({
            "code": 5,
            "codespace": "sdk",
            "log": "insufficient fee",
            "hash": "B".repeat(64),
        }))
        .unwrap_err();
        assert!(rejected.is_chain_rejection());
        assert_eq!(
            rejected.to_string(),
            "chain rejected the request! codespace: sdk, code: 5, log: insufficient fee"
        );
    }
}
