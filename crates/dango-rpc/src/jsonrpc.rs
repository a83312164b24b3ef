//! JSON-RPC 2.0 envelopes

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RpcError;

/// JSON-RPC request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self { jsonrpc: "2.0".to_string(), id, method: method.into(), params }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorObject>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    pub fn from_json(body: Value) -> Result<Self, RpcError> {
        serde_json::from_value(body.clone()).map_err(|err| RpcError::malformed(err, &body))
    }

    /// Numeric id, as assigned by [`JsonRpcRequest::new`]. Some servers echo
    /// it back as a string.
    pub fn numeric_id(&self) -> Option<u64> {
        self.id.as_u64().or_else(|| self.id.as_str().and_then(|s| s.parse().ok()))
    }

    pub fn into_result(self) -> Result<Value, RpcError> {
        if let Some(error) = self.error {
            return Err(RpcError::JsonRpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }
        let Some(result) = self.result else {
            return Err(RpcError::malformed("neither result nor error", &self.id));
        };
        Ok(result)
    }
}
