//! RPC errors

use serde_json::Value;

/// Failure of a call to the node.
///
/// Everything except [`RpcError::ChainRejection`] means the call itself did
/// not complete; a chain rejection is a well-formed answer with a non-zero
/// ABCI code. Cloneable so one failed batch can be reported to each caller.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RpcError {
    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("node answered with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed JSON-RPC response ({reason}): {body}")]
    Malformed { reason: String, body: String },

    /// The node returned a JSON-RPC error object.
    #[error("JSON-RPC error {code}: {message}")]
    JsonRpc { code: i64, message: String, data: Option<Value> },

    #[error("failed to encode request: {0}")]
    Encode(String),

    /// Batching needs a Tokio runtime to host the batch worker.
    #[error("batching requires a running Tokio runtime")]
    NoRuntime,

    #[error("batch worker is gone")]
    BatcherClosed,

    #[error("chain rejected the request! codespace: {codespace}, code: {code}, log: {log}")]
    ChainRejection { codespace: String, code: u32, log: String },
}

impl RpcError {
    pub(crate) fn malformed(reason: impl ToString, body: &impl ToString) -> Self {
        Self::Malformed { reason: reason.to_string(), body: body.to_string() }
    }

    pub const fn is_chain_rejection(&self) -> bool {
        matches!(self, Self::ChainRejection { .. })
    }
}
