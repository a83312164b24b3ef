//! Client errors

use dango_core::{ProtocolMismatch, ValidationError};
use dango_rpc::RpcError;

use crate::signer::SignerError;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Missing RPC URL, or a signer-only operation on a read-only client.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The node answered with a shape other than the one requested.
    #[error(transparent)]
    ProtocolMismatch(#[from] ProtocolMismatch),

    /// The call did not complete: network, HTTP or JSON-RPC envelope failure.
    #[error("RPC transport error: {0}")]
    RpcTransport(#[source] RpcError),

    /// A query or broadcast returned a non-zero code.
    #[error("chain rejected the request! codespace: {codespace}, code: {code}, log: {log}")]
    ChainRejection { codespace: String, code: u32, log: String },

    #[error("signer failed: {0}")]
    Signer(#[source] SignerError),

    /// The dry run executed but reported an error.
    #[error("simulation failed: {0}")]
    Simulation(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RpcError> for ClientError {
    fn from(err: RpcError) -> Self {
        match err {
            RpcError::ChainRejection { codespace, code, log } => {
                Self::ChainRejection { codespace, code, log }
            },
            other => Self::RpcTransport(other),
        }
    }
}

impl ClientError {
    pub fn missing_signer() -> Self {
        Self::Configuration("a signer is required to send transactions".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_rejection_is_lifted() {
        let err = ClientError::from(RpcError::ChainRejection {
            codespace: "app".to_string(),
            code: 3,
            log: "out of gas".to_string(),
        });
        assert!(matches!(err, ClientError::ChainRejection { code: 3, .. }));
        assert_eq!(
            err.to_string(),
            "chain rejected the request! codespace: app, code: 3, log: out of gas"
        );
    }

    #[test]
    fn test_transport_failures_stay_transport() {
        let err =
            ClientError::from(RpcError::Status { status: 502, body: "bad gateway".to_string() });
        assert!(matches!(err, ClientError::RpcTransport(RpcError::Status { status: 502, .. })));
    }
}
