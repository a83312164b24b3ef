//! Transport between the Dango client and a CometBFT node
//!
//! Two operations ride on JSON-RPC 2.0 over HTTP: `abci_query` to read chain
//! state and `broadcast_tx_sync` to submit a transaction. Calls can
//! optionally be coalesced into JSON-RPC batches.

mod batch;
mod client;
mod comet;
mod error;
mod jsonrpc;
mod transport;

pub use batch::{BatchConfig, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_WAIT};
pub use client::{HttpConfig, JsonRpcClient};
pub use comet::HttpTransport;
pub use error::RpcError;
pub use jsonrpc::{JsonRpcErrorObject, JsonRpcRequest, JsonRpcResponse};
pub use transport::{AbciQuery, Transport};
