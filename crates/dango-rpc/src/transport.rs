use std::sync::Arc;

use async_trait::async_trait;
use dango_core::{Hash256, Tx};

use crate::error::RpcError;

/// Answer of an ABCI query with code 0, key and value already decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AbciQuery {
    pub code: u32,
    pub log: String,
    pub info: String,
    pub index: i64,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub height: u64,
    pub codespace: String,
}

/// The two node operations the client is built on.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read state under `path` (`/app`, `/simulate`, `/store`). Height 0
    /// means latest. A non-zero ABCI code is a
    /// [`RpcError::ChainRejection`].
    async fn query(
        &self,
        path: &str,
        data: &[u8],
        height: u64,
        prove: bool,
    ) -> Result<AbciQuery, RpcError>;

    /// Submit a transaction, returning the hash the node assigned to it.
    async fn broadcast(&self, tx: &Tx) -> Result<Hash256, RpcError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn query(
        &self,
        path: &str,
        data: &[u8],
        height: u64,
        prove: bool,
    ) -> Result<AbciQuery, RpcError> {
        (**self).query(path, data, height, prove).await
    }

    async fn broadcast(&self, tx: &Tx) -> Result<Hash256, RpcError> {
        (**self).broadcast(tx).await
    }
}
