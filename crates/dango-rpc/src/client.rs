//! HTTP JSON-RPC client

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::trace;

use crate::{
    batch::{self, BatchConfig, PendingCall},
    error::RpcError,
    jsonrpc::{JsonRpcRequest, JsonRpcResponse},
};

/// HTTP-level settings of a [`JsonRpcClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Coalesce calls into JSON-RPC batches; `None` sends each call alone
    pub batch: Option<BatchConfig>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(30), batch: None }
    }
}

/// Posts JSON bodies to one endpoint and decodes the JSON answer.
#[derive(Debug, Clone)]
pub(crate) struct HttpSender {
    http: reqwest::Client,
    url: String,
}

impl HttpSender {
    pub(crate) async fn post<B: Serialize + ?Sized>(&self, body: &B) -> Result<Value, RpcError> {
        let response = self
            .http
            .post(&self.url)
            .json(body)
            .send()
            .await
            .map_err(|err| RpcError::Http { url: self.url.clone(), reason: err.to_string() })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|err| RpcError::Http { url: self.url.clone(), reason: err.to_string() })?;

        if !status.is_success() {
            return Err(RpcError::Status { status: status.as_u16(), body: text });
        }

        serde_json::from_str(&text).map_err(|err| RpcError::malformed(err, &text))
    }
}

#[derive(Debug)]
struct Inner {
    sender: HttpSender,
    next_id: AtomicU64,
    queue: Option<mpsc::UnboundedSender<PendingCall>>,
}

/// JSON-RPC 2.0 client over HTTP.
///
/// With batching enabled, calls are handed to a worker task that groups them
/// into batch envelopes; each caller still gets exactly its own result or
/// error. The worker stops once every clone of the client is dropped.
#[derive(Debug, Clone)]
pub struct JsonRpcClient {
    inner: Arc<Inner>,
}

impl JsonRpcClient {
    /// Create a client for `url`. When batching is configured this must run
    /// inside a Tokio runtime, which hosts the batch worker.
    pub fn new(url: impl Into<String>, config: HttpConfig) -> Result<Self, RpcError> {
        let url = url.into();
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| RpcError::Http { url: url.clone(), reason: err.to_string() })?;
        let sender = HttpSender { http, url };

        let queue = match config.batch {
            Some(batch_config) => {
                let runtime =
                    tokio::runtime::Handle::try_current().map_err(|_| RpcError::NoRuntime)?;
                let (tx, rx) = mpsc::unbounded_channel();
                runtime.spawn(batch::run(rx, sender.clone(), batch_config));
                Some(tx)
            },
            None => None,
        };

        Ok(Self { inner: Arc::new(Inner { sender, next_id: AtomicU64::new(1), queue }) })
    }

    pub fn url(&self) -> &str {
        &self.inner.sender.url
    }

    pub fn is_batching(&self) -> bool {
        self.inner.queue.is_some()
    }

    /// Call `method` and return its `result` member.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest::new(id, method, params);
        trace!(target: "dango::rpc", id, method, "sending request");

        match &self.inner.queue {
            Some(queue) => {
                let (respond_to, response) = oneshot::channel();
                queue
                    .send(PendingCall { request, respond_to })
                    .map_err(|_| RpcError::BatcherClosed)?;
                response.await.map_err(|_| RpcError::BatcherClosed)?
            },
            None => {
                let body = self.inner.sender.post(&request).await?;
                let response = JsonRpcResponse::from_json(body)?;
                if response.numeric_id() != Some(id) {
                    return Err(RpcError::malformed(
                        format!("response id does not match request {id}"),
                        &response.id,
                    ));
                }
                response.into_result()
            },
        }
    }
}
