//! Request batching
//!
//! Callers push `(request, reply channel)` pairs into an unbounded queue. A
//! single worker drains the queue: a batch opens on the first request, closes
//! when it holds `max_size` requests or `max_wait` has passed since it opened,
//! and is then posted in the background while the next batch starts filling.

use std::{collections::HashMap, time::Duration};

use serde_json::Value;
use tokio::{
    sync::{mpsc, oneshot},
    time::{Instant, timeout_at},
};
use tracing::{debug, warn};

use crate::{
    client::HttpSender,
    error::RpcError,
    jsonrpc::{JsonRpcRequest, JsonRpcResponse},
};

/// Largest number of calls in one batch envelope.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 20;

/// How long a batch stays open for more calls after its first one.
pub const DEFAULT_MAX_WAIT: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchConfig {
    pub max_size: usize,
    pub max_wait: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { max_size: DEFAULT_MAX_BATCH_SIZE, max_wait: DEFAULT_MAX_WAIT }
    }
}

#[derive(Debug)]
pub(crate) struct PendingCall {
    pub(crate) request: JsonRpcRequest,
    pub(crate) respond_to: oneshot::Sender<Result<Value, RpcError>>,
}

pub(crate) async fn run(
    mut queue: mpsc::UnboundedReceiver<PendingCall>,
    sender: HttpSender,
    config: BatchConfig,
) {
    let max_size = config.max_size.max(1);

    while let Some(first) = queue.recv().await {
        let deadline = Instant::now() + config.max_wait;
        let mut batch = Vec::with_capacity(max_size);
        batch.push(first);

        while batch.len() < max_size {
            match timeout_at(deadline, queue.recv()).await {
                Ok(Some(call)) => batch.push(call),
                // Window elapsed, or every client handle is gone.
                Ok(None) | Err(_) => break,
            }
        }

        tokio::spawn(dispatch(sender.clone(), batch));
    }

    debug!(target: "dango::rpc", "batch worker stopped");
}

async fn dispatch(sender: HttpSender, batch: Vec<PendingCall>) {
    debug!(target: "dango::rpc", size = batch.len(), "posting batch");

    let requests: Vec<&JsonRpcRequest> = batch.iter().map(|call| &call.request).collect();
    let outcome = match sender.post(&requests).await {
        Ok(body) => split_batch_response(body),
        Err(err) => Err(err),
    };

    match outcome {
        Ok(mut responses) => {
            for call in batch {
                let id = call.request.id;
                let result = responses.remove(&id).map_or_else(
                    || Err(RpcError::malformed("no response for request", &id)),
                    JsonRpcResponse::into_result,
                );
                // A closed channel means the caller stopped waiting.
                let _ = call.respond_to.send(result);
            }
        },
        Err(err) => {
            warn!(target: "dango::rpc", error = %err, size = batch.len(), "batch failed");
            for call in batch {
                let _ = call.respond_to.send(Err(err.clone()));
            }
        },
    }
}

/// Index a batch answer by request id. A node that rejects the whole batch
/// answers with a single error object instead of an array.
fn split_batch_response(body: Value) -> Result<HashMap<u64, JsonRpcResponse>, RpcError> {
    let Value::Array(items) = body else {
        return Err(JsonRpcResponse::from_json(body.clone())?
            .into_result()
            .err()
            .unwrap_or_else(|| RpcError::malformed("expected a batch array", &body)));
    };

    let mut responses = HashMap::with_capacity(items.len());
    for item in items {
        let response = JsonRpcResponse::from_json(item)?;
        let id = response
            .numeric_id()
            .ok_or_else(|| RpcError::malformed("response without numeric id", &response.id))?;
        responses.insert(id, response);
    }
    Ok(responses)
}
