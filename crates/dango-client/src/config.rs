//! Configuration

use std::{env, time::Duration};

use dango_rpc::{BatchConfig, DEFAULT_MAX_BATCH_SIZE, DEFAULT_MAX_WAIT, HttpConfig};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Name a client reports when none is given.
pub const DEFAULT_CLIENT_NAME: &str = "Dango Client";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A chain the client can talk to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain id, as included in sign docs
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// RPC endpoints, preferred first
    pub rpc_urls: Vec<String>,
}

impl ChainConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, rpc_urls: Vec<String>) -> Self {
        Self { id: id.into(), name: name.into(), rpc_urls }
    }

    pub fn default_rpc_url(&self) -> Option<&str> {
        self.rpc_urls.first().map(String::as_str)
    }
}

/// Client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Name the client reports
    pub name: String,
    /// RPC endpoint; overrides the chain's default
    pub rpc_url: Option<String>,
    /// Chain id; overrides the chain's own. When neither is known it is
    /// fetched from the node on every submission.
    pub chain_id: Option<String>,
    /// Chain the client is bound to
    pub chain: Option<ChainConfig>,
    /// Per-request HTTP timeout
    pub request_timeout: Duration,
    /// Request batching, off by default
    pub batch: Option<BatchConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_CLIENT_NAME.to_string(),
            rpc_url: None,
            chain_id: None,
            chain: None,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            batch: None,
        }
    }
}

impl ClientConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from any key-value source. Values that fail to parse fall back
    /// to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        let batch_enabled = lookup("DANGO_RPC_BATCH").is_some_and(|s| s == "true" || s == "1");
        let batch = batch_enabled.then(|| BatchConfig {
            max_size: parsed("DANGO_RPC_BATCH_MAX_SIZE")
                .and_then(|n| usize::try_from(n).ok())
                .unwrap_or(DEFAULT_MAX_BATCH_SIZE),
            max_wait: parsed("DANGO_RPC_BATCH_MAX_WAIT_MS")
                .map_or(DEFAULT_MAX_WAIT, Duration::from_millis),
        });

        Self {
            name: lookup("DANGO_CLIENT_NAME").unwrap_or_else(|| DEFAULT_CLIENT_NAME.to_string()),
            rpc_url: lookup("DANGO_RPC_URL"),
            chain_id: lookup("DANGO_CHAIN_ID"),
            chain: None,
            request_timeout: parsed("DANGO_RPC_TIMEOUT_SECS")
                .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs),
            batch,
        }
    }

    pub fn with_chain(mut self, chain: ChainConfig) -> Self {
        self.chain = Some(chain);
        self
    }

    /// The explicit URL, else the chain's first one.
    pub fn resolve_rpc_url(&self) -> Result<&str, ClientError> {
        self.rpc_url
            .as_deref()
            .or_else(|| self.chain.as_ref().and_then(ChainConfig::default_rpc_url))
            .ok_or_else(|| ClientError::Configuration("no RPC URL configured".to_string()))
    }

    /// The explicit chain id, else the chain's.
    pub fn resolve_chain_id(&self) -> Option<&str> {
        self.chain_id.as_deref().or_else(|| self.chain.as_ref().map(|chain| chain.id.as_str()))
    }

    pub const fn http_config(&self) -> HttpConfig {
        HttpConfig { timeout: self.request_timeout, batch: self.batch }
    }
}
