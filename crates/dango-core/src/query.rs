//! Query requests and responses of the `/app` endpoint
//!
//! A response carries exactly one variant, which has to match the request.
//! The typed accessors on [`QueryResponse`] turn any other variant into a
//! [`ProtocolMismatch`] that embeds the body received.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    error::ProtocolMismatch,
    types::{Addr, Binary, Coin, Coins, Hash256, Json},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Query {
    /// Chain id and last finalized block.
    Info {},
    /// Chain-level configuration.
    Config {},
    /// Application-specific configuration.
    AppConfig {},
    Balance {
        address: Addr,
        denom: String,
    },
    Balances {
        address: Addr,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_after: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
    Supply {
        denom: String,
    },
    Supplies {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_after: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
    Code {
        hash: Hash256,
    },
    Codes {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_after: Option<Hash256>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
    Contract {
        address: Addr,
    },
    Contracts {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start_after: Option<Addr>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
    /// A raw key in a contract's storage.
    WasmRaw {
        contract: Addr,
        key: Binary,
    },
    /// Range of raw keys in a contract's storage; `min` inclusive, `max` exclusive.
    WasmScan {
        contract: Addr,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<Binary>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<Binary>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u32>,
    },
    /// Call a contract's query entry point.
    WasmSmart {
        contract: Addr,
        msg: Json,
    },
    /// Several queries answered at the same height.
    Multi(Vec<Query>),
}

impl Query {
    pub const fn info() -> Self {
        Self::Info {}
    }

    pub const fn app_config() -> Self {
        Self::AppConfig {}
    }

    pub fn balance(address: Addr, denom: impl Into<String>) -> Self {
        Self::Balance { address, denom: denom.into() }
    }

    pub fn supply(denom: impl Into<String>) -> Self {
        Self::Supply { denom: denom.into() }
    }

    pub const fn contract(address: Addr) -> Self {
        Self::Contract { address }
    }

    pub fn wasm_raw(contract: Addr, key: impl Into<Binary>) -> Self {
        Self::WasmRaw { contract, key: key.into() }
    }

    pub fn wasm_smart<M: Serialize>(contract: Addr, msg: &M) -> serde_json::Result<Self> {
        Ok(Self::WasmSmart { contract, msg: serde_json::to_value(msg)? })
    }

    /// Wire name of the variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Info {} => "info",
            Self::Config {} => "config",
            Self::AppConfig {} => "app_config",
            Self::Balance { .. } => "balance",
            Self::Balances { .. } => "balances",
            Self::Supply { .. } => "supply",
            Self::Supplies { .. } => "supplies",
            Self::Code { .. } => "code",
            Self::Codes { .. } => "codes",
            Self::Contract { .. } => "contract",
            Self::Contracts { .. } => "contracts",
            Self::WasmRaw { .. } => "wasm_raw",
            Self::WasmScan { .. } => "wasm_scan",
            Self::WasmSmart { .. } => "wasm_smart",
            Self::Multi(_) => "multi",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryResponse {
    Info(ChainInfo),
    Config(Json),
    AppConfig(Json),
    Balance(Coin),
    Balances(Coins),
    Supply(Coin),
    Supplies(Coins),
    Code(Json),
    Codes(Json),
    Contract(ContractInfo),
    Contracts(BTreeMap<Addr, ContractInfo>),
    /// `None` when the key is absent.
    WasmRaw(Option<Binary>),
    WasmScan(BTreeMap<Binary, Binary>),
    WasmSmart(Json),
    Multi(Vec<GenericResult<QueryResponse>>),
}

macro_rules! accessor {
    ($(#[$meta:meta])* $fn:ident, $variant:ident, $ty:ty, $wire:literal) => {
        $(#[$meta])*
        pub fn $fn(self) -> Result<$ty, ProtocolMismatch> {
            match self {
                Self::$variant(inner) => Ok(inner),
                other => Err(ProtocolMismatch::new($wire, &other)),
            }
        }
    };
}

impl QueryResponse {
    /// Decode a response body. A body that is not any known variant is a
    /// protocol mismatch too.
    pub fn from_json(body: Json) -> Result<Self, ProtocolMismatch> {
        serde_json::from_value(body.clone())
            .map_err(|_| ProtocolMismatch::new("query", &body))
    }

    accessor!(as_info, Info, ChainInfo, "info");
    accessor!(as_config, Config, Json, "config");
    accessor!(as_app_config, AppConfig, Json, "app_config");
    accessor!(as_balance, Balance, Coin, "balance");
    accessor!(as_balances, Balances, Coins, "balances");
    accessor!(as_supply, Supply, Coin, "supply");
    accessor!(as_supplies, Supplies, Coins, "supplies");
    accessor!(as_code, Code, Json, "code");
    accessor!(as_codes, Codes, Json, "codes");
    accessor!(as_contract, Contract, ContractInfo, "contract");
    accessor!(as_contracts, Contracts, BTreeMap<Addr, ContractInfo>, "contracts");
    accessor!(
        /// Value stored under the key, if any.
        as_wasm_raw, WasmRaw, Option<Binary>, "wasm_raw"
    );
    accessor!(as_wasm_scan, WasmScan, BTreeMap<Binary, Binary>, "wasm_scan");
    accessor!(as_wasm_smart, WasmSmart, Json, "wasm_smart");
    accessor!(as_multi, Multi, Vec<GenericResult<QueryResponse>>, "multi");
}

/// Outcome as reported by the chain: `{"ok": ...}` or `{"err": "..."}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenericResult<T> {
    Ok(T),
    Err(String),
}

impl<T> GenericResult<T> {
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(err) => Err(err),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    pub chain_id: String,
    #[serde(default)]
    pub last_finalized_block: Json,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInfo {
    pub code_hash: Hash256,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub admin: Option<Addr>,
}

/// Result of a simulation (or of executing a transaction).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutcome {
    #[serde(default)]
    pub gas_limit: Option<u64>,
    pub gas_used: u64,
    pub result: GenericResult<Json>,
    #[serde(default)]
    pub events: Json,
}
