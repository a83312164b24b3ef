//! Chain actions carried by a transaction

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Addr, Binary, Coins, Hash256, Json};

/// One action. A transaction carries an ordered list of these and the chain
/// executes them in order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Message {
    /// Update the chain- and app-level configurations.
    Configure(MsgConfigure),
    /// Send coins, possibly to several recipients at once.
    Transfer(MsgTransfer),
    /// Store Wasm byte code on chain.
    Upload(MsgUpload),
    Instantiate(MsgInstantiate),
    Execute(MsgExecute),
    /// Point an existing contract at new code.
    Migrate(MsgMigrate),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgConfigure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_cfg: Option<Json>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_app_cfg: Option<Json>,
}

/// Recipient to coins.
pub type MsgTransfer = BTreeMap<Addr, Coins>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpload {
    pub code: Binary,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgInstantiate {
    pub code_hash: Hash256,
    pub msg: Json,
    pub salt: Binary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin: Option<Addr>,
    pub funds: Coins,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgExecute {
    pub contract: Addr,
    pub msg: Json,
    pub funds: Coins,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgMigrate {
    pub contract: Addr,
    pub new_code_hash: Hash256,
    pub msg: Json,
}

impl Message {
    pub const fn configure(new_cfg: Option<Json>, new_app_cfg: Option<Json>) -> Self {
        Self::Configure(MsgConfigure { new_cfg, new_app_cfg })
    }

    /// `None` when there is nothing to send.
    pub fn transfer(to: Addr, coins: Coins) -> Option<Self> {
        Self::batch_transfer([(to, coins)])
    }

    /// Transfers to several recipients in one message. Recipients with no
    /// coins are dropped; `None` when nothing is left.
    pub fn batch_transfer<I>(transfers: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Addr, Coins)>,
    {
        let transfers: MsgTransfer =
            transfers.into_iter().filter(|(_, coins)| !coins.is_empty()).collect();
        (!transfers.is_empty()).then_some(Self::Transfer(transfers))
    }

    pub fn upload(code: impl Into<Binary>) -> Self {
        Self::Upload(MsgUpload { code: code.into() })
    }

    pub fn instantiate<M: Serialize>(
        code_hash: Hash256,
        msg: &M,
        salt: impl Into<Binary>,
        label: Option<String>,
        admin: Option<Addr>,
        funds: Coins,
    ) -> serde_json::Result<Self> {
        Ok(Self::Instantiate(MsgInstantiate {
            code_hash,
            msg: serde_json::to_value(msg)?,
            salt: salt.into(),
            label,
            admin,
            funds,
        }))
    }

    pub fn execute<M: Serialize>(
        contract: Addr,
        msg: &M,
        funds: Coins,
    ) -> serde_json::Result<Self> {
        Ok(Self::Execute(MsgExecute { contract, msg: serde_json::to_value(msg)?, funds }))
    }

    pub fn migrate<M: Serialize>(
        contract: Addr,
        new_code_hash: Hash256,
        msg: &M,
    ) -> serde_json::Result<Self> {
        Ok(Self::Migrate(MsgMigrate { contract, new_code_hash, msg: serde_json::to_value(msg)? }))
    }

    /// Wire name of the variant.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::Transfer(_) => "transfer",
            Self::Upload(_) => "upload",
            Self::Instantiate(_) => "instantiate",
            Self::Execute(_) => "execute",
            Self::Migrate(_) => "migrate",
        }
    }
}

/// Who may migrate a newly instantiated contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdminOption {
    SetToAddr(Addr),
    /// The contract administers itself.
    SetToSelf,
    #[default]
    SetToNone,
}

impl AdminOption {
    /// Resolve to a concrete admin. `SetToSelf` needs the inputs of address
    /// derivation since the contract does not exist yet.
    pub fn decide(self, deployer: Addr, code_hash: Hash256, salt: &[u8]) -> Option<Addr> {
        match self {
            Self::SetToAddr(addr) => Some(addr),
            Self::SetToSelf => Some(Addr::compute(deployer, code_hash, salt)),
            Self::SetToNone => None,
        }
    }
}
