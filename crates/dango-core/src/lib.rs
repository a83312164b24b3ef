//! Dango client core
//!
//! Everything a client needs to compute without talking to a node:
//! - byte codecs and the two hash primitives
//! - address prediction and first-account salt derivation
//! - the message, transaction and query shapes understood by the chain

pub mod address;
pub mod codec;
pub mod error;
pub mod key;
pub mod message;
pub mod query;
pub mod salt;
pub mod tx;
pub mod types;

pub use address::{predict_account_address, predict_address};
pub use error::{ProtocolMismatch, ValidationError};
pub use key::{Key, KeyHash, KeyType};
pub use message::{
    AdminOption, Message, MsgConfigure, MsgExecute, MsgInstantiate, MsgMigrate, MsgTransfer,
    MsgUpload,
};
pub use query::{ChainInfo, ContractInfo, GenericResult, Query, QueryResponse, TxOutcome};
pub use salt::{MAX_USERNAME_LEN, derive_salt, derive_salt_from_json};
pub use tx::{Metadata, Tx, UnsignedTx};
pub use types::{Addr, Binary, Coin, Coins, Hash160, Hash256, Json, Uint128};
