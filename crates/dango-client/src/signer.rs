//! Signer contract
//!
//! Key storage and the signing ceremony (passkey, browser extension, local
//! key) live outside this crate. The client only needs the key id and a
//! credential for a given message set.

use async_trait::async_trait;
use dango_core::{Json, KeyHash, Message};
use serde::{Deserialize, Serialize};

/// Error type signers report. Carried verbatim inside
/// [`ClientError::Signer`](crate::ClientError::Signer).
pub type SignerError = Box<dyn std::error::Error + Send + Sync>;

/// What a signer hands back for one transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignOutcome {
    /// Goes into [`Tx::credential`](dango_core::Tx::credential) untouched.
    pub credential: Json,
    /// Goes into [`Tx::data`](dango_core::Tx::data) untouched, usually a
    /// serialized [`Metadata`](dango_core::Metadata).
    pub data: Json,
}

#[async_trait]
pub trait Signer: Send + Sync {
    /// Hash of the key this signer signs with.
    async fn key_id(&self) -> Result<KeyHash, SignerError>;

    /// Produce a credential for `msgs`. May wait on a user for as long as
    /// the ceremony takes.
    async fn sign_tx(
        &self,
        msgs: &[Message],
        chain_id: &str,
        sequence: u32,
    ) -> Result<SignOutcome, SignerError>;
}
