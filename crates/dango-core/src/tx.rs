//! Transaction structure

use serde::{Deserialize, Serialize};

use crate::{
    codec::sha256,
    key::KeyHash,
    message::Message,
    types::{Addr, Hash256, Json},
};

/// A transaction as broadcast to the chain.
///
/// Signed and unsigned forms share this shape; an unsigned one has a null
/// `credential`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tx {
    /// Account sending the transaction
    pub sender: Addr,
    /// Maximum gas the chain may spend executing `msgs`
    pub gas_limit: u64,
    /// Executed in order
    pub msgs: Vec<Message>,
    /// Submitter metadata, see [`Metadata`]
    pub data: Json,
    /// Proof of authorization, produced by a signer
    pub credential: Json,
}

impl Tx {
    pub fn unsigned(sender: Addr, gas_limit: u64, msgs: Vec<Message>, data: Json) -> Self {
        Self { sender, gas_limit, msgs, data, credential: Json::Null }
    }

    pub fn is_signed(&self) -> bool {
        !self.credential.is_null()
    }

    /// JSON encoding sent over the wire. Struct fields keep declaration order
    /// and object keys inside `Json` values are sorted, so equal transactions
    /// always encode to equal bytes.
    pub fn to_canonical_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// SHA-256 of the canonical bytes.
    pub fn tx_hash(&self) -> serde_json::Result<Hash256> {
        Ok(Hash256::from_inner(sha256(&self.to_canonical_bytes()?)))
    }
}

/// The part of a transaction that determines its gas usage. Sent to the
/// simulation endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedTx {
    pub sender: Addr,
    pub msgs: Vec<Message>,
    pub data: Json,
}

impl From<&Tx> for UnsignedTx {
    fn from(tx: &Tx) -> Self {
        Self { sender: tx.sender, msgs: tx.msgs.clone(), data: tx.data.clone() }
    }
}

/// Submitter metadata a Dango account expects in [`Tx::data`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub username: String,
    /// Which of the account's keys signed
    pub key_hash: KeyHash,
    /// Replay protection counter the transaction was signed with
    pub sequence: u32,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::types::Coins;

    fn sample_tx() -> Tx {
        let msgs = vec![
            Message::upload(vec![1u8, 2, 3]),
            Message::execute(
                Addr::from_inner([0x33; 20]),
                &json!({ "zeta": 1, "alpha": { "b": 2, "a": 1 } }),
                Coins::new(),
            )
            .unwrap(),
        ];
        let data = serde_json::to_value(Metadata {
            username: "bob".to_string(),
            key_hash: KeyHash::from_inner([7; 20]),
            sequence: 5,
        })
        .unwrap();
        Tx::unsigned(Addr::from_inner([0x11; 20]), 1_000_000, msgs, data)
    }

    #[test]
    fn test_unsigned_has_null_credential() {
        let tx = sample_tx();
        assert!(!tx.is_signed());
        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["credential"], Json::Null);
        assert_eq!(value["data"]["sequence"], json!(5));
    }

    #[test]
    fn test_canonical_bytes_are_stable() {
        let tx = sample_tx();
        let first = tx.to_canonical_bytes().unwrap();
        assert_eq!(first, tx.clone().to_canonical_bytes().unwrap());

        // Decoding and re-encoding does not move anything.
        let decoded: Tx = serde_json::from_slice(&first).unwrap();
        assert_eq!(decoded.to_canonical_bytes().unwrap(), first);
        assert_eq!(decoded.tx_hash().unwrap(), tx.tx_hash().unwrap());

        let text = String::from_utf8(first).unwrap();
        let head = r#"{"sender":"0x1111111111111111111111111111111111111111","gas_limit":1000000,"#;
        assert!(text.starts_with(&format!(r#"{head}"msgs":["#)));
        assert!(text.contains(r#"{"alpha":{"a":1,"b":2},"zeta":1}"#));
    }

    #[test]
    fn test_hash_changes_with_credential() {
        let unsigned = sample_tx();
        let mut signed = unsigned.clone();
        signed.credential = json!({ "standard": { "signature": "c2ln" } });
        assert!(signed.is_signed());
        assert_ne!(unsigned.tx_hash().unwrap(), signed.tx_hash().unwrap());
    }

    #[test]
    fn test_unsigned_tx_from_tx() {
        let tx = sample_tx();
        let unsigned = UnsignedTx::from(&tx);
        assert_eq!(unsigned.msgs, tx.msgs);
        let value = serde_json::to_value(&unsigned).unwrap();
        assert!(value.get("gas_limit").is_none());
        assert!(value.get("credential").is_none());
    }
}
