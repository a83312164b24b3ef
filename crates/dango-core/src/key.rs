//! Public keys that can authenticate a username

use serde::{Deserialize, Serialize};

use crate::{
    codec::ripemd160,
    error::ValidationError,
    types::{Addr, Binary, Hash160, Json},
};

/// Digest of a key's raw bytes. Identifies which of an account's keys signed
/// a transaction, and is mixed into the first-account salt.
pub type KeyHash = Hash160;

/// Credential type, with the numeric tag used in salt encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyType {
    /// Passkey (WebAuthn).
    Secp256r1,
    Secp256k1,
    /// An Ethereum wallet, identified by its address.
    Ethereum,
}

impl KeyType {
    pub const fn tag(self) -> u8 {
        match self {
            Self::Secp256r1 => 0,
            Self::Secp256k1 => 1,
            Self::Ethereum => 2,
        }
    }

    /// Wire spelling, as used for the single key of a key object.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secp256r1 => "secp256r1",
            Self::Secp256k1 => "secp256k1",
            Self::Ethereum => "ethereum",
        }
    }
}

/// A public key, encoded on the wire as a single-entry object such as
/// `{"secp256k1": "<base64>"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    /// Compressed Secp256r1 public key.
    Secp256r1(Binary),
    /// Compressed Secp256k1 public key.
    Secp256k1(Binary),
    Ethereum(Addr),
}

impl Key {
    pub const fn ty(&self) -> KeyType {
        match self {
            Self::Secp256r1(_) => KeyType::Secp256r1,
            Self::Secp256k1(_) => KeyType::Secp256k1,
            Self::Ethereum(_) => KeyType::Ethereum,
        }
    }

    pub const fn tag(&self) -> u8 {
        self.ty().tag()
    }

    /// The key material without any encoding.
    pub fn raw_bytes(&self) -> &[u8] {
        match self {
            Self::Secp256r1(key) | Self::Secp256k1(key) => &**key,
            Self::Ethereum(addr) => addr.as_ref(),
        }
    }

    pub fn key_hash(&self) -> KeyHash {
        KeyHash::from_inner(ripemd160(self.raw_bytes()))
    }

    /// Build a key from its type name and textual value: base64 for curve
    /// keys, `0x` hex for Ethereum addresses.
    pub fn from_entry(ty: &str, value: &str) -> Result<Self, ValidationError> {
        match ty {
            "secp256r1" => Ok(Self::Secp256r1(value.parse()?)),
            "secp256k1" => Ok(Self::Secp256k1(value.parse()?)),
            "ethereum" => Ok(Self::Ethereum(value.parse()?)),
            other => Err(ValidationError::UnknownKeyType(other.to_string())),
        }
    }

    /// Parse a key object, rejecting anything that is not exactly one
    /// `{type: value}` entry.
    pub fn from_json(json: &Json) -> Result<Self, ValidationError> {
        let found = json.as_object().map_or(0, |obj| obj.len());
        let Some((ty, value)) =
            json.as_object().filter(|_| found == 1).and_then(|o| o.iter().next())
        else {
            return Err(ValidationError::AmbiguousKey { found });
        };
        let value = value.as_str().ok_or_else(|| ValidationError::MalformedKey(ty.clone()))?;
        Self::from_entry(ty, value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const PUBKEY_B64: &str = "AgECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8g";

    #[test]
    fn test_tags() {
        assert_eq!(KeyType::Secp256r1.tag(), 0);
        assert_eq!(KeyType::Secp256k1.tag(), 1);
        assert_eq!(KeyType::Ethereum.tag(), 2);
    }

    #[test]
    fn test_from_json_single_entry() {
        let key = Key::from_json(&json!({ "secp256k1": PUBKEY_B64 })).unwrap();
        assert_eq!(key.ty(), KeyType::Secp256k1);
        assert_eq!(key.raw_bytes().len(), 33);
        assert_eq!(key.raw_bytes()[0], 0x02);
        assert_eq!(key.key_hash().to_string(), "3BDAEDB80FDFEC35EE44604ED9E9E5A50F6FB81B");

        // Same shape as the serde representation.
        let via_serde: Key = serde_json::from_value(json!({ "secp256k1": PUBKEY_B64 })).unwrap();
        assert_eq!(via_serde, key);
    }

    #[test]
    fn test_from_json_rejects_multi_entry() {
        let err = Key::from_json(&json!({
            "secp256k1": PUBKEY_B64,
            "secp256r1": PUBKEY_B64,
        }))
        .unwrap_err();
        assert_eq!(err, ValidationError::AmbiguousKey { found: 2 });

        assert_eq!(
            Key::from_json(&json!({})).unwrap_err(),
            ValidationError::AmbiguousKey { found: 0 }
        );
        assert_eq!(
            Key::from_json(&json!("secp256k1")).unwrap_err(),
            ValidationError::AmbiguousKey { found: 0 }
        );
    }

    #[test]
    fn test_from_json_rejects_bad_values() {
        assert_eq!(
            Key::from_json(&json!({ "ed25519": PUBKEY_B64 })).unwrap_err(),
            ValidationError::UnknownKeyType("ed25519".to_string())
        );
        assert_eq!(
            Key::from_json(&json!({ "secp256k1": 12 })).unwrap_err(),
            ValidationError::MalformedKey("secp256k1".to_string())
        );
        assert!(matches!(
            Key::from_json(&json!({ "secp256k1": "@@@" })),
            Err(ValidationError::Base64(_))
        ));
    }

    #[test]
    fn test_ethereum_key_uses_address_bytes() {
        let key =
            Key::from_entry("ethereum", "0x1111111111111111111111111111111111111111").unwrap();
        assert_eq!(key.raw_bytes(), &[0x11; 20]);
        assert_eq!(key.tag(), 2);
    }
}
