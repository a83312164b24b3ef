//! Common types

use std::{
    collections::{BTreeMap, btree_map},
    fmt,
    ops::Deref,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    codec::{decode_base64, decode_hex, encode_base64, encode_hex},
    error::ValidationError,
};

/// Arbitrary JSON, as carried inside messages, queries and transactions.
pub type Json = serde_json::Value;

/// Serialize through `Display`, deserialize through `FromStr`.
macro_rules! impl_serde_via_str {
    ($name:ident) => {
        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

macro_rules! fixed_hash {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name([u8; $len]);

        impl $name {
            /// Length in bytes.
            pub const LENGTH: usize = $len;

            pub const ZERO: Self = Self([0; $len]);

            pub const fn from_inner(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }

            pub const fn into_inner(self) -> [u8; $len] {
                self.0
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl TryFrom<&[u8]> for $name {
            type Error = ValidationError;

            fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
                bytes.try_into().map(Self).map_err(|_| ValidationError::InvalidLength {
                    expected: $len,
                    actual: bytes.len(),
                })
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_from(decode_hex(s)?.as_slice())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&hex::encode_upper(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({self})", stringify!($name))
            }
        }

        impl_serde_via_str!($name);
    };
}

fixed_hash!(
    /// 32-byte hash, shown as uppercase hex without prefix (code hashes, tx hashes).
    Hash256,
    32
);

fixed_hash!(
    /// 20-byte digest, shown as uppercase hex without prefix.
    Hash160,
    20
);

/// Account or contract address.
///
/// Textually `0x` followed by 40 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Addr([u8; 20]);

impl Addr {
    /// Length in bytes.
    pub const LENGTH: usize = 20;

    pub const fn from_inner(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub const fn into_inner(self) -> [u8; 20] {
        self.0
    }
}

impl AsRef<[u8]> for Addr {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Addr {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("0x") {
            return Err(ValidationError::MissingPrefix(s.to_string()));
        }
        let bytes = decode_hex(s)?;
        bytes.as_slice().try_into().map(Self).map_err(|_| ValidationError::InvalidLength {
            expected: Self::LENGTH,
            actual: bytes.len(),
        })
    }
}

impl fmt::Display for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", encode_hex(self.0))
    }
}

impl fmt::Debug for Addr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Addr({self})")
    }
}

impl_serde_via_str!(Addr);

/// Owned bytes that travel as standard base64 inside JSON.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Binary(Vec<u8>);

impl Binary {
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl Deref for Binary {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<[u8]> for Binary {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Binary {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Binary {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for Binary {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes.to_vec())
    }
}

impl FromStr for Binary {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_base64(s).map(Self)
    }
}

impl fmt::Display for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode_base64(&self.0))
    }
}

impl fmt::Debug for Binary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Binary({self})")
    }
}

impl_serde_via_str!(Binary);

/// Token amount, serialized as a decimal string so it survives JSON number
/// precision limits.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uint128(u128);

impl Uint128 {
    pub const ZERO: Self = Self(0);

    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    pub const fn into_inner(self) -> u128 {
        self.0
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl From<u128> for Uint128 {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl FromStr for Uint128 {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self).map_err(|_| ValidationError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Uint128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uint128({})", self.0)
    }
}

impl_serde_via_str!(Uint128);

/// A single denomination and amount.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Uint128,
}

/// Denomination to amount, sorted by denomination. Zero amounts are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Coins(BTreeMap<String, Uint128>);

impl<'de> Deserialize<'de> for Coins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        BTreeMap::<String, Uint128>::deserialize(deserializer).map(|map| map.into_iter().collect())
    }
}

impl Coins {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Add `amount` of `denom`, merging with any existing amount.
    pub fn insert(&mut self, denom: impl Into<String>, amount: impl Into<Uint128>) {
        let amount = amount.into();
        if amount.is_zero() {
            return;
        }
        let entry = self.0.entry(denom.into()).or_default();
        *entry = Uint128::new(entry.into_inner().saturating_add(amount.into_inner()));
    }

    pub fn amount_of(&self, denom: &str) -> Uint128 {
        self.0.get(denom).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, Uint128> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = (&'a String, &'a Uint128);
    type IntoIter = btree_map::Iter<'a, String, Uint128>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<D: Into<String>, A: Into<Uint128>> FromIterator<(D, A)> for Coins {
    fn from_iter<I: IntoIterator<Item = (D, A)>>(iter: I) -> Self {
        let mut coins = Self::new();
        for (denom, amount) in iter {
            coins.insert(denom, amount);
        }
        coins
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        [(coin.denom, coin.amount)].into_iter().collect()
    }
}
