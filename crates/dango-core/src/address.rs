//! Deterministic contract addresses
//!
//! `address = ripemd160(sha256(deployer | code_hash | salt))`

use crate::{
    codec::{decode_hex, hash160},
    error::ValidationError,
    key::Key,
    salt::derive_salt,
    types::{Addr, Hash256},
};

impl Addr {
    /// Address a contract will receive when `deployer` instantiates
    /// `code_hash` with `salt`.
    pub fn compute(deployer: Addr, code_hash: Hash256, salt: &[u8]) -> Self {
        Self::from_inner(derive(deployer.as_ref(), code_hash.as_ref(), salt))
    }
}

/// Predict an address from a hex deployer (prefix optional) and raw code
/// hash and salt bytes. Only a malformed deployer can fail.
pub fn predict_address(
    deployer: &str,
    code_hash: &[u8],
    salt: &[u8],
) -> Result<Addr, ValidationError> {
    let deployer = decode_hex(deployer)?;
    Ok(Addr::from_inner(derive(&deployer, code_hash, salt)))
}

/// Address of a user account the factory will create for `username` with
/// `key` at `account_index`.
pub fn predict_account_address(
    factory: Addr,
    account_code_hash: Hash256,
    username: &str,
    account_index: u32,
    key: &Key,
) -> Result<Addr, ValidationError> {
    let salt = derive_salt(username, account_index, key)?;
    Ok(Addr::compute(factory, account_code_hash, &salt))
}

fn derive(deployer: &[u8], code_hash: &[u8], salt: &[u8]) -> [u8; 20] {
    let mut preimage = Vec::with_capacity(deployer.len() + code_hash.len() + salt.len());
    preimage.extend_from_slice(deployer);
    preimage.extend_from_slice(code_hash);
    preimage.extend_from_slice(salt);
    hash160(&preimage)
}
