//! Salt used when the account factory instantiates a user account
//!
//! The first account of a username (index 0 or 1) gets a structured salt
//! built only from the username and the key, so its address can be predicted
//! off-chain before registration:
//!
//! ```text
//! len(username) as u8 | username | ripemd160(raw key) | key tag | raw key
//! ```
//!
//! Any later account uses the UTF-8 bytes of `{username}/account/{index}`.

use crate::{codec::ripemd160, error::ValidationError, key::Key, types::Json};

/// The username length travels as a single byte.
pub const MAX_USERNAME_LEN: usize = u8::MAX as usize;

/// Derive the instantiation salt for the account at `account_index`.
pub fn derive_salt(
    username: &str,
    account_index: u32,
    key: &Key,
) -> Result<Vec<u8>, ValidationError> {
    if account_index > 1 {
        return Ok(indexed_salt(username, account_index));
    }

    let len = u8::try_from(username.len())
        .map_err(|_| ValidationError::UsernameTooLong { len: username.len() })?;
    let raw_key = key.raw_bytes();

    let mut salt = Vec::with_capacity(1 + username.len() + 20 + 1 + raw_key.len());
    salt.push(len);
    salt.extend_from_slice(username.as_bytes());
    salt.extend_from_slice(&ripemd160(raw_key));
    salt.push(key.tag());
    salt.extend_from_slice(raw_key);

    Ok(salt)
}

/// Same as [`derive_salt`], taking the key in its JSON object form.
///
/// The key object is only inspected on the structured path, where it must
/// contain exactly one entry.
pub fn derive_salt_from_json(
    username: &str,
    account_index: u32,
    key: &Json,
) -> Result<Vec<u8>, ValidationError> {
    if account_index > 1 {
        return Ok(indexed_salt(username, account_index));
    }
    derive_salt(username, account_index, &Key::from_json(key)?)
}

fn indexed_salt(username: &str, account_index: u32) -> Vec<u8> {
    format!("{username}/account/{account_index}").into_bytes()
}
