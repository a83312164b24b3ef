//! Byte codecs and hash primitives

use base64::{Engine, engine::general_purpose::STANDARD};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Lowercase hex, no prefix.
pub fn encode_hex(bytes: impl AsRef<[u8]>) -> String {
    hex::encode(bytes)
}

/// Decode hex in either case, with or without a leading `0x`.
pub fn decode_hex(s: &str) -> Result<Vec<u8>, ValidationError> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    Ok(hex::decode(s)?)
}

/// Standard (padded) base64.
pub fn encode_base64(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_base64(s: &str) -> Result<Vec<u8>, ValidationError> {
    Ok(STANDARD.decode(s)?)
}

pub fn encode_utf8(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

pub fn decode_utf8(bytes: &[u8]) -> Result<String, ValidationError> {
    String::from_utf8(bytes.to_vec()).map_err(|err| ValidationError::Utf8(err.to_string()))
}

/// 256-bit hash used for the first pass of address derivation and for code
/// and transaction hashes.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// 160-bit digest used for the second pass of address derivation and for key
/// hashes.
pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// `ripemd160(sha256(data))`
pub fn hash160(data: &[u8]) -> [u8; 20] {
    ripemd160(&sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_inputs() {
        assert_eq!(
            encode_hex(sha256(&[])),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(encode_hex(ripemd160(&[])), "9c1185a5c5e9fc54612808977ee8f548b2258d31");
        assert_eq!(encode_hex([]), "");
        assert_eq!(encode_base64([]), "");
        assert!(decode_hex("").unwrap().is_empty());
        assert!(decode_hex("0x").unwrap().is_empty());
        assert!(decode_base64("").unwrap().is_empty());
    }

    #[test]
    fn test_known_digests() {
        assert_eq!(
            encode_hex(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(encode_hex(ripemd160(b"abc")), "8eb208f7e05d987a9b044a8e98c6b087f15a0bfc");
    }

    #[test]
    fn test_hex_accepts_prefix_and_case() {
        assert_eq!(decode_hex("0xABcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex("abcd").unwrap(), vec![0xab, 0xcd]);
        assert!(matches!(decode_hex("0xabc"), Err(ValidationError::Hex(_))));
        assert!(matches!(decode_hex("zz"), Err(ValidationError::Hex(_))));
    }

    #[test]
    fn test_base64_and_utf8() {
        assert_eq!(encode_base64(b"dango"), "ZGFuZ28=");
        assert_eq!(decode_base64("ZGFuZ28=").unwrap(), b"dango");
        assert!(matches!(decode_base64("not base64!"), Err(ValidationError::Base64(_))));

        assert_eq!(encode_utf8("héllo"), "héllo".as_bytes());
        assert_eq!(decode_utf8("héllo".as_bytes()).unwrap(), "héllo");
        assert!(matches!(decode_utf8(&[0xff, 0xfe]), Err(ValidationError::Utf8(_))));
    }
}
