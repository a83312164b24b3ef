//! Errors raised before anything reaches the network

/// Input that violates an invariant of a derivation or a type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// The length prefix of a first-account salt is a single byte.
    #[error("username is {len} bytes when UTF-8 encoded, at most 255 are allowed")]
    UsernameTooLong {
        /// UTF-8 length of the rejected username.
        len: usize,
    },

    /// A key object must hold exactly one `{type: public key}` entry.
    #[error("key object must contain exactly one entry, found {found}")]
    AmbiguousKey {
        /// Number of entries in the rejected object.
        found: usize,
    },

    #[error("unknown key type `{0}`")]
    UnknownKeyType(String),

    #[error("key of type `{0}` must be a string")]
    MalformedKey(String),

    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid UTF-8: {0}")]
    Utf8(String),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("address `{0}` must start with `0x`")]
    MissingPrefix(String),

    #[error("`{0}` is not a valid unsigned 128-bit amount")]
    InvalidAmount(String),

    #[error("nothing to transfer")]
    EmptyTransfer,

    /// The chain refuses transactions without messages.
    #[error("a transaction needs at least one message")]
    EmptyMessages,
}

/// A query response that does not carry the variant the request asked for.
///
/// The offending body is kept verbatim so the mismatch can be diagnosed from
/// the error alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("expecting {expected} response, got {body}")]
pub struct ProtocolMismatch {
    /// Variant the caller asked for, in wire spelling.
    pub expected: &'static str,
    /// JSON body that came back instead.
    pub body: String,
}

impl ProtocolMismatch {
    /// Build a mismatch error from the response that was actually received.
    pub fn new<T: serde::Serialize>(expected: &'static str, received: &T) -> Self {
        let body = serde_json::to_string(received)
            .unwrap_or_else(|err| format!("<unserializable response: {err}>"));
        Self { expected, body }
    }
}
