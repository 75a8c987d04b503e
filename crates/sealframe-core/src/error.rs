//! Error types for frame protection and group-key management

use sealframe_crypto::CryptoError;
use thiserror::Error;

/// Errors surfaced by [`Context`](crate::Context) and
/// [`GroupContext`](crate::GroupContext) operations
///
/// All errors propagate to the immediate caller; the library performs no
/// retries, logging, or recovery.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SframeError {
    /// Input too short to contain the declared header and tag
    #[error("ciphertext too short: need {needed} bytes, have {available}")]
    ShortCiphertext {
        /// Bytes required by the declared header and tag
        needed: usize,
        /// Bytes actually available
        available: usize,
    },

    /// Key identifier not registered in this context
    #[error("unknown key id {key_id}")]
    UnknownKey {
        /// The unregistered key identifier
        key_id: u64,
    },

    /// Compound key identifier refers to an empty epoch slot
    #[error("no epoch installed in slot {slot}")]
    UnknownEpoch {
        /// The epoch ring slot the ciphertext referenced
        slot: u64,
    },

    /// `add_key` called for an already-registered key identifier
    #[error("key id {key_id} already registered")]
    DuplicateKey {
        /// The key identifier that was already present
        key_id: u64,
    },

    /// Authentication tag mismatch (tampering or wrong key)
    #[error("authentication failed")]
    AuthenticationFailure,

    /// Caller-supplied output buffer cannot hold the result
    #[error("output buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes the operation needs to write
        needed: usize,
        /// Bytes the caller provided
        available: usize,
    },

    /// A parameter is outside its valid domain
    #[error("invalid parameter: {reason}")]
    InvalidParameter {
        /// What was out of range
        reason: &'static str,
    },
}

impl From<CryptoError> for SframeError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::AuthenticationFailure => Self::AuthenticationFailure,
            CryptoError::UnknownCipherSuite { .. } => {
                Self::InvalidParameter { reason: "unknown cipher suite" }
            },
            CryptoError::InvalidKeyLength { .. } => {
                Self::InvalidParameter { reason: "key length does not match the suite" }
            },
        }
    }
}
