//! Error types for cryptographic operations

use thiserror::Error;

/// Errors from the cipher-suite registry and AEAD layer
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Cipher-suite value not in the registry
    #[error("unknown cipher suite value {value}")]
    UnknownCipherSuite {
        /// The wire value that did not match any suite
        value: u16,
    },

    /// Key material has the wrong length for the selected suite
    #[error("invalid key length: expected {expected}, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes
        expected: usize,
        /// Actual key length in bytes
        actual: usize,
    },

    /// Authentication tag mismatch (tampering or wrong key)
    #[error("authentication failed")]
    AuthenticationFailure,
}
