//! Sealframe Cryptographic Primitives
//!
//! Cipher-suite registry, key schedule, and AEAD constructions for the
//! Sealframe media-frame encryption layer. Pure functions with
//! deterministic outputs; all state lives in the caller.
//!
//! # Key Lifecycle
//!
//! A base secret (caller-provided, or derived from a group epoch secret by
//! the adapter in `sealframe-core`) is expanded into per-key working
//! material, from which each frame's nonce is derived deterministically:
//!
//! ```text
//! base secret
//!        │
//!        ▼
//! HKDF → FrameKey (enc_key, salt, optional auth_key)
//!        │
//!        ▼
//! salt XOR counter → per-frame nonce
//!        │
//!        ▼
//! AEAD (AES-GCM, or AES-CTR + truncated HMAC) → ciphertext ‖ tag
//! ```
//!
//! # Security
//!
//! - Nonce uniqueness: the counter is supplied by the caller and must be
//!   used at most once per key; the salt binds it to the key schedule
//! - Authenticity: GCM's native tag, or an HMAC over a length-framed
//!   transcript of associated data, ciphertext, and nonce, truncated to the
//!   suite's tag length and verified in constant time
//! - Key hygiene: all derived key material is zeroized on drop

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod aead;
pub mod error;
pub mod kdf;
pub mod keys;
pub mod suite;

pub use error::CryptoError;
pub use keys::FrameKey;
pub use suite::{AeadKind, CipherSuite, HashKind, NONCE_LEN};
