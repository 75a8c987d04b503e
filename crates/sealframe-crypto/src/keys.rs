//! Per-frame key schedule.
//!
//! A caller-supplied base secret is expanded into the working material for
//! one key identifier: the encryption key, the nonce salt, and (for the
//! CTR+HMAC suites) a separate authentication key.
//!
//! ```text
//! base secret
//!      │
//!      ▼ HKDF-Extract(salt = "")
//! frame secret
//!      │
//!      ├─ Expand("SFrame10 key")  → enc_key ─┬─ Expand("SFrame10 enc")  → enc_key'
//!      │                                     └─ Expand("SFrame10 auth") → auth_key
//!      └─ Expand("SFrame10 salt") → salt
//! ```
//!
//! The subkey split (bottom right) only happens for CTR+HMAC suites; GCM
//! suites use `enc_key` directly.

use zeroize::Zeroize;

use crate::kdf::{hkdf_expand, hkdf_extract};
use crate::suite::{AeadKind, CipherSuite, NONCE_LEN};

const KEY_LABEL: &[u8] = b"SFrame10 key";
const SALT_LABEL: &[u8] = b"SFrame10 salt";
const ENC_LABEL: &[u8] = b"SFrame10 enc";
const AUTH_LABEL: &[u8] = b"SFrame10 auth";

/// Working key material for one key identifier.
///
/// Immutable after derivation; zeroized on drop.
pub struct FrameKey {
    suite: CipherSuite,
    enc_key: Vec<u8>,
    auth_key: Option<Vec<u8>>,
    salt: [u8; NONCE_LEN],
}

impl FrameKey {
    /// Expand a base secret into working key material for `suite`.
    ///
    /// The base secret may be of any length.
    #[must_use]
    pub fn derive(suite: CipherSuite, base_secret: &[u8]) -> Self {
        let hash = suite.hash();

        let mut frame_secret = hkdf_extract(hash, &[], base_secret);
        let mut enc_key = hkdf_expand(hash, &frame_secret, KEY_LABEL, suite.key_len());
        let mut salt_bytes = hkdf_expand(hash, &frame_secret, SALT_LABEL, suite.nonce_len());
        frame_secret.zeroize();

        let mut salt = [0u8; NONCE_LEN];
        salt.copy_from_slice(&salt_bytes);
        salt_bytes.zeroize();

        let auth_key = match suite.aead() {
            AeadKind::Gcm => None,
            AeadKind::CtrHmac => {
                // The first-stage enc_key acts as a PRK for the subkey split
                let auth = hkdf_expand(hash, &enc_key, AUTH_LABEL, suite.hash_len());
                let enc = hkdf_expand(hash, &enc_key, ENC_LABEL, suite.key_len());
                enc_key.zeroize();
                enc_key = enc;
                Some(auth)
            },
        };

        Self { suite, enc_key, auth_key, salt }
    }

    /// Suite this key was derived for.
    #[must_use]
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Encryption key (AES-CTR or AES-GCM key, per suite).
    #[must_use]
    pub fn enc_key(&self) -> &[u8] {
        &self.enc_key
    }

    /// Authentication key. `None` for GCM suites.
    #[must_use]
    pub fn auth_key(&self) -> Option<&[u8]> {
        self.auth_key.as_deref()
    }

    /// Deterministic per-frame nonce: salt XOR big-endian counter.
    ///
    /// The counter occupies the low 8 bytes of the 12-byte nonce,
    /// right-aligned.
    #[must_use]
    pub fn nonce(&self, counter: u64) -> [u8; NONCE_LEN] {
        let mut nonce = self.salt;
        for (byte, ctr) in nonce[NONCE_LEN - 8..].iter_mut().zip(counter.to_be_bytes()) {
            *byte ^= ctr;
        }
        nonce
    }
}

impl Drop for FrameKey {
    fn drop(&mut self) {
        self.enc_key.zeroize();
        if let Some(auth_key) = &mut self.auth_key {
            auth_key.zeroize();
        }
        self.salt.zeroize();
    }
}
