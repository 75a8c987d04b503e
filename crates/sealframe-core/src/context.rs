//! Frame protection context.
//!
//! A [`Context`] owns the key states for one direction of a media session:
//! a map from key identifier to derived key material plus a per-key send
//! counter. `protect` is the only operation that mutates state (it consumes
//! one counter value per sealed frame); `unprotect` is read-only and may
//! run concurrently with other `unprotect` calls.

use std::collections::HashMap;

use sealframe_crypto::{aead, CipherSuite, FrameKey};

use crate::error::SframeError;
use crate::header::{Counter, Header, KeyId};

/// Per-key state: derived key material plus the send counter.
///
/// The key material is immutable after creation; only the counter advances.
struct KeyState {
    key: FrameKey,
    send_ctr: Counter,
}

/// Frame encryption/decryption context for a set of key identifiers
pub struct Context {
    suite: CipherSuite,
    keys: HashMap<KeyId, KeyState>,
}

impl Context {
    /// Create an empty context for `suite`.
    #[must_use]
    pub fn new(suite: CipherSuite) -> Self {
        Self { suite, keys: HashMap::new() }
    }

    /// Suite every key in this context is derived for.
    #[must_use]
    pub fn suite(&self) -> CipherSuite {
        self.suite
    }

    /// Derive and register key material for `key_id`.
    ///
    /// The base secret may be of any length; it is expanded through the
    /// suite's key schedule before use.
    ///
    /// # Errors
    ///
    /// - `SframeError::DuplicateKey` if `key_id` is already registered
    pub fn add_key(&mut self, key_id: KeyId, base_secret: &[u8]) -> Result<(), SframeError> {
        if self.keys.contains_key(&key_id) {
            return Err(SframeError::DuplicateKey { key_id });
        }
        let key = FrameKey::derive(self.suite, base_secret);
        self.keys.insert(key_id, KeyState { key, send_ctr: 0 });
        Ok(())
    }

    /// Seal `plaintext` under `key_id` into `ciphertext`.
    ///
    /// Writes header ‖ encrypted payload ‖ tag into the front of
    /// `ciphertext` and returns the written prefix. Each successful call
    /// consumes one counter value; failed calls consume nothing.
    ///
    /// # Errors
    ///
    /// - `SframeError::UnknownKey` if `key_id` is not registered
    /// - `SframeError::BufferTooSmall` if `ciphertext` cannot hold
    ///   header + payload + tag
    /// - `SframeError::InvalidParameter` if `key_id` or the counter has
    ///   outgrown the header encoding
    pub fn protect<'a>(
        &mut self,
        key_id: KeyId,
        ciphertext: &'a mut [u8],
        plaintext: &[u8],
    ) -> Result<&'a [u8], SframeError> {
        let tag_len = self.suite.tag_len();
        let state = self.keys.get_mut(&key_id).ok_or(SframeError::UnknownKey { key_id })?;

        let header = Header { key_id, counter: state.send_ctr };
        let header_len = header.encode(ciphertext)?;

        let total = header_len + plaintext.len() + tag_len;
        if ciphertext.len() < total {
            return Err(SframeError::BufferTooSmall { needed: total, available: ciphertext.len() });
        }

        let nonce = state.key.nonce(header.counter);
        let (head, rest) = ciphertext.split_at_mut(header_len);
        let (body, tail) = rest.split_at_mut(plaintext.len());
        body.copy_from_slice(plaintext);
        aead::seal(&state.key, &nonce, head, body, &mut tail[..tag_len])?;

        // The counter is consumed only once the frame is fully sealed
        state.send_ctr += 1;

        Ok(&ciphertext[..total])
    }

    /// Authenticate `ciphertext` and recover the payload into `plaintext`.
    ///
    /// Returns the written prefix of `plaintext`. After an authentication
    /// failure the contents of `plaintext` are unspecified and must not be
    /// consumed.
    ///
    /// # Errors
    ///
    /// - `SframeError::ShortCiphertext` if the input cannot hold the
    ///   declared header and tag
    /// - `SframeError::UnknownKey` if the header's key id is not registered
    /// - `SframeError::BufferTooSmall` if `plaintext` cannot hold the
    ///   payload
    /// - `SframeError::AuthenticationFailure` on tag mismatch
    pub fn unprotect<'a>(
        &self,
        plaintext: &'a mut [u8],
        ciphertext: &[u8],
    ) -> Result<&'a [u8], SframeError> {
        let (header, header_len) = Header::decode(ciphertext)?;
        let tag_len = self.suite.tag_len();

        if ciphertext.len() < header_len + tag_len {
            return Err(SframeError::ShortCiphertext {
                needed: header_len + tag_len,
                available: ciphertext.len(),
            });
        }
        let body_len = ciphertext.len() - header_len - tag_len;

        let state = self
            .keys
            .get(&header.key_id)
            .ok_or(SframeError::UnknownKey { key_id: header.key_id })?;

        if plaintext.len() < body_len {
            return Err(SframeError::BufferTooSmall {
                needed: body_len,
                available: plaintext.len(),
            });
        }

        let nonce = state.key.nonce(header.counter);
        let (aad, rest) = ciphertext.split_at(header_len);
        let (body, tag) = rest.split_at(body_len);

        let out = &mut plaintext[..body_len];
        out.copy_from_slice(body);
        aead::open(&state.key, &nonce, aad, out, tag)?;

        Ok(&plaintext[..body_len])
    }

    /// Whether `key_id` is registered.
    pub(crate) fn has_key(&self, key_id: KeyId) -> bool {
        self.keys.contains_key(&key_id)
    }

    /// Drop every key state whose id fails the predicate.
    pub(crate) fn retain_keys(&mut self, mut keep: impl FnMut(KeyId) -> bool) {
        self.keys.retain(|&key_id, _| keep(key_id));
    }
}
