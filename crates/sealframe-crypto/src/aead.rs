//! AEAD constructions over caller-owned buffers.
//!
//! Both constructions work in place with detached tags: `seal` encrypts
//! `data` and writes the tag into a separate slice, `open` verifies the tag
//! and then decrypts. Nothing here allocates on the frame path.
//!
//! GCM suites use AES-GCM as-is. CTR+HMAC suites synthesize an AEAD from an
//! AES-CTR keystream and an HMAC tag truncated to the suite's tag length,
//! computed over a length-framed transcript of the associated data, the
//! ciphertext, and the nonce.

use aes::Aes128;
use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Aes128Gcm, Aes256Gcm, KeyInit, Nonce, Tag};
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::digest::KeyInit as MacKeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};

use crate::error::CryptoError;
use crate::keys::FrameKey;
use crate::suite::{AeadKind, CipherSuite, HashKind, NONCE_LEN};

/// Initial AES-CTR block counter for the keystream (normative wire constant)
const CTR_BLOCK_START: u32 = 2;

type Aes128Ctr = ctr::Ctr32BE<Aes128>;

/// Encrypt `data` in place and write the detached tag.
///
/// `tag` must be exactly `suite.tag_len()` bytes; callers size it from the
/// suite before dispatching here.
///
/// # Errors
///
/// - `CryptoError::InvalidKeyLength` if the key does not match the suite
pub fn seal(
    key: &FrameKey,
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    data: &mut [u8],
    tag: &mut [u8],
) -> Result<(), CryptoError> {
    let suite = key.suite();
    debug_assert_eq!(tag.len(), suite.tag_len());

    match suite.aead() {
        AeadKind::Gcm => {
            let full = gcm_seal(suite, key.enc_key(), nonce, aad, data)?;
            tag.copy_from_slice(&full);
        },
        AeadKind::CtrHmac => {
            ctr_xor(suite, key.enc_key(), nonce, data)?;
            let full = compute_tag(suite.hash(), auth_key(key), tag.len(), aad, data, nonce);
            tag.copy_from_slice(&full[..tag.len()]);
        },
    }
    Ok(())
}

/// Verify the detached tag and decrypt `data` in place.
///
/// On `AuthenticationFailure` the CTR+HMAC path leaves `data` untouched;
/// the GCM path may leave partially transformed bytes behind. Callers must
/// not consume the buffer after a failure either way.
///
/// # Errors
///
/// - `CryptoError::AuthenticationFailure` on tag mismatch
/// - `CryptoError::InvalidKeyLength` if the key does not match the suite
pub fn open(
    key: &FrameKey,
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    data: &mut [u8],
    tag: &[u8],
) -> Result<(), CryptoError> {
    let suite = key.suite();
    debug_assert_eq!(tag.len(), suite.tag_len());

    match suite.aead() {
        AeadKind::Gcm => gcm_open(suite, key.enc_key(), nonce, aad, data, tag),
        AeadKind::CtrHmac => {
            verify_tag(suite.hash(), auth_key(key), tag.len(), aad, data, nonce, tag)?;
            ctr_xor(suite, key.enc_key(), nonce, data)
        },
    }
}

fn auth_key(key: &FrameKey) -> &[u8] {
    let Some(auth_key) = key.auth_key() else {
        unreachable!("CTR+HMAC keys always carry an auth key");
    };
    auth_key
}

fn gcm_seal(
    suite: CipherSuite,
    enc_key: &[u8],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    data: &mut [u8],
) -> Result<Tag, CryptoError> {
    let nonce = Nonce::from_slice(nonce);
    let result = match suite {
        CipherSuite::AesGcm128Sha256 => {
            let cipher = new_gcm::<Aes128Gcm>(suite, enc_key)?;
            cipher.encrypt_in_place_detached(nonce, aad, data)
        },
        CipherSuite::AesGcm256Sha512 => {
            let cipher = new_gcm::<Aes256Gcm>(suite, enc_key)?;
            cipher.encrypt_in_place_detached(nonce, aad, data)
        },
        CipherSuite::AesCm128HmacSha256_4 | CipherSuite::AesCm128HmacSha256_8 => {
            unreachable!("CTR suites never reach the GCM path")
        },
    };
    let Ok(tag) = result else {
        unreachable!("frame length is within AES-GCM bounds");
    };
    Ok(tag)
}

fn gcm_open(
    suite: CipherSuite,
    enc_key: &[u8],
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    data: &mut [u8],
    tag: &[u8],
) -> Result<(), CryptoError> {
    let nonce = Nonce::from_slice(nonce);
    let tag = Tag::from_slice(tag);
    let result = match suite {
        CipherSuite::AesGcm128Sha256 => {
            let cipher = new_gcm::<Aes128Gcm>(suite, enc_key)?;
            cipher.decrypt_in_place_detached(nonce, aad, data, tag)
        },
        CipherSuite::AesGcm256Sha512 => {
            let cipher = new_gcm::<Aes256Gcm>(suite, enc_key)?;
            cipher.decrypt_in_place_detached(nonce, aad, data, tag)
        },
        CipherSuite::AesCm128HmacSha256_4 | CipherSuite::AesCm128HmacSha256_8 => {
            unreachable!("CTR suites never reach the GCM path")
        },
    };
    result.map_err(|_| CryptoError::AuthenticationFailure)
}

fn new_gcm<C: KeyInit>(suite: CipherSuite, enc_key: &[u8]) -> Result<C, CryptoError> {
    C::new_from_slice(enc_key).map_err(|_| CryptoError::InvalidKeyLength {
        expected: suite.key_len(),
        actual: enc_key.len(),
    })
}

/// XOR the AES-CTR keystream into `data`.
///
/// The 16-byte initial counter block is the 12-byte nonce followed by the
/// 32-bit big-endian block counter starting at [`CTR_BLOCK_START`].
fn ctr_xor(
    suite: CipherSuite,
    enc_key: &[u8],
    nonce: &[u8; NONCE_LEN],
    data: &mut [u8],
) -> Result<(), CryptoError> {
    let mut block = [0u8; 16];
    block[..NONCE_LEN].copy_from_slice(nonce);
    block[NONCE_LEN..].copy_from_slice(&CTR_BLOCK_START.to_be_bytes());

    let Ok(mut cipher) = Aes128Ctr::new_from_slices(enc_key, &block) else {
        return Err(CryptoError::InvalidKeyLength {
            expected: suite.key_len(),
            actual: enc_key.len(),
        });
    };
    cipher.apply_keystream(data);
    Ok(())
}

fn compute_tag(
    hash: HashKind,
    auth_key: &[u8],
    tag_len: usize,
    aad: &[u8],
    ct: &[u8],
    nonce: &[u8; NONCE_LEN],
) -> Vec<u8> {
    match hash {
        HashKind::Sha256 => transcript_mac::<Hmac<Sha256>>(auth_key, tag_len, aad, ct, nonce)
            .finalize()
            .into_bytes()
            .to_vec(),
        HashKind::Sha512 => transcript_mac::<Hmac<Sha512>>(auth_key, tag_len, aad, ct, nonce)
            .finalize()
            .into_bytes()
            .to_vec(),
    }
}

#[allow(clippy::too_many_arguments)]
fn verify_tag(
    hash: HashKind,
    auth_key: &[u8],
    tag_len: usize,
    aad: &[u8],
    ct: &[u8],
    nonce: &[u8; NONCE_LEN],
    tag: &[u8],
) -> Result<(), CryptoError> {
    let result = match hash {
        HashKind::Sha256 => transcript_mac::<Hmac<Sha256>>(auth_key, tag_len, aad, ct, nonce)
            .verify_truncated_left(tag),
        HashKind::Sha512 => transcript_mac::<Hmac<Sha512>>(auth_key, tag_len, aad, ct, nonce)
            .verify_truncated_left(tag),
    };
    result.map_err(|_| CryptoError::AuthenticationFailure)
}

/// HMAC over the length-framed tag transcript:
/// `be64(|aad|) || be64(|ct|) || be64(tag_len) || aad || ct || nonce`.
fn transcript_mac<M: Mac + MacKeyInit>(
    auth_key: &[u8],
    tag_len: usize,
    aad: &[u8],
    ct: &[u8],
    nonce: &[u8; NONCE_LEN],
) -> M {
    let Ok(mut mac) = <M as Mac>::new_from_slice(auth_key) else {
        unreachable!("HMAC accepts keys of any length");
    };
    mac.update(&(aad.len() as u64).to_be_bytes());
    mac.update(&(ct.len() as u64).to_be_bytes());
    mac.update(&(tag_len as u64).to_be_bytes());
    mac.update(aad);
    mac.update(ct);
    mac.update(nonce);
    mac
}
