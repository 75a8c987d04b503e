//! HKDF extract/expand over the suite's hash.
//!
//! The expand half is written against the `hmac` crate directly (RFC 5869
//! §2.3) because the frame-key subkey schedule expands from a PRK that is
//! shorter than the hash output (a 16-byte AES key), which
//! `hkdf::Hkdf::from_prk` rejects. Extract goes through the `hkdf` crate.

use hkdf::Hkdf;
use hmac::digest::KeyInit;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha512};
use zeroize::Zeroize;

use crate::suite::HashKind;

/// HKDF-Extract: condense input keying material into a PRK.
///
/// An empty `salt` is treated as the RFC's "salt not provided" case.
#[must_use]
pub fn hkdf_extract(hash: HashKind, salt: &[u8], ikm: &[u8]) -> Vec<u8> {
    let salt = (!salt.is_empty()).then_some(salt);
    match hash {
        HashKind::Sha256 => Hkdf::<Sha256>::extract(salt, ikm).0.to_vec(),
        HashKind::Sha512 => Hkdf::<Sha512>::extract(salt, ikm).0.to_vec(),
    }
}

/// HKDF-Expand: stretch `prk` into `out_len` bytes bound to `info`.
///
/// Accepts a PRK of any length (the subkey schedule relies on this).
/// `out_len` must not exceed `255 * hash_len`; every caller in this crate
/// asks for at most one hash block.
#[must_use]
pub fn hkdf_expand(hash: HashKind, prk: &[u8], info: &[u8], out_len: usize) -> Vec<u8> {
    match hash {
        HashKind::Sha256 => expand::<Hmac<Sha256>>(prk, info, out_len),
        HashKind::Sha512 => expand::<Hmac<Sha512>>(prk, info, out_len),
    }
}

fn expand<M: Mac + KeyInit>(prk: &[u8], info: &[u8], out_len: usize) -> Vec<u8> {
    debug_assert!(out_len <= 255 * M::output_size());

    let mut okm = Vec::with_capacity(out_len);
    let mut block: Vec<u8> = Vec::new();
    let mut counter: u8 = 1;
    while okm.len() < out_len {
        let Ok(mut mac) = <M as Mac>::new_from_slice(prk) else {
            unreachable!("HMAC accepts keys of any length");
        };
        mac.update(&block);
        mac.update(info);
        mac.update(&[counter]);
        block = mac.finalize().into_bytes().to_vec();

        let take = block.len().min(out_len - okm.len());
        okm.extend_from_slice(&block[..take]);
        counter = counter.wrapping_add(1);
    }
    block.zeroize();

    okm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc5869_test_case_1() {
        // RFC 5869 Appendix A.1 (SHA-256)
        let ikm = hex::decode("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b").unwrap();
        let salt = hex::decode("000102030405060708090a0b0c").unwrap();
        let info = hex::decode("f0f1f2f3f4f5f6f7f8f9").unwrap();

        let prk = hkdf_extract(HashKind::Sha256, &salt, &ikm);
        assert_eq!(
            prk,
            hex::decode("077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5")
                .unwrap()
        );

        let okm = hkdf_expand(HashKind::Sha256, &prk, &info, 42);
        assert_eq!(
            okm,
            hex::decode(
                "3cb25f25faacd57a90434f64d0362f2a2d2d0a90cf1a5a4c5db02d56ecc4c5bf34007208d5b887185865"
            )
            .unwrap()
        );
    }

    #[test]
    fn rfc5869_test_case_3() {
        // RFC 5869 Appendix A.3: zero-length salt and info
        let ikm = hex::decode("0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b").unwrap();

        let prk = hkdf_extract(HashKind::Sha256, &[], &ikm);
        let okm = hkdf_expand(HashKind::Sha256, &prk, &[], 42);
        assert_eq!(
            okm,
            hex::decode(
                "8da4e775a563c18f715f802a063c5a31b8a11f5c5ee1879ec3454e5f3c738d2d9d201395faa4b61a96c8"
            )
            .unwrap()
        );
    }

    #[test]
    fn expand_accepts_short_prk() {
        // A 16-byte PRK is shorter than the SHA-256 output; the subkey
        // schedule depends on this working
        let prk = [0x42u8; 16];
        let okm = hkdf_expand(HashKind::Sha256, &prk, b"label", 32);
        assert_eq!(okm.len(), 32);
        assert_eq!(okm, hkdf_expand(HashKind::Sha256, &prk, b"label", 32));
    }

    #[test]
    fn expand_is_label_separated() {
        let prk = hkdf_extract(HashKind::Sha512, b"salt", b"secret");
        let a = hkdf_expand(HashKind::Sha512, &prk, b"label-a", 32);
        let b = hkdf_expand(HashKind::Sha512, &prk, b"label-b", 32);
        assert_ne!(a, b);
    }

    #[test]
    fn expand_prefix_consistency() {
        // Longer outputs extend shorter ones for the same (prk, info)
        let prk = hkdf_extract(HashKind::Sha256, &[], b"secret");
        let short = hkdf_expand(HashKind::Sha256, &prk, b"info", 16);
        let long = hkdf_expand(HashKind::Sha256, &prk, b"info", 64);
        assert_eq!(short, long[..16]);
    }
}
