//! Cipher-suite registry.
//!
//! A suite selects the hash, the AEAD construction, and the key/nonce/tag
//! geometry for every operation in the library. The registry is a closed
//! enumeration: new suites are added here and nowhere else, so every
//! dispatch site is checked for exhaustiveness at compile time.

use std::fmt::{Display, Formatter};

use crate::error::CryptoError;

/// Nonce length shared by every registered suite (12 bytes)
pub const NONCE_LEN: usize = 12;

/// Registered cipher suites
///
/// The discriminants are the wire values used when suites are negotiated
/// out of band; they are stable and must not be renumbered.
#[allow(non_camel_case_types)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CipherSuite {
    /// AES-CTR-128 encryption + HMAC-SHA-256 tag truncated to 4 bytes
    AesCm128HmacSha256_4 = 1,
    /// AES-CTR-128 encryption + HMAC-SHA-256 tag truncated to 8 bytes
    AesCm128HmacSha256_8 = 2,
    /// AES-GCM-128 with SHA-256 key schedule
    AesGcm128Sha256 = 3,
    /// AES-GCM-256 with SHA-512 key schedule
    AesGcm256Sha512 = 4,
}

/// Hash function backing a suite's key schedule and MAC
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HashKind {
    /// SHA-256 (32-byte output)
    Sha256,
    /// SHA-512 (64-byte output)
    Sha512,
}

impl HashKind {
    /// Digest output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }
}

/// AEAD construction used by a suite
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AeadKind {
    /// Synthesized AEAD: AES-CTR keystream + truncated HMAC tag
    CtrHmac,
    /// AES-GCM with its native 16-byte tag
    Gcm,
}

impl TryFrom<u16> for CipherSuite {
    type Error = CryptoError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::AesCm128HmacSha256_4),
            2 => Ok(Self::AesCm128HmacSha256_8),
            3 => Ok(Self::AesGcm128Sha256),
            4 => Ok(Self::AesGcm256Sha512),
            value => Err(CryptoError::UnknownCipherSuite { value }),
        }
    }
}

impl Display for CipherSuite {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl CipherSuite {
    /// Hash backing the key schedule and (for CTR suites) the MAC.
    #[must_use]
    pub const fn hash(self) -> HashKind {
        match self {
            Self::AesCm128HmacSha256_4 | Self::AesCm128HmacSha256_8 | Self::AesGcm128Sha256 => {
                HashKind::Sha256
            },
            Self::AesGcm256Sha512 => HashKind::Sha512,
        }
    }

    /// AEAD construction.
    #[must_use]
    pub const fn aead(self) -> AeadKind {
        match self {
            Self::AesCm128HmacSha256_4 | Self::AesCm128HmacSha256_8 => AeadKind::CtrHmac,
            Self::AesGcm128Sha256 | Self::AesGcm256Sha512 => AeadKind::Gcm,
        }
    }

    /// Encryption key length in bytes.
    #[must_use]
    pub const fn key_len(self) -> usize {
        match self {
            Self::AesCm128HmacSha256_4 | Self::AesCm128HmacSha256_8 | Self::AesGcm128Sha256 => 16,
            Self::AesGcm256Sha512 => 32,
        }
    }

    /// Nonce length in bytes (12 for every registered suite).
    #[must_use]
    pub const fn nonce_len(self) -> usize {
        NONCE_LEN
    }

    /// Authentication tag length in bytes.
    #[must_use]
    pub const fn tag_len(self) -> usize {
        match self {
            Self::AesCm128HmacSha256_4 => 4,
            Self::AesCm128HmacSha256_8 => 8,
            Self::AesGcm128Sha256 | Self::AesGcm256Sha512 => 16,
        }
    }

    /// Hash output length in bytes.
    #[must_use]
    pub const fn hash_len(self) -> usize {
        self.hash().output_len()
    }
}
