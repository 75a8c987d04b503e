//! Frame header codec.
//!
//! The header prefixes every protected frame with the key identifier and
//! the per-key send counter, both as minimal big-endian integers behind a
//! single config byte:
//!
//! ```text
//! +-+-+-+-+-+-+-+-+---------------+------------------+
//! |  CLEN |X| KBITS | KID (0 or KLEN bytes) | CTR (CLEN bytes) |
//! +-+-+-+-+-+-+-+-+---------------+------------------+
//! ```
//!
//! `CLEN` (3 bits) is the counter's byte length. When the key id fits in
//! 3 bits, `X = 0` and `KBITS` holds it directly with no key-id bytes on
//! the wire. Otherwise `X = 1`, `KBITS` holds the key id's byte length
//! `KLEN`, and the key id follows. A counter of zero still occupies one
//! zero byte.
//!
//! The 3-bit length fields bound both integers to 7 bytes: values of
//! `2^56` or more are not encodable and are rejected before any state
//! changes.

use crate::error::SframeError;

/// Key identifier carried in the header
pub type KeyId = u64;

/// Per-key send counter carried in the header
pub type Counter = u64;

/// Largest value either header integer can carry (7 bytes)
const MAX_UINT: u64 = (1 << 56) - 1;

/// Largest encoded header: config byte + 7-byte key id + 7-byte counter
pub const MAX_HEADER_LEN: usize = 1 + 7 + 7;

/// Decoded frame header
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Header {
    /// Key identifier
    pub key_id: KeyId,
    /// Per-key send counter
    pub counter: Counter,
}

impl Header {
    /// Number of bytes this header occupies on the wire.
    ///
    /// # Errors
    ///
    /// - `SframeError::InvalidParameter` if the key id or counter is
    ///   `2^56` or larger
    pub fn encoded_len(&self) -> Result<usize, SframeError> {
        if self.key_id > MAX_UINT || self.counter > MAX_UINT {
            return Err(SframeError::InvalidParameter {
                reason: "key id or counter exceeds the 7-byte header field",
            });
        }
        let kid_len = if self.key_id > 0x07 { uint_len(self.key_id) } else { 0 };
        Ok(1 + kid_len + uint_len(self.counter))
    }

    /// Encode into the front of `buf`, returning the encoded length.
    ///
    /// # Errors
    ///
    /// - `SframeError::InvalidParameter` if the key id or counter is
    ///   `2^56` or larger
    /// - `SframeError::BufferTooSmall` if `buf` cannot hold the header
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, SframeError> {
        let total = self.encoded_len()?;
        if buf.len() < total {
            return Err(SframeError::BufferTooSmall { needed: total, available: buf.len() });
        }

        let ctr_len = uint_len(self.counter);
        let kid_len = total - 1 - ctr_len;

        let mut config = (ctr_len as u8) << 4;
        if self.key_id <= 0x07 {
            config |= self.key_id as u8;
        } else {
            config |= 0x08 | kid_len as u8;
            put_uint(self.key_id, &mut buf[1..1 + kid_len]);
        }
        buf[0] = config;
        put_uint(self.counter, &mut buf[1 + kid_len..total]);

        Ok(total)
    }

    /// Decode from the front of `buf`, returning the header and the number
    /// of bytes it consumed.
    ///
    /// # Errors
    ///
    /// - `SframeError::ShortCiphertext` if `buf` holds fewer bytes than
    ///   the config byte declares
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), SframeError> {
        let Some(&config) = buf.first() else {
            return Err(SframeError::ShortCiphertext { needed: 1, available: 0 });
        };

        let ctr_len = usize::from((config >> 4) & 0x07);
        let long_kid = config & 0x08 != 0;
        let kid_bits = u64::from(config & 0x07);
        let kid_len = if long_kid { kid_bits as usize } else { 0 };

        let total = 1 + kid_len + ctr_len;
        if buf.len() < total {
            return Err(SframeError::ShortCiphertext { needed: total, available: buf.len() });
        }

        let key_id = if long_kid { get_uint(&buf[1..1 + kid_len]) } else { kid_bits };
        let counter = get_uint(&buf[1 + kid_len..total]);

        Ok((Self { key_id, counter }, total))
    }
}

/// Minimal big-endian byte length of `value`; zero occupies one byte.
fn uint_len(value: u64) -> usize {
    let mut len = 1;
    while len < 8 && value >> (8 * len) != 0 {
        len += 1;
    }
    len
}

/// Write `value` big-endian into `buf` (sized to `uint_len(value)`).
fn put_uint(value: u64, buf: &mut [u8]) {
    let be = value.to_be_bytes();
    buf.copy_from_slice(&be[8 - buf.len()..]);
}

fn get_uint(buf: &[u8]) -> u64 {
    buf.iter().fold(0, |acc, &byte| (acc << 8) | u64::from(byte))
}
