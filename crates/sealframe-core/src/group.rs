//! Group-keying adapter.
//!
//! Maps the epochs of an external group-keying protocol (MLS-style) onto
//! frame keys. Each epoch carries a secret shared by the whole group; every
//! sender gets its own frame key derived from that secret, registered in a
//! private [`Context`] under a compound key identifier:
//!
//! ```text
//! key id = sender_id << epoch_bits | epoch_id mod 2^epoch_bits
//! ```
//!
//! Only the last `2^epoch_bits` epochs are retained, in a ring indexed by
//! the low bits of the epoch id. Installing an epoch evicts the slot's
//! previous occupant and purges its derived keys, so frames from evicted
//! epochs can no longer be decrypted.
//!
//! Per-sender keys are derived lazily on first use in either direction,
//! which makes `unprotect` a writer operation here, unlike on [`Context`].

use std::collections::HashSet;

use sealframe_crypto::{kdf, CipherSuite};
use zeroize::Zeroize;

use crate::context::Context;
use crate::error::SframeError;
use crate::header::{Header, KeyId};

/// Epoch identifier assigned by the group-keying protocol
pub type EpochId = u64;

/// Stable per-member sender identifier
pub type SenderId = u64;

/// Label prefix for per-sender key derivation from an epoch secret
const SENDER_LABEL: &[u8] = b"SFrame10";

/// One retained epoch: its full id, its secret, and the senders whose
/// frame keys have already been derived from it.
struct EpochSlot {
    epoch_id: EpochId,
    secret: Vec<u8>,
    derived: HashSet<SenderId>,
}

impl Drop for EpochSlot {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// Frame protection context keyed by group epochs
pub struct GroupContext {
    epoch_bits: u8,
    slots: Vec<Option<EpochSlot>>,
    inner: Context,
}

impl GroupContext {
    /// Create a group context retaining `2^epoch_bits` epochs.
    ///
    /// # Errors
    ///
    /// - `SframeError::InvalidParameter` if `epoch_bits` is outside
    ///   `[1, 8]`
    pub fn new(suite: CipherSuite, epoch_bits: u8) -> Result<Self, SframeError> {
        if !(1..=8).contains(&epoch_bits) {
            return Err(SframeError::InvalidParameter {
                reason: "epoch_bits must be between 1 and 8",
            });
        }
        let slots = (0..1usize << epoch_bits).map(|_| None).collect();
        Ok(Self { epoch_bits, slots, inner: Context::new(suite) })
    }

    /// Suite every derived key uses.
    #[must_use]
    pub fn suite(&self) -> CipherSuite {
        self.inner.suite()
    }

    /// Install an epoch secret, evicting the slot's previous occupant.
    ///
    /// Evicting an epoch purges all of its derived frame keys: frames
    /// protected under it can no longer be decrypted. Reinstalling the
    /// epoch currently in the slot is idempotent when the secret matches.
    ///
    /// # Errors
    ///
    /// - `SframeError::InvalidParameter` if the slot already holds this
    ///   `epoch_id` with a different secret
    pub fn add_epoch(&mut self, epoch_id: EpochId, secret: &[u8]) -> Result<(), SframeError> {
        let index = self.slot_index(epoch_id);

        if let Some(current) = &self.slots[index] {
            if current.epoch_id == epoch_id {
                if current.secret == secret {
                    return Ok(());
                }
                return Err(SframeError::InvalidParameter {
                    reason: "epoch reinstalled with a different secret",
                });
            }
        }
        if self.slots[index].is_some() {
            self.purge_slot(index as u64);
        }

        self.slots[index] = Some(EpochSlot {
            epoch_id,
            secret: secret.to_vec(),
            derived: HashSet::new(),
        });
        Ok(())
    }

    /// Seal `plaintext` for `sender_id` under `epoch_id`.
    ///
    /// Derives the sender's frame key on first use, then delegates to the
    /// inner context; see [`Context::protect`] for buffer semantics.
    ///
    /// # Errors
    ///
    /// - `SframeError::UnknownEpoch` if `epoch_id` is not installed
    /// - `SframeError::InvalidParameter` if `sender_id` does not fit
    ///   beside the epoch index in the compound key id
    /// - plus every [`Context::protect`] error
    pub fn protect<'a>(
        &mut self,
        epoch_id: EpochId,
        sender_id: SenderId,
        ciphertext: &'a mut [u8],
        plaintext: &[u8],
    ) -> Result<&'a [u8], SframeError> {
        let index = self.slot_index(epoch_id);
        match &self.slots[index] {
            Some(slot) if slot.epoch_id == epoch_id => {},
            _ => return Err(SframeError::UnknownEpoch { slot: index as u64 }),
        }

        let key_id = self.ensure_sender_key(index, sender_id)?;
        self.inner.protect(key_id, ciphertext, plaintext)
    }

    /// Authenticate a frame from any live epoch and recover the payload.
    ///
    /// The compound key id in the header selects the epoch slot and the
    /// sender; the sender's key is derived on first sight. See
    /// [`Context::unprotect`] for buffer semantics.
    ///
    /// # Errors
    ///
    /// - `SframeError::UnknownEpoch` if the referenced slot is empty
    /// - plus every [`Context::unprotect`] error
    pub fn unprotect<'a>(
        &mut self,
        plaintext: &'a mut [u8],
        ciphertext: &[u8],
    ) -> Result<&'a [u8], SframeError> {
        let (header, _) = Header::decode(ciphertext)?;
        let index = (header.key_id & self.slot_mask()) as usize;
        let sender_id = header.key_id >> self.epoch_bits;

        self.ensure_sender_key(index, sender_id)?;
        self.inner.unprotect(plaintext, ciphertext)
    }

    fn slot_mask(&self) -> u64 {
        (1u64 << self.epoch_bits) - 1
    }

    fn slot_index(&self, epoch_id: EpochId) -> usize {
        (epoch_id & self.slot_mask()) as usize
    }

    /// Remove every inner key derived for the epoch occupying `slot`.
    fn purge_slot(&mut self, slot: u64) {
        let mask = self.slot_mask();
        self.inner.retain_keys(|key_id| key_id & mask != slot);
    }

    /// Derive and register the sender's frame key if it is not present,
    /// returning the compound key id.
    fn ensure_sender_key(
        &mut self,
        index: usize,
        sender_id: SenderId,
    ) -> Result<KeyId, SframeError> {
        let bits = u32::from(self.epoch_bits);
        if sender_id >> (64 - bits) != 0 {
            return Err(SframeError::InvalidParameter {
                reason: "sender id does not fit beside the epoch index",
            });
        }
        let key_id = (sender_id << bits) | index as u64;

        let Some(slot) = self.slots[index].as_ref() else {
            return Err(SframeError::UnknownEpoch { slot: index as u64 });
        };
        if slot.derived.contains(&sender_id) {
            debug_assert!(self.inner.has_key(key_id));
            return Ok(key_id);
        }

        let mut info = Vec::with_capacity(SENDER_LABEL.len() + 1 + 8);
        info.extend_from_slice(SENDER_LABEL);
        info.push(slot.epoch_id as u8);
        info.extend_from_slice(&sender_id.to_be_bytes());

        let suite = self.inner.suite();
        let mut base = kdf::hkdf_expand(suite.hash(), &slot.secret, &info, suite.hash_len());
        let added = self.inner.add_key(key_id, &base);
        base.zeroize();
        added?;

        if let Some(slot) = self.slots[index].as_mut() {
            slot.derived.insert(sender_id);
        }
        Ok(key_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_OVERHEAD;

    const SUITE: CipherSuite = CipherSuite::AesGcm128Sha256;
    const PLAINTEXT: &[u8] = b"group frame";

    fn seal(
        group: &mut GroupContext,
        epoch_id: EpochId,
        sender_id: SenderId,
    ) -> Vec<u8> {
        let mut buf = [0u8; PLAINTEXT.len() + MAX_OVERHEAD];
        group.protect(epoch_id, sender_id, &mut buf, PLAINTEXT).unwrap().to_vec()
    }

    #[test]
    fn epoch_bits_bounds() {
        assert!(GroupContext::new(SUITE, 0).is_err());
        assert!(GroupContext::new(SUITE, 9).is_err());
        for bits in 1..=8 {
            assert!(GroupContext::new(SUITE, bits).is_ok());
        }
    }

    #[test]
    fn protect_requires_installed_epoch() {
        let mut group = GroupContext::new(SUITE, 2).unwrap();
        let mut buf = [0u8; 64];
        assert_eq!(
            group.protect(0, 1, &mut buf, PLAINTEXT),
            Err(SframeError::UnknownEpoch { slot: 0 })
        );
    }

    #[test]
    fn cross_member_round_trip() {
        let mut alice = GroupContext::new(SUITE, 4).unwrap();
        let mut bob = GroupContext::new(SUITE, 4).unwrap();
        alice.add_epoch(1, b"epoch one secret").unwrap();
        bob.add_epoch(1, b"epoch one secret").unwrap();

        let sealed = seal(&mut alice, 1, 0xA0);
        let mut pt_buf = [0u8; 64];
        assert_eq!(bob.unprotect(&mut pt_buf, &sealed).unwrap(), PLAINTEXT);

        let sealed = seal(&mut bob, 1, 0xB0);
        assert_eq!(alice.unprotect(&mut pt_buf, &sealed).unwrap(), PLAINTEXT);
    }

    #[test]
    fn compound_key_id_layout() {
        let mut group = GroupContext::new(SUITE, 4).unwrap();
        group.add_epoch(3, b"secret").unwrap();

        let sealed = seal(&mut group, 3, 0xA5);
        let (header, _) = Header::decode(&sealed).unwrap();
        assert_eq!(header.key_id, (0xA5 << 4) | 3);
    }

    #[test]
    fn epoch_eviction_forgets_old_frames() {
        let bits = 2u8;
        let ring = 1u64 << bits;

        let mut sender = GroupContext::new(SUITE, bits).unwrap();
        let mut receiver = GroupContext::new(SUITE, bits).unwrap();
        sender.add_epoch(0, b"epoch 0").unwrap();
        receiver.add_epoch(0, b"epoch 0").unwrap();
        let old = seal(&mut sender, 0, 7);

        // A full ring of newer epochs overwrites slot 0's occupant
        for epoch_id in 1..=ring {
            receiver.add_epoch(epoch_id, b"newer epoch").unwrap();
        }

        let mut pt_buf = [0u8; 64];
        assert_eq!(
            receiver.unprotect(&mut pt_buf, &old),
            Err(SframeError::AuthenticationFailure)
        );
    }

    #[test]
    fn evicted_slot_does_not_leak_keys() {
        // After eviction the slot's derived keys are purged, so a frame
        // from the evicted epoch authenticates against the new epoch's
        // freshly derived key and fails
        let mut receiver = GroupContext::new(SUITE, 1).unwrap();
        let mut sender = GroupContext::new(SUITE, 1).unwrap();
        sender.add_epoch(0, b"first").unwrap();
        receiver.add_epoch(0, b"first").unwrap();

        let old = seal(&mut sender, 0, 1);
        let mut pt_buf = [0u8; 64];
        assert!(receiver.unprotect(&mut pt_buf, &old).is_ok());

        receiver.add_epoch(2, b"second occupies slot 0").unwrap();
        assert!(receiver.unprotect(&mut pt_buf, &old).is_err());
    }

    #[test]
    fn reinstall_same_epoch() {
        let mut group = GroupContext::new(SUITE, 2).unwrap();
        group.add_epoch(5, b"secret").unwrap();
        assert_eq!(group.add_epoch(5, b"secret"), Ok(()));
        assert_eq!(
            group.add_epoch(5, b"different secret"),
            Err(SframeError::InvalidParameter {
                reason: "epoch reinstalled with a different secret"
            })
        );
    }

    #[test]
    fn reinstall_keeps_derived_keys_usable() {
        let mut sender = GroupContext::new(SUITE, 2).unwrap();
        let mut receiver = GroupContext::new(SUITE, 2).unwrap();
        sender.add_epoch(1, b"secret").unwrap();
        receiver.add_epoch(1, b"secret").unwrap();

        let first = seal(&mut sender, 1, 3);
        let mut pt_buf = [0u8; 64];
        receiver.unprotect(&mut pt_buf, &first).unwrap();

        receiver.add_epoch(1, b"secret").unwrap();
        let second = seal(&mut sender, 1, 3);
        assert_eq!(receiver.unprotect(&mut pt_buf, &second).unwrap(), PLAINTEXT);
    }

    #[test]
    fn oversized_sender_id_rejected() {
        let mut group = GroupContext::new(SUITE, 8).unwrap();
        group.add_epoch(0, b"secret").unwrap();

        let mut buf = [0u8; 64];
        assert_eq!(
            group.protect(0, 1 << 56, &mut buf, PLAINTEXT),
            Err(SframeError::InvalidParameter {
                reason: "sender id does not fit beside the epoch index"
            })
        );
    }

    #[test]
    fn sender_counters_survive_within_epoch() {
        let mut group = GroupContext::new(SUITE, 2).unwrap();
        group.add_epoch(0, b"secret").unwrap();

        for expected in 0..3u64 {
            let sealed = seal(&mut group, 0, 9);
            let (header, _) = Header::decode(&sealed).unwrap();
            assert_eq!(header.counter, expected);
        }
    }
}
