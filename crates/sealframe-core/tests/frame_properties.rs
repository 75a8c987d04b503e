//! Property-based tests for frame protection.
//!
//! These verify the invariants that must hold for ALL inputs, not just the
//! known-answer vectors:
//!
//! 1. **Round-trip**: unprotect(protect(m)) == m for every suite and payload
//! 2. **Counter monotonicity**: the Nth frame carries counter N
//! 3. **Tamper rejection**: flipping any bit makes unprotect fail
//! 4. **Key isolation**: frames never decrypt under a context that lacks
//!    the sending key

use proptest::prelude::*;
use sealframe_core::{CipherSuite, Context, Header, SframeError, MAX_OVERHEAD};

const ALL_SUITES: [CipherSuite; 4] = [
    CipherSuite::AesCm128HmacSha256_4,
    CipherSuite::AesCm128HmacSha256_8,
    CipherSuite::AesGcm128Sha256,
    CipherSuite::AesGcm256Sha512,
];

fn arbitrary_suite() -> impl Strategy<Value = CipherSuite> {
    prop_oneof![
        Just(CipherSuite::AesCm128HmacSha256_4),
        Just(CipherSuite::AesCm128HmacSha256_8),
        Just(CipherSuite::AesGcm128Sha256),
        Just(CipherSuite::AesGcm256Sha512),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_round_trip(
        suite in arbitrary_suite(),
        key_id in 0u64..(1 << 56),
        base_secret in prop::collection::vec(any::<u8>(), 1..64),
        plaintext in prop::collection::vec(any::<u8>(), 0..1000),
    ) {
        let mut send = Context::new(suite);
        send.add_key(key_id, &base_secret).unwrap();
        let mut recv = Context::new(suite);
        recv.add_key(key_id, &base_secret).unwrap();

        let mut ct_buf = vec![0u8; plaintext.len() + MAX_OVERHEAD];
        let mut pt_buf = vec![0u8; plaintext.len()];

        let sealed = send.protect(key_id, &mut ct_buf, &plaintext).unwrap().to_vec();
        prop_assert_eq!(sealed.len(), recv.suite().tag_len() + plaintext.len()
            + Header { key_id, counter: 0 }.encoded_len().unwrap());

        let opened = recv.unprotect(&mut pt_buf, &sealed).unwrap();
        prop_assert_eq!(opened, plaintext);
    }

    #[test]
    fn prop_tamper_rejected(
        suite in arbitrary_suite(),
        plaintext in prop::collection::vec(any::<u8>(), 1..256),
        bit in any::<prop::sample::Index>(),
    ) {
        let mut send = Context::new(suite);
        send.add_key(7, b"tamper key").unwrap();
        let recv = {
            let mut ctx = Context::new(suite);
            ctx.add_key(7, b"tamper key").unwrap();
            ctx
        };

        let mut ct_buf = vec![0u8; plaintext.len() + MAX_OVERHEAD];
        let mut sealed = send.protect(7, &mut ct_buf, &plaintext).unwrap().to_vec();

        let bit = bit.index(sealed.len() * 8);
        sealed[bit / 8] ^= 1 << (bit % 8);

        let mut pt_buf = vec![0u8; plaintext.len() + MAX_OVERHEAD];
        prop_assert!(recv.unprotect(&mut pt_buf, &sealed).is_err());
    }

    #[test]
    fn prop_key_isolation(
        suite in arbitrary_suite(),
        key_a in 0u64..1000,
        key_b in 1000u64..2000,
    ) {
        let mut send = Context::new(suite);
        send.add_key(key_a, b"shared base secret").unwrap();
        let recv = {
            let mut ctx = Context::new(suite);
            ctx.add_key(key_b, b"shared base secret").unwrap();
            ctx
        };

        let mut ct_buf = [0u8; 64];
        let sealed = send.protect(key_a, &mut ct_buf, b"payload").unwrap().to_vec();

        let mut pt_buf = [0u8; 64];
        prop_assert_eq!(
            recv.unprotect(&mut pt_buf, &sealed),
            Err(SframeError::UnknownKey { key_id: key_a })
        );
    }
}

#[test]
fn suite_sweep_round_trip() {
    // 2^9 protect/unprotect pairs per suite against a fresh context pair
    let rounds = 1 << 9;
    let plaintext = b"\x00\x01\x02\x03";

    for suite in ALL_SUITES {
        let mut send = Context::new(suite);
        send.add_key(0x42, b"sweep base secret").unwrap();
        let mut recv = Context::new(suite);
        recv.add_key(0x42, b"sweep base secret").unwrap();

        let mut ct_buf = [0u8; 4 + MAX_OVERHEAD];
        let mut pt_buf = [0u8; 4];

        for round in 0..rounds {
            let sealed = send.protect(0x42, &mut ct_buf, plaintext).unwrap().to_vec();

            let (header, _) = Header::decode(&sealed).unwrap();
            assert_eq!(header.counter, round, "{suite} counter drift");

            let opened = recv.unprotect(&mut pt_buf, &sealed).unwrap();
            assert_eq!(opened, plaintext, "{suite} round {round}");
        }
    }
}
