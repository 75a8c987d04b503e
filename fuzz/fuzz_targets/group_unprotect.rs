//! Fuzz target for GroupContext::unprotect
//!
//! Exercises header decoding, compound key-id splitting, lazy sender-key
//! derivation, and AEAD rejection on arbitrary input. Must never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealframe_core::{CipherSuite, GroupContext};

fuzz_target!(|data: &[u8]| {
    let mut group = GroupContext::new(CipherSuite::AesGcm128Sha256, 4).unwrap();
    group.add_epoch(0, b"fuzz epoch secret").unwrap();
    group.add_epoch(3, b"another epoch secret").unwrap();

    let mut pt_buf = vec![0u8; data.len()];
    assert!(group.unprotect(&mut pt_buf, data).is_err());
});
