//! Fuzz target for Context::unprotect
//!
//! Feeding arbitrary bytes to the decrypt path must never panic and must
//! never succeed: the fuzzer cannot forge a tag for the derived key.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sealframe_core::{CipherSuite, Context};

fuzz_target!(|data: &[u8]| {
    let mut ctx = Context::new(CipherSuite::AesCm128HmacSha256_8);
    ctx.add_key(0x07, b"fuzz base secret").unwrap();

    let mut pt_buf = vec![0u8; data.len()];
    assert!(ctx.unprotect(&mut pt_buf, data).is_err());
});
