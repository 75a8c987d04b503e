//! Sealframe Core
//!
//! End-to-end encryption for real-time media frames. Each frame is sealed
//! under a sender-scoped key into a compact self-describing ciphertext:
//! a variable-length header carrying the key identifier and a monotonic
//! counter, the encrypted payload, and an authentication tag.
//!
//! ```text
//! +--------+----------------------+-----+
//! | header | ciphertext (|pt| B)  | tag |
//! +--------+----------------------+-----+
//! ```
//!
//! Two entry points:
//!
//! - [`Context`] — direct key management: callers register base secrets
//!   per key identifier and protect/unprotect frames
//! - [`GroupContext`] — an adapter for MLS-style group keying: callers
//!   feed it epoch secrets and it derives, caches, and evicts per-sender
//!   frame keys behind compound key identifiers
//!
//! All operations are synchronous and bounded; ciphertext and plaintext
//! buffers are caller-owned and the library returns sub-slices of them.
//! Key material is zeroized on destruction. Replay protection is out of
//! scope: `unprotect` verifies authenticity only and keeps no receive
//! state.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod context;
pub mod error;
pub mod group;
pub mod header;

pub use context::Context;
pub use error::SframeError;
pub use group::{EpochId, GroupContext, SenderId};
pub use header::{Counter, Header, KeyId};
pub use sealframe_crypto::CipherSuite;

/// Worst-case bytes `protect` adds on top of the plaintext: the header
/// allowance (17 bytes) plus the largest suite tag (16 bytes).
///
/// Sizing ciphertext buffers as `plaintext.len() + MAX_OVERHEAD` is always
/// sufficient.
pub const MAX_OVERHEAD: usize = 17 + 16;
