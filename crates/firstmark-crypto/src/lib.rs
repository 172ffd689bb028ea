//! # firstmark-crypto — Hashing and Ownership Claims
//!
//! The two cryptographic legs of the registration protocol:
//!
//! - **Hashing** (`hasher`): deterministic SHA-256 content digests,
//!   one-shot for in-memory content and streaming for files of
//!   unbounded size.
//!
//! - **Ownership claims** (`claim`): Ed25519 signatures over a message
//!   that binds the claim to exactly one content digest, with an
//!   explicit recover-and-compare verification step. The mismatch path
//!   is a first-class branch, not implicit trust.
//!
//! ## Crate Policy
//!
//! - Stateless: no keys or digests are retained between calls.
//! - Private keys are never serialized or logged. `SigningKeypair` does
//!   not implement `Serialize` and its `Debug` output is redacted.

pub mod claim;
pub mod hasher;

pub use claim::{
    ownership_message, recover_identity, ClaimError, ClaimSigner, OwnershipClaim,
    OwnershipSignature, SigningKeypair,
};
pub use hasher::{digest_reader, sha256_digest, HashError};
