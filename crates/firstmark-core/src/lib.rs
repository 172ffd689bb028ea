//! # firstmark-core — Foundational Types for Firstmark
//!
//! This crate is the bedrock of the Firstmark registry. It defines the
//! domain primitives every other crate builds on: content digests,
//! uploader identities, storage locators, and commit timestamps.
//! Every other crate in the workspace depends on `firstmark-core`; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ContentDigest`,
//!    `UploaderId`, `Locator` — no bare strings or byte slices for
//!    identifiers. You cannot pass a digest where an identity is expected.
//!
//! 2. **Locators are opaque.** A `Locator` is whatever the storage
//!    service returned. Nothing in the workspace parses it or compares
//!    locators across independent uploads.
//!
//! 3. **UTC-only timestamps.** `Timestamp` enforces UTC with seconds
//!    precision. Commit timestamps are assigned by the ledger, never by
//!    the client.
//!
//! 4. **Absence is a sentinel, not an error.** The all-zero `UploaderId`
//!    is the wire encoding of "no record" at the remote ledger boundary;
//!    in-process code uses `Option`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `firstmark-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`/`Deserialize`.

pub mod digest;
pub mod error;
pub mod hex;
pub mod identity;
pub mod locator;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use digest::{ContentDigest, DIGEST_LEN};
pub use error::ParseError;
pub use identity::UploaderId;
pub use locator::Locator;
pub use temporal::Timestamp;
