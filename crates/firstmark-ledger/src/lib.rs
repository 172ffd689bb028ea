//! # firstmark-ledger — The Append-Only Registration Ledger
//!
//! The single source of truth of the registry: a globally-ordered
//! key-value store from content digest to [`Record`], enforcing
//! at-most-one record per digest, ever. Every other component of the
//! system is stateless relative to this one.
//!
//! ## The Seam
//!
//! [`Ledger`] is an explicit state-machine object with three
//! operations — `has`, `commit`, `lookup` — rather than ambient global
//! state, so tests run against [`MemoryLedger`] and production can run
//! against the contract-backed [`EvmLedger`] behind the same interface.
//!
//! ## Commit Atomicity
//!
//! Correctness does not rest on the client-side `has` pre-check (that
//! is an optimization to avoid wasted storage uploads). `commit` itself
//! must be atomically exclusive per digest: of two concurrent commits
//! for the same digest, exactly one succeeds and the other fails with
//! [`LedgerError::DuplicateDigest`] without any state change. The
//! in-memory backend serializes commits under one lock; the EVM backend
//! inherits total ordering from the chain.

pub mod memory;
pub mod record;

#[cfg(feature = "evm-ledger")]
mod abi;
#[cfg(feature = "evm-ledger")]
pub mod evm;

use async_trait::async_trait;
use thiserror::Error;

use firstmark_core::{ContentDigest, Locator, UploaderId};
use firstmark_crypto::OwnershipSignature;

pub use memory::MemoryLedger;
pub use record::{Record, Registration};

#[cfg(feature = "evm-ledger")]
pub use evm::{EvmLedger, EvmLedgerConfig};

/// Failure from a ledger backend.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A record for this digest already exists. Expected business
    /// outcome, not a fault — first writer wins.
    #[error("digest already registered: {digest}")]
    DuplicateDigest {
        /// The digest that already has a record.
        digest: ContentDigest,
    },

    /// Commit attempted under the reserved all-zero identity, which
    /// encodes absence at the remote boundary and can never own a
    /// record.
    #[error("cannot commit under the zero identity")]
    ZeroIdentity,

    /// The ledger could not be reached. Transient.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The remote ledger rejected or failed the commit for a reason
    /// other than duplication.
    #[error("ledger commit failed: {0}")]
    CommitFailed(String),

    /// The remote ledger answered with something undecodable.
    #[error("ledger response invalid: {0}")]
    InvalidResponse(String),
}

/// The append-only record store keyed by content digest.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Duplicate pre-check. Read-only; never blocks writers.
    async fn has(&self, digest: &ContentDigest) -> Result<bool, LedgerError>;

    /// Atomically create the record for `digest`, assigning the commit
    /// timestamp. Fails with [`LedgerError::DuplicateDigest`] and
    /// changes nothing if a record already exists — including when a
    /// concurrent commit won the race after the caller's `has` check.
    async fn commit(
        &self,
        digest: ContentDigest,
        locator: Locator,
        uploader: UploaderId,
        signature: OwnershipSignature,
    ) -> Result<Record, LedgerError>;

    /// Fetch the registration for `digest`. Absence is `Ok(None)` — a
    /// well-defined sentinel, never an error.
    async fn lookup(&self, digest: &ContentDigest) -> Result<Option<Registration>, LedgerError>;
}

// Concurrent upload flows share one ledger; delegate through Arc.
#[async_trait]
impl<L: Ledger + ?Sized> Ledger for std::sync::Arc<L> {
    async fn has(&self, digest: &ContentDigest) -> Result<bool, LedgerError> {
        (**self).has(digest).await
    }

    async fn commit(
        &self,
        digest: ContentDigest,
        locator: Locator,
        uploader: UploaderId,
        signature: OwnershipSignature,
    ) -> Result<Record, LedgerError> {
        (**self).commit(digest, locator, uploader, signature).await
    }

    async fn lookup(&self, digest: &ContentDigest) -> Result<Option<Registration>, LedgerError> {
        (**self).lookup(digest).await
    }
}
