//! # firstmark-flow — Upload and Verification Orchestrators
//!
//! The protocol sequencing layer. A [`Registrar`] wires a hasher, a
//! [`StorageClient`], a [`ClaimSigner`], and a [`Ledger`] into the two
//! user-facing flows:
//!
//! - **Upload**: hash → duplicate pre-check → storage put → sign and
//!   recover-compare → ledger commit. Each step gates the next; no
//!   ledger mutation happens before the final step, so any earlier
//!   abort leaves the system consistent.
//!
//! - **Verification**: hash → ledger lookup → typed outcome. Content
//!   that was never registered and content that was altered after
//!   registration produce the same [`VerifyOutcome::NotRegistered`] —
//!   the digest is the only identity there is.
//!
//! ## Failure Policy
//!
//! Every failure is recovered at this boundary and turned into a
//! discrete, typed outcome ([`UploadError`] / [`VerifyError`]); nothing
//! propagates as an unhandled fault past a flow. Only
//! [`UploadError::SignatureMismatch`] is unrecoverable for the attempt;
//! the rest are normal terminal states the user can act on.
//!
//! Orchestrators hold no state of their own — the ledger is the single
//! source of truth, and a `Registrar` is a pure request/response
//! mediator per invocation.

pub mod upload;
pub mod verify;

use firstmark_ledger::Ledger;
use firstmark_storage::StorageClient;

pub use upload::UploadError;
pub use verify::{VerifyError, VerifyOutcome};

/// The orchestrator for both flows, generic over the storage and
/// ledger seams so tests run in-memory and production runs against
/// IPFS and a contract.
#[derive(Debug)]
pub struct Registrar<S, L> {
    storage: S,
    ledger: L,
}

impl<S: StorageClient, L: Ledger> Registrar<S, L> {
    /// Wire a registrar from its two stateful collaborators.
    pub fn new(storage: S, ledger: L) -> Self {
        Self { storage, ledger }
    }

    /// The ledger this registrar commits to.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// The storage client this registrar uploads through.
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
