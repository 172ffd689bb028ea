//! # The Registration Record
//!
//! One record per registered digest: who committed it, where the bytes
//! live, the signature that proves the claim, and when the ledger
//! committed it. Created exactly once as the terminal step of the
//! upload flow, read-only forever after.

use serde::{Deserialize, Serialize};

use firstmark_core::{ContentDigest, Locator, Timestamp, UploaderId};
use firstmark_crypto::OwnershipSignature;

/// An immutable ledger record binding a content digest to its first
/// registrant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// SHA-256 of the registered content; the record's unique key.
    pub digest: ContentDigest,
    /// Where the content is retrievable from the storage service.
    pub locator: Locator,
    /// Public identity of the committing uploader.
    pub uploader: UploaderId,
    /// Signature over the ownership message for `digest`.
    pub signature: OwnershipSignature,
    /// Commit time assigned by the ledger, not the client.
    pub committed_at: Timestamp,
}

/// The read-side view of a record: what `lookup` answers and what
/// verification reports to the user.
///
/// The remote ledger boundary (`verifyFile`) returns uploader, locator,
/// and timestamp — the signature is write-side evidence held by the
/// ledger, not echoed on reads — so this view is what every backend
/// can answer uniformly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Public identity of the committing uploader.
    pub uploader: UploaderId,
    /// Where the content is retrievable from the storage service.
    pub locator: Locator,
    /// Commit time assigned by the ledger.
    pub committed_at: Timestamp,
}

impl From<&Record> for Registration {
    fn from(record: &Record) -> Self {
        Self {
            uploader: record.uploader,
            locator: record.locator.clone(),
            committed_at: record.committed_at,
        }
    }
}
