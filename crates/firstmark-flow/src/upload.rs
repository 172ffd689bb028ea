//! # The Upload Flow
//!
//! Sequences a registration end to end. The ordering is load-bearing:
//! the ledger commit is the final step, so every abort before it leaves
//! no trace in the source of truth. The one deliberate loose end is a
//! storage object uploaded by a flow that then loses the commit race —
//! it is unreferenced and harmless, and the protocol does not try to
//! collect it.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};

use firstmark_core::ContentDigest;
use firstmark_crypto::{recover_identity, sha256_digest, ClaimError, ClaimSigner, HashError};
use firstmark_ledger::{Ledger, LedgerError, Record};
use firstmark_storage::{StorageClient, StorageError};

use crate::Registrar;

/// Terminal outcome of a failed upload flow.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The content could not be read. Local I/O problem.
    #[error("content unreadable: {0}")]
    Read(#[from] std::io::Error),

    /// A record for this content already exists — first writer wins.
    /// Expected, user-facing, non-fatal.
    #[error("content already registered under digest {digest}")]
    AlreadyRegistered {
        /// The digest that already has a record.
        digest: ContentDigest,
    },

    /// The storage service failed before anything was committed.
    /// Transient; the whole flow is safe to retry.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The signer declined the claim. Terminal for this attempt.
    #[error("signing rejected: {0}")]
    SigningRejected(String),

    /// The recovered identity does not match the caller's. Integrity
    /// violation — the flow aborts and never commits.
    #[error("signature mismatch: {0}")]
    SignatureMismatch(String),

    /// The ledger failed for a reason other than duplication.
    #[error(transparent)]
    Ledger(LedgerError),
}

impl From<HashError> for UploadError {
    fn from(e: HashError) -> Self {
        match e {
            HashError::Read(io) => UploadError::Read(io),
        }
    }
}

impl From<StorageError> for UploadError {
    fn from(e: StorageError) -> Self {
        UploadError::StorageUnavailable(e.to_string())
    }
}

impl From<ClaimError> for UploadError {
    fn from(e: ClaimError) -> Self {
        match e {
            ClaimError::SigningRejected(msg) => UploadError::SigningRejected(msg),
            ClaimError::SignatureMismatch(msg) => UploadError::SignatureMismatch(msg),
            ClaimError::Key(msg) => UploadError::SigningRejected(msg),
        }
    }
}

impl From<LedgerError> for UploadError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::DuplicateDigest { digest } => UploadError::AlreadyRegistered { digest },
            other => UploadError::Ledger(other),
        }
    }
}

impl<S: StorageClient, L: Ledger> Registrar<S, L> {
    /// Register in-memory content under the signer's identity.
    ///
    /// Runs the full upload sequence and returns the committed
    /// [`Record`] on success.
    pub async fn register(
        &self,
        content: &[u8],
        signer: &dyn ClaimSigner,
    ) -> Result<Record, UploadError> {
        let digest = sha256_digest(content);
        self.register_hashed(digest, content, signer).await
    }

    /// Register a file.
    ///
    /// The whole file is read into memory because the storage handoff
    /// needs the bytes anyway; verification, which does not, streams
    /// instead (see `verify_file`).
    pub async fn register_file(
        &self,
        path: &Path,
        signer: &dyn ClaimSigner,
    ) -> Result<Record, UploadError> {
        let content = std::fs::read(path)?;
        self.register_hashed(sha256_digest(&content), &content, signer)
            .await
    }

    async fn register_hashed(
        &self,
        digest: ContentDigest,
        content: &[u8],
        signer: &dyn ClaimSigner,
    ) -> Result<Record, UploadError> {
        debug!(digest = %digest, bytes = content.len(), "upload flow started");

        // Pre-check. An optimization to skip a doomed storage upload —
        // correctness rests on the commit's own atomicity below.
        if self.ledger().has(&digest).await? {
            info!(digest = %digest, "duplicate detected before upload");
            return Err(UploadError::AlreadyRegistered { digest });
        }

        let locator = self.storage().put(content).await?;
        debug!(digest = %digest, locator = %locator, "content stored");

        let claim = signer.try_sign(&digest)?;
        let recovered = recover_identity(&digest, &claim)?;
        if recovered != signer.identity() {
            warn!(digest = %digest, "recovered identity does not match caller");
            return Err(UploadError::SignatureMismatch(format!(
                "recovered {recovered} but caller claims {}",
                signer.identity()
            )));
        }

        let record = match self
            .ledger()
            .commit(digest, locator, recovered, claim.signature)
            .await
        {
            Ok(record) => record,
            Err(LedgerError::DuplicateDigest { digest }) => {
                // Lost the race between pre-check and commit. The
                // stored object is now orphaned but harmless.
                info!(digest = %digest, "lost commit race, content already registered");
                return Err(UploadError::AlreadyRegistered { digest });
            }
            Err(other) => return Err(other.into()),
        };

        info!(
            digest = %record.digest,
            uploader = %record.uploader,
            committed_at = %record.committed_at,
            "registration committed"
        );
        Ok(record)
    }
}
