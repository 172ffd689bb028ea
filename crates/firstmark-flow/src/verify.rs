//! # The Verification Flow
//!
//! Hash the presented content, look the digest up, and report. There is
//! deliberately no way to tell "never registered" apart from "altered
//! since registration": the digest is the only identity content has,
//! and a near-miss oracle would leak information about what *is*
//! registered.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use firstmark_crypto::{digest_reader, sha256_digest, HashError};
use firstmark_ledger::{Ledger, LedgerError, Registration};
use firstmark_storage::StorageClient;

use crate::Registrar;

/// Failure of the verification flow itself (as opposed to a
/// not-registered outcome, which is not a failure).
#[derive(Error, Debug)]
pub enum VerifyError {
    /// The content could not be read. Local I/O problem.
    #[error("content unreadable: {0}")]
    Read(#[from] std::io::Error),

    /// The ledger could not answer.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<HashError> for VerifyError {
    fn from(e: HashError) -> Self {
        match e {
            HashError::Read(io) => VerifyError::Read(io),
        }
    }
}

/// What verification found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VerifyOutcome {
    /// The content is registered; here is who registered it, where the
    /// bytes live, and when the ledger committed it.
    Registered(Registration),

    /// No record for this content — never registered, or altered from
    /// what was registered. The two are indistinguishable by design.
    NotRegistered,
}

impl<S: StorageClient, L: Ledger> Registrar<S, L> {
    /// Verify in-memory content against the ledger.
    pub async fn verify(&self, content: &[u8]) -> Result<VerifyOutcome, VerifyError> {
        let digest = sha256_digest(content);
        debug!(digest = %digest, "verification flow started");

        match self.ledger().lookup(&digest).await? {
            Some(registration) => {
                info!(
                    digest = %digest,
                    uploader = %registration.uploader,
                    "content verified"
                );
                Ok(VerifyOutcome::Registered(registration))
            }
            None => {
                info!(digest = %digest, "no record for digest");
                Ok(VerifyOutcome::NotRegistered)
            }
        }
    }

    /// Verify a file, streaming it through the hasher — only the
    /// digest is needed, so the content never has to fit in memory.
    pub async fn verify_file(&self, path: &Path) -> Result<VerifyOutcome, VerifyError> {
        let file = std::fs::File::open(path)?;
        let digest = digest_reader(file)?;

        match self.ledger().lookup(&digest).await? {
            Some(registration) => Ok(VerifyOutcome::Registered(registration)),
            None => Ok(VerifyOutcome::NotRegistered),
        }
    }
}
