//! # In-Memory Ledger Backend
//!
//! The reference implementation of the ledger semantics, and the
//! backend the test suites run against. One mutex over the whole record
//! map is the single-writer serialization point: the existence check
//! and the insert happen under the same lock acquisition, which is what
//! closes the check-then-act race between a caller's `has` pre-check
//! and its `commit`.
//!
//! Commit timestamps come from the wall clock but are clamped to be
//! non-decreasing under the same lock, so timestamp order can never
//! disagree with commit order even if the system clock steps backwards.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use firstmark_core::{ContentDigest, Locator, Timestamp, UploaderId};
use firstmark_crypto::OwnershipSignature;

use crate::{Ledger, LedgerError, Record, Registration};

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<ContentDigest, Record>,
    last_commit: Option<Timestamp>,
}

/// Process-local append-only ledger.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    inner: Mutex<Inner>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .records
            .len()
    }

    /// True if nothing has been committed.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, LedgerError> {
        self.inner
            .lock()
            .map_err(|_| LedgerError::Unavailable("ledger mutex poisoned".to_string()))
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn has(&self, digest: &ContentDigest) -> Result<bool, LedgerError> {
        Ok(self.lock()?.records.contains_key(digest))
    }

    async fn commit(
        &self,
        digest: ContentDigest,
        locator: Locator,
        uploader: UploaderId,
        signature: OwnershipSignature,
    ) -> Result<Record, LedgerError> {
        if uploader.is_zero() {
            return Err(LedgerError::ZeroIdentity);
        }

        let mut inner = self.lock()?;
        if inner.records.contains_key(&digest) {
            return Err(LedgerError::DuplicateDigest { digest });
        }

        // Clamp so commit order and timestamp order cannot diverge.
        let now = Timestamp::now();
        let committed_at = match inner.last_commit {
            Some(last) if last > now => last,
            _ => now,
        };
        inner.last_commit = Some(committed_at);

        let record = Record {
            digest,
            locator,
            uploader,
            signature,
            committed_at,
        };
        inner.records.insert(digest, record.clone());
        debug!(digest = %digest, uploader = %uploader, "record committed");
        Ok(record)
    }

    async fn lookup(&self, digest: &ContentDigest) -> Result<Option<Registration>, LedgerError> {
        Ok(self.lock()?.records.get(digest).map(Registration::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firstmark_crypto::{sha256_digest, SigningKeypair};

    fn claim_parts(content: &[u8]) -> (ContentDigest, UploaderId, OwnershipSignature) {
        let keypair = SigningKeypair::generate();
        let digest = sha256_digest(content);
        let claim = keypair.sign_claim(&digest);
        (digest, claim.uploader, claim.signature)
    }

    #[tokio::test]
    async fn test_has_flips_across_commit() {
        let ledger = MemoryLedger::new();
        let (digest, uploader, signature) = claim_parts(b"hello");

        assert!(!ledger.has(&digest).await.unwrap());
        ledger
            .commit(digest, Locator::new("QmCid"), uploader, signature)
            .await
            .unwrap();
        assert!(ledger.has(&digest).await.unwrap());
    }

    #[tokio::test]
    async fn test_lookup_absent_is_none_not_error() {
        let ledger = MemoryLedger::new();
        let digest = sha256_digest(b"never committed");
        assert_eq!(ledger.lookup(&digest).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_commit_returns_record_with_ledger_timestamp() {
        let ledger = MemoryLedger::new();
        let (digest, uploader, signature) = claim_parts(b"hello");
        let before = Timestamp::now();
        let record = ledger
            .commit(digest, Locator::new("QmCid"), uploader, signature)
            .await
            .unwrap();
        assert!(record.committed_at >= before);
        assert_eq!(record.digest, digest);
        assert_eq!(record.uploader, uploader);
        assert_eq!(
            ledger.lookup(&digest).await.unwrap(),
            Some(Registration::from(&record))
        );
    }

    #[tokio::test]
    async fn test_duplicate_commit_fails_regardless_of_caller() {
        let ledger = MemoryLedger::new();
        let (digest, uploader, signature) = claim_parts(b"hello");
        let first = ledger
            .commit(digest, Locator::new("QmFirst"), uploader, signature)
            .await
            .unwrap();

        // Different caller, same digest.
        let other = SigningKeypair::generate();
        let other_claim = other.sign_claim(&digest);
        let err = ledger
            .commit(
                digest,
                Locator::new("QmSecond"),
                other_claim.uploader,
                other_claim.signature,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateDigest { .. }));

        // No state change: the original record survives untouched.
        assert_eq!(
            ledger.lookup(&digest).await.unwrap(),
            Some(Registration::from(&first))
        );
        assert_eq!(ledger.len(), 1);
    }

    #[tokio::test]
    async fn test_zero_identity_rejected() {
        let ledger = MemoryLedger::new();
        let (digest, _, signature) = claim_parts(b"hello");
        let err = ledger
            .commit(digest, Locator::new("QmCid"), UploaderId::ZERO, signature)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::ZeroIdentity));
        assert!(ledger.is_empty());
    }

    #[tokio::test]
    async fn test_commit_timestamps_non_decreasing() {
        let ledger = MemoryLedger::new();
        let mut previous: Option<Timestamp> = None;
        for i in 0..10u8 {
            let (digest, uploader, signature) = claim_parts(&[i]);
            let record = ledger
                .commit(digest, Locator::new(format!("Qm{i}")), uploader, signature)
                .await
                .unwrap();
            if let Some(prev) = previous {
                assert!(record.committed_at >= prev);
            }
            previous = Some(record.committed_at);
        }
    }

    #[tokio::test]
    async fn test_concurrent_commits_one_winner() {
        use std::sync::Arc;

        let ledger = Arc::new(MemoryLedger::new());
        let digest = sha256_digest(b"contested");

        let mut handles = Vec::new();
        for _ in 0..8 {
            let ledger = Arc::clone(&ledger);
            handles.push(tokio::spawn(async move {
                let keypair = SigningKeypair::generate();
                let claim = keypair.sign_claim(&digest);
                ledger
                    .commit(digest, Locator::new("QmRace"), claim.uploader, claim.signature)
                    .await
            }));
        }

        let mut wins = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => wins += 1,
                Err(LedgerError::DuplicateDigest { .. }) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(duplicates, 7);
        assert_eq!(ledger.len(), 1);
    }
}
