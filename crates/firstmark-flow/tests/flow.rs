//! End-to-end exercises of the upload and verification flows against
//! the in-memory backends, including the failure branches and the
//! commit race.

use std::sync::Arc;

use async_trait::async_trait;

use firstmark_core::{ContentDigest, Locator, Timestamp};
use firstmark_crypto::{sha256_digest, ClaimError, ClaimSigner, OwnershipClaim, SigningKeypair};
use firstmark_flow::{Registrar, UploadError, VerifyOutcome};
use firstmark_ledger::{Ledger, MemoryLedger};
use firstmark_storage::{MemoryStorage, StorageClient, StorageError};

fn registrar() -> Registrar<MemoryStorage, MemoryLedger> {
    Registrar::new(MemoryStorage::new(), MemoryLedger::new())
}

#[tokio::test]
async fn register_then_verify_roundtrip() {
    let registrar = registrar();
    let keypair = SigningKeypair::generate();

    let before = Timestamp::now();
    let record = registrar.register(b"hello", &keypair).await.unwrap();
    assert_eq!(record.digest, sha256_digest(b"hello"));
    assert_eq!(record.uploader, keypair.identity());
    assert!(record.committed_at >= before);

    match registrar.verify(b"hello").await.unwrap() {
        VerifyOutcome::Registered(registration) => {
            assert_eq!(registration.uploader, keypair.identity());
            assert_eq!(registration.locator, record.locator);
            assert_eq!(registration.committed_at, record.committed_at);
        }
        VerifyOutcome::NotRegistered => panic!("registered content reported missing"),
    }
}

#[tokio::test]
async fn hello_scenario_has_flips_across_commit() {
    let registrar = registrar();
    let keypair = SigningKeypair::generate();
    let digest = sha256_digest(b"hello");

    assert!(!registrar.ledger().has(&digest).await.unwrap());
    registrar.register(b"hello", &keypair).await.unwrap();
    assert!(registrar.ledger().has(&digest).await.unwrap());
}

#[tokio::test]
async fn reupload_is_already_registered_without_second_mutation() {
    let registrar = registrar();
    let first_keypair = SigningKeypair::generate();
    let record = registrar.register(b"hello", &first_keypair).await.unwrap();

    // Different caller, identical content.
    let second_keypair = SigningKeypair::generate();
    let err = registrar
        .register(b"hello", &second_keypair)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::AlreadyRegistered { digest } if digest == record.digest));

    // One record, still the original committer's.
    assert_eq!(registrar.ledger().len(), 1);
    match registrar.verify(b"hello").await.unwrap() {
        VerifyOutcome::Registered(registration) => {
            assert_eq!(registration.uploader, first_keypair.identity());
        }
        VerifyOutcome::NotRegistered => panic!("record vanished"),
    }
}

#[tokio::test]
async fn one_byte_tamper_is_not_registered() {
    let registrar = registrar();
    let keypair = SigningKeypair::generate();
    registrar.register(b"hello", &keypair).await.unwrap();

    assert_eq!(
        registrar.verify(b"hellp").await.unwrap(),
        VerifyOutcome::NotRegistered
    );
}

#[tokio::test]
async fn unregistered_content_is_not_registered() {
    let registrar = registrar();
    assert_eq!(
        registrar.verify(b"nobody ever uploaded this").await.unwrap(),
        VerifyOutcome::NotRegistered
    );
}

#[tokio::test]
async fn register_and_verify_files() {
    use std::io::Write;

    let registrar = registrar();
    let keypair = SigningKeypair::generate();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"hello").unwrap();

    let record = registrar
        .register_file(file.path(), &keypair)
        .await
        .unwrap();
    assert_eq!(record.digest, sha256_digest(b"hello"));

    match registrar.verify_file(file.path()).await.unwrap() {
        VerifyOutcome::Registered(registration) => {
            assert_eq!(registration.locator, record.locator);
        }
        VerifyOutcome::NotRegistered => panic!("file just registered"),
    }

    // A different file with the same bytes verifies identically:
    // content, not the file, is what is registered.
    let mut twin = tempfile::NamedTempFile::new().unwrap();
    twin.write_all(b"hello").unwrap();
    assert!(matches!(
        registrar.verify_file(twin.path()).await.unwrap(),
        VerifyOutcome::Registered(_)
    ));
}

#[tokio::test]
async fn missing_file_is_read_error() {
    let registrar = registrar();
    let keypair = SigningKeypair::generate();
    let err = registrar
        .register_file(std::path::Path::new("/no/such/file"), &keypair)
        .await
        .unwrap_err();
    assert!(matches!(err, UploadError::Read(_)));
}

/// Storage that always refuses, for the abort-before-commit branch.
struct DownStorage;

#[async_trait]
impl StorageClient for DownStorage {
    async fn put(&self, _content: &[u8]) -> Result<Locator, StorageError> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn storage_failure_aborts_without_ledger_mutation() {
    let registrar = Registrar::new(DownStorage, MemoryLedger::new());
    let keypair = SigningKeypair::generate();

    let err = registrar.register(b"hello", &keypair).await.unwrap_err();
    assert!(matches!(err, UploadError::StorageUnavailable(_)));

    // No ledger state changed, so the whole flow is safe to retry.
    assert!(registrar.ledger().is_empty());
    assert_eq!(
        registrar.verify(b"hello").await.unwrap(),
        VerifyOutcome::NotRegistered
    );
}

/// Signer that always declines.
struct DecliningSigner(SigningKeypair);

impl ClaimSigner for DecliningSigner {
    fn identity(&self) -> firstmark_core::UploaderId {
        self.0.identity()
    }

    fn try_sign(&self, _digest: &ContentDigest) -> Result<OwnershipClaim, ClaimError> {
        Err(ClaimError::SigningRejected("user declined".to_string()))
    }
}

#[tokio::test]
async fn declined_signing_aborts_without_commit() {
    let registrar = registrar();
    let signer = DecliningSigner(SigningKeypair::generate());

    let err = registrar.register(b"hello", &signer).await.unwrap_err();
    assert!(matches!(err, UploadError::SigningRejected(_)));
    assert!(registrar.ledger().is_empty());
}

/// Signer whose claims come from a different key than the identity it
/// announces — the compromised-signer case.
struct LyingSigner {
    announced: SigningKeypair,
    actual: SigningKeypair,
}

impl ClaimSigner for LyingSigner {
    fn identity(&self) -> firstmark_core::UploaderId {
        self.announced.identity()
    }

    fn try_sign(&self, digest: &ContentDigest) -> Result<OwnershipClaim, ClaimError> {
        Ok(self.actual.sign_claim(digest))
    }
}

#[tokio::test]
async fn identity_mismatch_aborts_and_never_commits() {
    let registrar = registrar();
    let signer = LyingSigner {
        announced: SigningKeypair::generate(),
        actual: SigningKeypair::generate(),
    };

    let err = registrar.register(b"hello", &signer).await.unwrap_err();
    assert!(matches!(err, UploadError::SignatureMismatch(_)));
    assert!(registrar.ledger().is_empty());
}

/// Storage that parks every `put` on a barrier, so two flows both pass
/// their duplicate pre-check before either reaches the commit.
struct GatedStorage {
    inner: MemoryStorage,
    barrier: tokio::sync::Barrier,
}

#[async_trait]
impl StorageClient for GatedStorage {
    async fn put(&self, content: &[u8]) -> Result<Locator, StorageError> {
        self.barrier.wait().await;
        self.inner.put(content).await
    }
}

#[tokio::test]
async fn commit_race_has_exactly_one_winner() {
    let ledger = Arc::new(MemoryLedger::new());
    let storage = Arc::new(GatedStorage {
        inner: MemoryStorage::new(),
        barrier: tokio::sync::Barrier::new(2),
    });

    let mut handles = Vec::new();
    for _ in 0..2 {
        let registrar = Registrar::new(Arc::clone(&storage), Arc::clone(&ledger));
        handles.push(tokio::spawn(async move {
            let keypair = SigningKeypair::generate();
            registrar.register(b"contested content", &keypair).await
        }));
    }

    let mut wins = 0;
    let mut already = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(UploadError::AlreadyRegistered { .. }) => already += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(already, 1);
    assert_eq!(ledger.len(), 1);

    // The loser's storage object is orphaned; the ledger references
    // exactly one committed record.
    match Registrar::new(Arc::clone(&storage), Arc::clone(&ledger))
        .verify(b"contested content")
        .await
        .unwrap()
    {
        VerifyOutcome::Registered(_) => {}
        VerifyOutcome::NotRegistered => panic!("winner's record missing"),
    }
}

#[tokio::test]
async fn commit_timestamp_not_known_before_commit() {
    let registrar = registrar();
    let keypair = SigningKeypair::generate();

    let before = Timestamp::now();
    let record = registrar.register(b"timed content", &keypair).await.unwrap();
    let after = Timestamp::now();

    assert!(record.committed_at >= before);
    assert!(record.committed_at <= after);
}
