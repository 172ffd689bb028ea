//! # Ownership Claims — Sign and Recover
//!
//! An ownership claim binds an uploader identity to exactly one content
//! digest. The signed message embeds the digest in a fixed, readable
//! phrase, so a signature produced for one digest can never be replayed
//! against another.
//!
//! ## Recover-and-Compare
//!
//! Verification is an explicit two-step contract: the claim envelope
//! carries the claimed public key, and [`recover_identity`] verifies
//! the signature over the ownership message against that key before
//! returning it. The caller compares the recovered identity with the
//! one it expected; any mismatch means the signing step was compromised
//! or the message was altered in transit, and the flow must abort
//! rather than commit.
//!
//! ## Security Invariant
//!
//! Private keys are never serialized or logged. `SigningKeypair` does
//! not implement `Serialize`; its `Debug` output is redacted. The seed
//! is only reachable through the explicit [`SigningKeypair::to_seed_hex`]
//! key-file path.

use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use firstmark_core::{hex, ContentDigest, ParseError, UploaderId};

/// Failure while producing or verifying an ownership claim.
#[derive(Error, Debug)]
pub enum ClaimError {
    /// The recovered identity does not match, or the signature does not
    /// verify at all. Integrity violation — the flow must abort.
    #[error("signature mismatch: {0}")]
    SignatureMismatch(String),

    /// The signer declined or was unavailable. Terminal for this
    /// attempt, but safe to retry later.
    #[error("signing rejected: {0}")]
    SigningRejected(String),

    /// A key could not be parsed or loaded.
    #[error("key error: {0}")]
    Key(String),
}

impl From<ParseError> for ClaimError {
    fn from(e: ParseError) -> Self {
        ClaimError::Key(e.to_string())
    }
}

/// Build the message an uploader signs to claim a digest.
///
/// The digest hex is embedded in the phrase, so the signature is valid
/// for this digest and no other.
pub fn ownership_message(digest: &ContentDigest) -> String {
    format!("Verify ownership of file with hash: {}", digest.to_hex())
}

/// A 64-byte Ed25519 signature over an ownership message.
///
/// Serializes as a 128-character lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OwnershipSignature(pub [u8; 64]);

impl OwnershipSignature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }

    /// Render the signature as a 128-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse a signature from a 128-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, ParseError> {
        Ok(Self(hex::decode_array(s)?))
    }
}

impl Serialize for OwnershipSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for OwnershipSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for OwnershipSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OwnershipSignature({}...)", hex::prefix(&self.0))
    }
}

/// A signed ownership claim: the claimed identity plus the signature
/// over the ownership message for one digest.
///
/// The digest itself is not part of the envelope — it is re-derived
/// from the content by whoever verifies, which is what makes tampering
/// observable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipClaim {
    /// The identity the signer claims.
    pub uploader: UploaderId,
    /// Ed25519 signature over [`ownership_message`] for the digest.
    pub signature: OwnershipSignature,
}

/// An Ed25519 keypair used to sign ownership claims.
///
/// Does not implement `Serialize` — private keys must not leak into
/// logs, responses, or records.
pub struct SigningKeypair {
    signing_key: ed25519_dalek::SigningKey,
}

impl SigningKeypair {
    /// Generate a new random keypair.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: ed25519_dalek::SigningKey::generate(&mut csprng),
        }
    }

    /// Rebuild a keypair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Rebuild a keypair from a 64-character hex seed, as stored by
    /// `firstmark keygen`.
    pub fn from_seed_hex(s: &str) -> Result<Self, ClaimError> {
        let seed: [u8; 32] = hex::decode_array(s)?;
        Ok(Self::from_seed(&seed))
    }

    /// Render the seed as hex for key-file storage.
    ///
    /// This is the only way private material leaves this type. Callers
    /// own the storage; nothing here writes or logs it.
    pub fn to_seed_hex(&self) -> String {
        hex::encode(&self.signing_key.to_bytes())
    }

    /// The public identity of this keypair.
    pub fn identity(&self) -> UploaderId {
        UploaderId::from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign an ownership claim for the given digest.
    pub fn sign_claim(&self, digest: &ContentDigest) -> OwnershipClaim {
        let message = ownership_message(digest);
        let sig = self.signing_key.sign(message.as_bytes());
        OwnershipClaim {
            uploader: self.identity(),
            signature: OwnershipSignature(sig.to_bytes()),
        }
    }
}

impl std::fmt::Debug for SigningKeypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningKeypair(<private>)")
    }
}

/// A signing capability for ownership claims.
///
/// The seam between the upload flow and whoever holds the private key.
/// [`SigningKeypair`] is the in-process implementation; a wallet or
/// remote signing service sits behind the same trait and may decline
/// ([`ClaimError::SigningRejected`]) or produce a claim that fails the
/// recover-and-compare check.
pub trait ClaimSigner: Send + Sync {
    /// The identity this signer claims to sign for.
    fn identity(&self) -> UploaderId;

    /// Produce an ownership claim for the digest.
    fn try_sign(&self, digest: &ContentDigest) -> Result<OwnershipClaim, ClaimError>;
}

impl ClaimSigner for SigningKeypair {
    fn identity(&self) -> UploaderId {
        SigningKeypair::identity(self)
    }

    fn try_sign(&self, digest: &ContentDigest) -> Result<OwnershipClaim, ClaimError> {
        Ok(self.sign_claim(digest))
    }
}

/// Recover the uploader identity from an ownership claim.
///
/// Rebuilds the ownership message for `digest`, verifies the claim's
/// signature against the claimed public key, and returns the identity
/// only if the signature holds. A claim signed for a different digest,
/// a corrupted signature, or a key that does not match all land on the
/// same [`ClaimError::SignatureMismatch`] branch.
///
/// Callers must compare the recovered identity against the identity
/// they expected before trusting the claim.
pub fn recover_identity(
    digest: &ContentDigest,
    claim: &OwnershipClaim,
) -> Result<UploaderId, ClaimError> {
    let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(claim.uploader.as_bytes())
        .map_err(|e| ClaimError::SignatureMismatch(format!("claimed key is not valid: {e}")))?;
    let message = ownership_message(digest);
    let sig = ed25519_dalek::Signature::from_bytes(&claim.signature.0);
    verifying_key
        .verify(message.as_bytes(), &sig)
        .map_err(|e| ClaimError::SignatureMismatch(format!("claim does not verify: {e}")))?;
    Ok(claim.uploader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::sha256_digest;
    use proptest::prelude::*;

    #[test]
    fn test_message_embeds_digest_hex() {
        let digest = sha256_digest(b"hello");
        let message = ownership_message(&digest);
        assert_eq!(
            message,
            "Verify ownership of file with hash: \
             2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_recover_returns_signer_identity() {
        let keypair = SigningKeypair::generate();
        let digest = sha256_digest(b"some content");
        let claim = keypair.sign_claim(&digest);
        let recovered = recover_identity(&digest, &claim).unwrap();
        assert_eq!(recovered, keypair.identity());
    }

    #[test]
    fn test_claim_is_bound_to_one_digest() {
        let keypair = SigningKeypair::generate();
        let claim = keypair.sign_claim(&sha256_digest(b"original"));
        let other = sha256_digest(b"different content");
        let err = recover_identity(&other, &claim).unwrap_err();
        assert!(matches!(err, ClaimError::SignatureMismatch(_)));
    }

    #[test]
    fn test_corrupted_signature_is_rejected() {
        let keypair = SigningKeypair::generate();
        let digest = sha256_digest(b"content");
        let mut claim = keypair.sign_claim(&digest);
        claim.signature.0[0] ^= 0xff;
        assert!(recover_identity(&digest, &claim).is_err());
    }

    #[test]
    fn test_substituted_identity_is_rejected() {
        let signer = SigningKeypair::generate();
        let impostor = SigningKeypair::generate();
        let digest = sha256_digest(b"content");
        let mut claim = signer.sign_claim(&digest);
        // An impostor cannot just rewrite the envelope's identity.
        claim.uploader = impostor.identity();
        assert!(recover_identity(&digest, &claim).is_err());
    }

    #[test]
    fn test_zero_identity_never_verifies() {
        let keypair = SigningKeypair::generate();
        let digest = sha256_digest(b"content");
        let mut claim = keypair.sign_claim(&digest);
        claim.uploader = UploaderId::ZERO;
        assert!(recover_identity(&digest, &claim).is_err());
    }

    #[test]
    fn test_seed_roundtrip_is_deterministic() {
        let keypair = SigningKeypair::generate();
        let rebuilt = SigningKeypair::from_seed_hex(&keypair.to_seed_hex()).unwrap();
        assert_eq!(rebuilt.identity(), keypair.identity());

        let digest = sha256_digest(b"content");
        assert_eq!(rebuilt.sign_claim(&digest), keypair.sign_claim(&digest));
    }

    #[test]
    fn test_keypair_debug_is_redacted() {
        let keypair = SigningKeypair::generate();
        assert_eq!(format!("{keypair:?}"), "SigningKeypair(<private>)");
    }

    #[test]
    fn test_claim_serde_roundtrip() {
        let keypair = SigningKeypair::generate();
        let claim = keypair.sign_claim(&sha256_digest(b"content"));
        let json = serde_json::to_string(&claim).unwrap();
        let back: OwnershipClaim = serde_json::from_str(&json).unwrap();
        assert_eq!(back, claim);
    }

    proptest! {
        #[test]
        fn prop_sign_then_recover_holds(content in proptest::collection::vec(any::<u8>(), 0..1024), seed in any::<[u8; 32]>()) {
            let keypair = SigningKeypair::from_seed(&seed);
            let digest = sha256_digest(&content);
            let claim = keypair.sign_claim(&digest);
            prop_assert_eq!(recover_identity(&digest, &claim).unwrap(), keypair.identity());
        }
    }
}
