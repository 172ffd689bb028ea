//! # Content Digest — The Registry Key
//!
//! Defines `ContentDigest`, the SHA-256 fingerprint that keys every
//! record in the registry. Identical bytes always produce identical
//! digests, and the digest is the *only* identity content has: a
//! one-byte change produces an unrelated digest, which is what makes
//! tampering observable as "not registered".
//!
//! Digest computation lives in `firstmark-crypto`; this crate defines
//! the type and its wire representation (lowercase hex, 64 chars).

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;
use crate::hex;

/// Length in bytes of a content digest (SHA-256).
pub const DIGEST_LEN: usize = 32;

/// A 32-byte SHA-256 digest of registered content.
///
/// The unique key of the registry: each digest maps to at most one
/// record, ever. Serializes as a 64-character lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest(pub [u8; DIGEST_LEN]);

impl ContentDigest {
    /// Create a digest from raw 32 bytes.
    ///
    /// Prefer `firstmark_crypto::sha256_digest()` for computing digests
    /// from content.
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Render the digest as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse a digest from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, ParseError> {
        Ok(Self(hex::decode_array(s)?))
    }
}

impl Serialize for ContentDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentDigest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentDigest({}...)", hex::prefix(&self.0))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
