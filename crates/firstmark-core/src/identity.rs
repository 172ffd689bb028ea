//! # Uploader Identity
//!
//! Defines `UploaderId`, the public identity of the party who committed
//! a record. An identity is an Ed25519 public key; it is recoverable
//! from a valid ownership claim (see `firstmark-crypto::claim`) and is
//! what verification reports back to the user.
//!
//! The all-zero identity is reserved: the remote ledger contract
//! returns it for digests that have no record, and the EVM adapter maps
//! it to `None`. `UploaderId::ZERO` never identifies a real uploader —
//! committing under it is rejected at the ledger boundary.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseError;
use crate::hex;

/// An uploader's public identity — a 32-byte Ed25519 public key.
///
/// Serializes as a 64-character lowercase hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploaderId(pub [u8; 32]);

impl UploaderId {
    /// The reserved all-zero identity.
    ///
    /// Encodes "no record" at the remote ledger boundary. Never a valid
    /// committer.
    pub const ZERO: UploaderId = UploaderId([0u8; 32]);

    /// Create an identity from raw 32 bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Return the raw 32-byte identity.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// True if this is the reserved absence sentinel.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Render the identity as a 64-character lowercase hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Parse an identity from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, ParseError> {
        Ok(Self(hex::decode_array(s)?))
    }
}

impl Serialize for UploaderId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for UploaderId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for UploaderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "UploaderId({}...)", hex::prefix(&self.0))
    }
}

impl std::fmt::Display for UploaderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}
