//! # Content Hashing
//!
//! SHA-256 digest computation over raw content bytes. The digest is
//! computed over the exact byte stream — no canonicalization, no
//! framing — so any reader of the same bytes, in any language, arrives
//! at the same digest.
//!
//! Two entry points: [`sha256_digest`] for content already in memory,
//! and [`digest_reader`] which streams in fixed-size chunks for content
//! that should not be buffered whole.

use std::io::Read;

use sha2::{Digest, Sha256};
use thiserror::Error;

use firstmark_core::ContentDigest;

/// Chunk size for streaming digest computation.
const READ_CHUNK: usize = 64 * 1024;

/// Failure while hashing content.
#[derive(Error, Debug)]
pub enum HashError {
    /// The content source could not be read.
    #[error("content unreadable: {0}")]
    Read(#[from] std::io::Error),
}

/// Compute the SHA-256 digest of in-memory content.
///
/// Deterministic: identical bytes always yield identical digests.
pub fn sha256_digest(content: &[u8]) -> ContentDigest {
    let hash = Sha256::digest(content);
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest::from_bytes(bytes)
}

/// Compute the SHA-256 digest of a byte stream.
///
/// Reads in fixed-size chunks, so content of unbounded size never has
/// to fit in memory. Produces the same digest as [`sha256_digest`]
/// over the same bytes.
///
/// # Errors
///
/// Returns [`HashError::Read`] if the source fails mid-stream.
pub fn digest_reader<R: Read>(mut reader: R) -> Result<ContentDigest, HashError> {
    let mut hasher = Sha256::new();
    let mut buf = [0u8; READ_CHUNK];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    let hash = hasher.finalize();
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    Ok(ContentDigest::from_bytes(bytes))
}
