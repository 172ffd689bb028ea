//! # firstmark-storage — Content-Addressable Storage Clients
//!
//! The storage half of the registration protocol: raw bytes go in, an
//! opaque [`Locator`] comes out, and a successful return means the
//! object is durably retrievable under that locator — not merely
//! accepted transiently.
//!
//! ## Backends
//!
//! - [`MemoryStorage`] — in-process map, for tests and local runs.
//! - [`IpfsClient`] — Kubo RPC backend: `add` the object, then `pin`
//!   it. Both steps must succeed before `put` returns a locator.
//!
//! ## Security Invariant
//!
//! Implementations must not return `Ok` before the backing store has
//! acknowledged persistence. A locator for an unpersisted object would
//! let a ledger record outlive the content it points at.

pub mod ipfs;
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

use firstmark_core::Locator;

/// Failure from a storage backend.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The storage service could not be reached or errored. Transient:
    /// the whole flow is safe to retry since no ledger state changed.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The storage service answered, but with something unusable.
    #[error("storage response invalid: {0}")]
    InvalidResponse(String),
}

/// A client for a content-addressable store.
///
/// `put` is idempotent from the caller's perspective: re-uploading
/// identical bytes may yield the same or an equivalent locator, and
/// callers must treat locators as opaque rather than assume string
/// equality across uploads.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Upload content and return its locator.
    ///
    /// Returns only after the store acknowledges that the object is
    /// retained — for the IPFS backend, after both add and pin succeed.
    async fn put(&self, content: &[u8]) -> Result<Locator, StorageError>;
}

// Concurrent upload flows share one client; delegate through Arc.
#[async_trait]
impl<S: StorageClient + ?Sized> StorageClient for std::sync::Arc<S> {
    async fn put(&self, content: &[u8]) -> Result<Locator, StorageError> {
        (**self).put(content).await
    }
}

pub use ipfs::{IpfsClient, IpfsConfig};
pub use memory::MemoryStorage;
