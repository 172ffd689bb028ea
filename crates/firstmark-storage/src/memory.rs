//! # In-Memory Storage Backend
//!
//! Keeps uploaded objects in a process-local map, keyed by a locator
//! derived from the content digest. Suitable for tests and local
//! development; provides no durability beyond the process lifetime.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use firstmark_core::Locator;
use firstmark_crypto::sha256_digest;

use crate::{StorageClient, StorageError};

/// In-process content-addressable store.
///
/// Locators are content-derived (`mem-` plus a digest prefix), so
/// re-uploading identical bytes yields the same locator — the
/// strongest form of the idempotence the `StorageClient` contract
/// permits, though callers still must not rely on it.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch an object back by locator. Test-side accessor; the
    /// registration protocol itself never reads content back.
    pub fn get(&self, locator: &Locator) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(locator.as_str())
            .cloned()
    }

    /// Number of distinct objects held.
    pub fn len(&self) -> usize {
        self.objects.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// True if no objects are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageClient for MemoryStorage {
    async fn put(&self, content: &[u8]) -> Result<Locator, StorageError> {
        let key = format!("mem-{}", &sha256_digest(content).to_hex()[..16]);
        self.objects
            .lock()
            .map_err(|_| StorageError::Unavailable("storage mutex poisoned".to_string()))?
            .insert(key.clone(), content.to_vec());
        Ok(Locator::new(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_then_get() {
        let storage = MemoryStorage::new();
        let locator = storage.put(b"hello").await.unwrap();
        assert_eq!(storage.get(&locator), Some(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn test_identical_bytes_same_locator() {
        let storage = MemoryStorage::new();
        let first = storage.put(b"same").await.unwrap();
        let second = storage.put(b"same").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn test_different_bytes_different_locators() {
        let storage = MemoryStorage::new();
        let a = storage.put(b"one").await.unwrap();
        let b = storage.put(b"two").await.unwrap();
        assert_ne!(a, b);
        assert_eq!(storage.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_locator_is_none() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get(&Locator::new("mem-missing")), None);
        assert!(storage.is_empty());
    }
}
