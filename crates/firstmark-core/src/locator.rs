//! # Storage Locator
//!
//! Defines `Locator`, the opaque reference a content-addressed store
//! returns for uploaded bytes (an IPFS CID in the production backend).
//!
//! ## Opacity Invariant
//!
//! A locator identifies *where this upload's bytes are retrievable*,
//! nothing more. Re-uploading identical bytes may yield an equivalent
//! but differently-spelled locator, so nothing in the workspace parses
//! locators or compares them across independent uploads. The only
//! meaningful comparison is against the locator returned by the same
//! upload — which is what verification reports.

use serde::{Deserialize, Serialize};

/// Opaque reference to where content is retrievable from the storage
/// service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Wrap a raw locator string as returned by the storage service.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The raw locator string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Locator {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl From<&str> for Locator {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}
