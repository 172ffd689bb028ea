//! # Shared Error Types
//!
//! Parse-level errors shared by the core newtypes. Component-level
//! errors (`StorageError`, `LedgerError`, `UploadError`) live with
//! their components in the downstream crates.

use thiserror::Error;

/// Failure to parse a core primitive from its wire representation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Hex string had the wrong length for the target type.
    #[error("expected {expected} hex chars, got {actual}")]
    BadLength {
        /// Number of hex characters the target type requires.
        expected: usize,
        /// Number of hex characters actually supplied.
        actual: usize,
    },

    /// Hex string contained a non-hex character.
    #[error("invalid hex at position {position}")]
    BadHex {
        /// Byte offset of the first invalid character.
        position: usize,
    },

    /// Value was structurally valid but outside the accepted range.
    #[error("value out of range: {0}")]
    OutOfRange(String),
}
