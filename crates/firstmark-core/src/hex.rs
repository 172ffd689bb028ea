//! # Hex Helpers
//!
//! Lowercase hex encoding and decoding for the fixed-width core types.
//! Kept in one place so `ContentDigest`, `UploaderId`, and the
//! signature types in `firstmark-crypto` all share the same rules:
//! lowercase output, case-insensitive input, no `0x` prefix.

use crate::error::ParseError;

/// Encode bytes as a lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Encode the first four bytes as hex, for abbreviated `Debug` output.
pub fn prefix(bytes: &[u8]) -> String {
    encode(&bytes[..bytes.len().min(4)])
}

/// Decode a hex string into a fixed-width byte array.
///
/// Input is trimmed and lowercased before decoding. The string must
/// encode exactly `N` bytes.
pub fn decode_array<const N: usize>(hex: &str) -> Result<[u8; N], ParseError> {
    let hex = hex.trim().to_lowercase();
    if hex.len() != N * 2 {
        return Err(ParseError::BadLength {
            expected: N * 2,
            actual: hex.len(),
        });
    }
    let mut out = [0u8; N];
    for (i, byte) in out.iter_mut().enumerate() {
        let pos = i * 2;
        *byte = u8::from_str_radix(&hex[pos..pos + 2], 16)
            .map_err(|_| ParseError::BadHex { position: pos })?;
    }
    Ok(out)
}
