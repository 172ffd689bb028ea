//! # Minimal ABI Encoding for the Registry Contract
//!
//! Just enough Solidity ABI plumbing for the three registry calls:
//! 32-byte words, left-padded unsigned integers, and dynamic
//! `string`/`bytes` arguments with head/tail offset encoding. All
//! values travel as hex strings, matching the JSON-RPC wire format.

use firstmark_core::hex;

/// Bytes per ABI word.
const WORD: usize = 32;

/// Encode a fixed 32-byte value as one word.
pub(crate) fn encode_bytes32(value: &[u8; 32]) -> String {
    hex::encode(value)
}

/// Encode an unsigned integer as one left-padded word.
pub(crate) fn encode_uint(value: u64) -> String {
    format!("{value:064x}")
}

/// Encode a dynamic `bytes`/`string` tail: length word, then the data
/// right-padded to a word boundary.
pub(crate) fn encode_dynamic(data: &[u8]) -> String {
    let mut out = encode_uint(data.len() as u64);
    out.push_str(&hex::encode(data));
    let rem = data.len() % WORD;
    if rem != 0 {
        out.push_str(&"00".repeat(WORD - rem));
    }
    out
}

/// Slice word `index` out of a hex-encoded response body.
///
/// `index` may come from an untrusted offset word, so the position
/// arithmetic is checked rather than allowed to wrap.
pub(crate) fn word_at(body: &str, index: usize) -> Result<&str, String> {
    index
        .checked_mul(WORD * 2)
        .and_then(|start| Some(start..start.checked_add(WORD * 2)?))
        .and_then(|range| body.get(range))
        .ok_or_else(|| format!("response too short for word {index}"))
}

/// Decode word `index` as a 32-byte array.
pub(crate) fn decode_bytes32(body: &str, index: usize) -> Result<[u8; 32], String> {
    hex::decode_array(word_at(body, index)?).map_err(|e| e.to_string())
}

/// Decode word `index` as an unsigned integer, rejecting values that
/// overflow `u64`.
pub(crate) fn decode_uint(body: &str, index: usize) -> Result<u64, String> {
    let word = word_at(body, index)?;
    let (high, low) = word.split_at(word.len() - 16);
    if high.bytes().any(|b| b != b'0') {
        return Err(format!("uint overflows u64: 0x{word}"));
    }
    u64::from_str_radix(low, 16).map_err(|e| format!("invalid uint word: {e}"))
}

/// Decode a dynamic `string` whose head word sits at `head_index`.
pub(crate) fn decode_dynamic_string(body: &str, head_index: usize) -> Result<String, String> {
    let offset = decode_uint(body, head_index)? as usize;
    if offset % WORD != 0 {
        return Err(format!("misaligned dynamic offset {offset}"));
    }
    let len_index = offset / WORD;
    let len = decode_uint(body, len_index)? as usize;
    // Length and offset are untrusted; a hostile response must land on
    // the short-response error, not wrap the slice bounds.
    let data = len_index
        .checked_add(1)
        .and_then(|words| words.checked_mul(WORD * 2))
        .and_then(|start| Some(start..start.checked_add(len.checked_mul(2)?)?))
        .and_then(|range| body.get(range))
        .ok_or_else(|| "response too short for dynamic data".to_string())?;
    let mut bytes = Vec::with_capacity(len);
    for pos in (0..data.len()).step_by(2) {
        let byte = u8::from_str_radix(&data[pos..pos + 2], 16)
            .map_err(|e| format!("invalid hex in dynamic data: {e}"))?;
        bytes.push(byte);
    }
    String::from_utf8(bytes).map_err(|e| format!("dynamic string not UTF-8: {e}"))
}
