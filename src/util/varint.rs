//! Variable-length integer encoding utilities.
//!
//! Lucene's `VInt`/`VLong` layout: 7 bits per byte, least-significant group
//! first, high bit set on every byte except the last. Decoding is bounded so
//! that adversarial input cannot drive an unbounded loop or an oversized
//! shift.

use crate::error::{Result, ShardError};

/// Maximum encoded length of a 32-bit varint.
pub const MAX_VARINT32_BYTES: usize = 5;

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VARINT64_BYTES: usize = 10;

/// Encode a u32 value using variable-length encoding.
///
/// Uses 7 bits per byte with a continuation bit, allowing efficient
/// encoding of small numbers.
pub fn encode_u32(value: u32) -> Vec<u8> {
    encode_u64(value as u64)
}

/// Encode a u64 value using variable-length encoding.
pub fn encode_u64(value: u64) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(MAX_VARINT64_BYTES);
    let mut val = value;

    loop {
        let mut byte = (val & 0x7F) as u8;
        val >>= 7;

        if val != 0 {
            byte |= 0x80; // Set continuation bit
        }

        bytes.push(byte);

        if val == 0 {
            break;
        }
    }

    bytes
}

/// Decode a u32 value, returning it with the number of bytes consumed.
pub fn decode_u32(bytes: &[u8]) -> Result<(u32, usize)> {
    let (value, read) = decode_bounded(bytes, MAX_VARINT32_BYTES)?;
    Ok((value as u32, read))
}

/// Decode a u64 value, returning it with the number of bytes consumed.
pub fn decode_u64(bytes: &[u8]) -> Result<(u64, usize)> {
    decode_bounded(bytes, MAX_VARINT64_BYTES)
}

fn decode_bounded(bytes: &[u8], max_bytes: usize) -> Result<(u64, usize)> {
    let mut result = 0u64;
    let mut shift = 0u32;

    for (i, &byte) in bytes.iter().take(max_bytes).enumerate() {
        result |= ((byte & 0x7F) as u64) << shift;

        if (byte & 0x80) == 0 {
            return Ok((result, i + 1));
        }

        shift += 7;
    }

    if bytes.len() >= max_bytes {
        Err(ShardError::MalformedVarint { max_bytes })
    } else {
        // Continuation bit set on the last available byte.
        Err(ShardError::truncated(bytes.len() + 1, bytes.len()))
    }
}
