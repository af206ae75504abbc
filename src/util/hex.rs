//! Lowercase hexadecimal rendering of raw identifiers.

use std::fmt::Write;

/// Encode bytes as a lowercase hex string, two characters per byte.
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing into a String cannot fail.
        let _ = write!(out, "{byte:02x}");
    }
    out
}
