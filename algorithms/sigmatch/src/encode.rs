//! Digest Encoding
//!
//! Binary digest to canonical lowercase hex text. Decoding is intentionally
//! absent: every comparison in the matching layer happens on the canonical
//! lowercase form, so no caller needs hex -> binary.

#[cfg(not(feature = "std"))]
use alloc::string::String;

const HEX_CHARS: &[u8; 16] = b"0123456789abcdef";

/// Encode bytes as lowercase hex, most significant nibble first.
///
/// The output is always exactly twice the input length.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for &byte in bytes {
        out.push(char::from(HEX_CHARS[usize::from(byte >> 4)]));
        out.push(char::from(HEX_CHARS[usize::from(byte & 0x0f)]));
    }
    out
}
