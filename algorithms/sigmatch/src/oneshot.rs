//! Public API Layer
//!
//! One-call helpers over the two engines for callers that have the whole
//! payload in memory.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use subtle::ConstantTimeEq;

use crate::blake2b::Blake2b;
use crate::blake3::{Blake3, KEY_LEN, OUT_LEN};
use crate::types::{Digest, HashError};

// =============================================================================
// TREE HASHING
// =============================================================================

/// Compute the standard 32-byte tree-hash fingerprint.
///
/// # Example
/// ```rust
/// let digest = sigmatch::hash(b"import os; os.system('rm -rf /')");
/// assert_eq!(digest.len(), 32);
/// ```
#[must_use]
#[inline]
pub fn hash(input: &[u8]) -> Digest {
    hash_xof(input, OUT_LEN)
}

/// Compute the tree-hash fingerprint directly in hex text form.
#[must_use]
pub fn hash_hex(input: &[u8]) -> String {
    hash(input).to_hex()
}

/// Compute a tree-hash digest of arbitrary length (extendable output).
///
/// `out_len` is caller-controlled and uncapped; bound it before passing
/// through untrusted values.
#[must_use]
pub fn hash_xof(input: &[u8], out_len: usize) -> Digest {
    let mut hasher = Blake3::new();
    hasher.update(input);
    hasher.finalize(out_len)
}

/// Fingerprint each payload in a batch, preserving order.
#[must_use]
pub fn batch_hash<T: AsRef<[u8]>>(inputs: &[T]) -> Vec<Digest> {
    inputs.iter().map(|input| hash(input.as_ref())).collect()
}

// =============================================================================
// KEYED HASHING & KEY DERIVATION
// =============================================================================

/// Tree hash with an explicit 32-byte key.
#[must_use]
pub fn hash_keyed(key: &[u8; KEY_LEN], input: &[u8]) -> Digest {
    let mut hasher = Blake3::new_keyed(key);
    hasher.update(input);
    hasher.finalize(OUT_LEN)
}

/// Derive a 32-byte key from key material, domain-separated by `context`.
///
/// # Example
/// ```rust
/// let session = sigmatch::derive_key("session 2025-08-24", b"master material");
/// let index = sigmatch::derive_key("db index", b"master material");
/// assert_ne!(session, index);
/// ```
#[must_use]
pub fn derive_key(context: &str, key_material: &[u8]) -> [u8; KEY_LEN] {
    let mut hasher = Blake3::new_derive_key(context);
    hasher.update(key_material);
    let mut out = [0u8; KEY_LEN];
    hasher.finalize_into(&mut out);
    out
}

// =============================================================================
// SEQUENTIAL HASHING
// =============================================================================

/// Compute a sequential-engine digest of `out_len` bytes (1–64).
///
/// # Errors
/// `InvalidLength` unless `1 <= out_len <= 64`.
pub fn hash_sequential(input: &[u8], out_len: usize) -> Result<Digest, HashError> {
    let mut hasher = Blake2b::new(out_len)?;
    hasher.update(input)?;
    hasher.finalize(out_len)
}

// =============================================================================
// VERIFICATION
// =============================================================================

/// Recompute the fingerprint of `input` and compare against `expected` in
/// constant time.
///
/// # Example
/// ```rust
/// let digest = sigmatch::hash(b"payload");
/// assert!(sigmatch::verify(b"payload", &digest));
/// assert!(!sigmatch::verify(b"payload2", &digest));
/// ```
#[must_use]
pub fn verify(input: &[u8], expected: &Digest) -> bool {
    let computed = hash_xof(input, expected.len());
    computed.as_bytes().ct_eq(expected.as_bytes()).into()
}
