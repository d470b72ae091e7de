//! Shared types used across the sigmatch library.

use core::fmt;
#[cfg(feature = "std")]
use std::error;

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};

use crate::encode;

// =============================================================================
// DIGEST
// =============================================================================

/// An immutable hash output.
///
/// Sequential-engine digests are 1–64 bytes; tree-engine digests may be any
/// length the caller requested (the tree hash is an XOF). The canonical text
/// form is lowercase hex, twice the byte length.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest {
    bytes: Vec<u8>,
}

impl Digest {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Digest length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for a zero-length digest (an XOF output of length 0).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Raw digest bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Canonical lowercase hex form.
    #[must_use]
    pub fn to_hex(&self) -> String {
        encode::to_hex(&self.bytes)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

// =============================================================================
// SIMILARITY RESULT
// =============================================================================

/// One entry in a similarity-search ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityResult {
    /// Index of the candidate in the scanned collection.
    pub index: usize,
    /// Bit-level similarity in `[0, 1]`; `1.0` means byte-identical.
    pub similarity: f64,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors reported by the hash engines.
///
/// All variants are local and recoverable: no failed call corrupts engine
/// state, so the caller may retry with corrected parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashError {
    /// Requested output length is zero or exceeds the engine maximum.
    InvalidLength {
        /// The rejected length.
        requested: usize,
    },
    /// `finalize` asked for a length that differs from the one given at init.
    LengthMismatch {
        /// Length fixed at initialization.
        expected: usize,
        /// Length requested at finalization.
        requested: usize,
    },
    /// The engine was already finalized; re-initialize to hash again.
    AlreadyFinalized,
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { requested } => {
                write!(f, "invalid output length {requested} (must be 1..=64)")
            }
            Self::LengthMismatch {
                expected,
                requested,
            } => {
                write!(
                    f,
                    "output length mismatch: initialized with {expected}, finalize asked for {requested}"
                )
            }
            Self::AlreadyFinalized => f.write_str("hash state already finalized"),
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for HashError {}

/// Errors reported by the batch-matching layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchError {
    /// The target digest is empty.
    EmptyTarget,
    /// The candidate collection is empty.
    EmptyCollection,
    /// The similarity threshold is outside `[0, 1]` (or NaN).
    InvalidThreshold {
        /// The rejected threshold.
        value: f64,
    },
    /// The two digests have different byte lengths.
    LengthMismatch {
        /// Length of the first digest.
        left: usize,
        /// Length of the second digest.
        right: usize,
    },
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTarget => f.write_str("target digest is empty"),
            Self::EmptyCollection => f.write_str("candidate collection is empty"),
            Self::InvalidThreshold { value } => {
                write!(f, "similarity threshold {value} outside [0, 1]")
            }
            Self::LengthMismatch { left, right } => {
                write!(f, "digest length mismatch: {left} vs {right} bytes")
            }
        }
    }
}

#[cfg(feature = "std")]
impl error::Error for MatchError {}
