//! Batch Matching Layer
//!
//! Read-only scans of a candidate fingerprint collection against a target:
//! exact matching on the canonical hex text form, and bit-level similarity
//! ranking on the binary form. Absent (`None`) candidate slots are skipped,
//! never fatal, so a sparse signature database scans cleanly.
//!
//! The layer holds no state across calls and never mutates its inputs;
//! concurrent scans over the same collection are safe.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::types::{MatchError, SimilarityResult};

// =============================================================================
// EXACT MATCH
// =============================================================================

/// Find every candidate byte-identical to `target` (both in canonical
/// lowercase hex form).
///
/// Returns the matching indices in ascending scan order; duplicates in the
/// collection are all reported. An empty `Ok` vector means the scan ran and
/// nothing matched.
///
/// ```rust
/// use sigmatch::matching::exact_match;
///
/// let db = [Some("aa11"), Some("bb22"), None, Some("bb22")];
/// assert_eq!(exact_match("bb22", &db)?, vec![1, 3]);
/// # Ok::<(), sigmatch::MatchError>(())
/// ```
///
/// # Errors
/// `EmptyTarget` / `EmptyCollection` when either input is empty.
pub fn exact_match<S: AsRef<str>>(
    target: &str,
    candidates: &[Option<S>],
) -> Result<Vec<usize>, MatchError> {
    if target.is_empty() {
        return Err(MatchError::EmptyTarget);
    }
    if candidates.is_empty() {
        return Err(MatchError::EmptyCollection);
    }

    let mut matches = Vec::new();
    for (index, candidate) in candidates.iter().enumerate() {
        if let Some(hex) = candidate {
            if hex.as_ref() == target {
                matches.push(index);
            }
        }
    }
    Ok(matches)
}

// =============================================================================
// SIMILARITY SEARCH
// =============================================================================

/// Bit-level Hamming distance between two equal-length digests.
///
/// # Errors
/// `LengthMismatch` if the byte lengths differ.
pub fn hamming_distance(a: &[u8], b: &[u8]) -> Result<u32, MatchError> {
    if a.len() != b.len() {
        return Err(MatchError::LengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x ^ y).count_ones())
        .sum())
}

/// Rank candidates by bit-level similarity to `target`.
///
/// For each present candidate of the same byte length N, the similarity is
/// `1 − hamming/(8·N)`. Candidates at or above `threshold` (inclusive) are
/// returned sorted by similarity descending; equal scores keep their scan
/// order. Absent candidates and candidates of a different length are
/// skipped. An empty `Ok` vector means nothing met the threshold.
///
/// ```rust
/// use sigmatch::matching::similarity_search;
///
/// let target = [0x00u8; 32];
/// let db = [Some([0x00u8; 32]), Some([0xffu8; 32])];
/// let ranked = similarity_search(&target, &db, 0.5)?;
/// assert_eq!(ranked.len(), 1);
/// assert_eq!(ranked[0].index, 0);
/// # Ok::<(), sigmatch::MatchError>(())
/// ```
///
/// # Errors
/// `EmptyTarget` / `EmptyCollection` on empty inputs, `InvalidThreshold`
/// when `threshold` is outside `[0, 1]`.
pub fn similarity_search<C: AsRef<[u8]>>(
    target: &[u8],
    candidates: &[Option<C>],
    threshold: f64,
) -> Result<Vec<SimilarityResult>, MatchError> {
    if target.is_empty() {
        return Err(MatchError::EmptyTarget);
    }
    if candidates.is_empty() {
        return Err(MatchError::EmptyCollection);
    }
    if !(0.0..=1.0).contains(&threshold) {
        return Err(MatchError::InvalidThreshold { value: threshold });
    }

    #[allow(clippy::cast_precision_loss)]
    let total_bits = (target.len() * 8) as f64;

    let mut results = Vec::new();
    for (index, candidate) in candidates.iter().enumerate() {
        let Some(bytes) = candidate.as_ref().map(AsRef::as_ref) else {
            continue;
        };
        let Ok(distance) = hamming_distance(target, bytes) else {
            continue;
        };
        let similarity = 1.0 - f64::from(distance) / total_bits;
        if similarity >= threshold {
            results.push(SimilarityResult { index, similarity });
        }
    }

    // Stable sort: equal similarities preserve scan order.
    results.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
    Ok(results)
}
