//! Reference Vectors
//!
//! Pins the engines to the published algorithm families: inline golden
//! digests for well-known inputs, plus oracle cross-checks against the
//! official `blake3` crate and the RustCrypto `blake2` crate across chunk
//! and block boundaries, all three tree-hash modes, and long XOF output.

#![allow(clippy::pedantic, clippy::nursery)]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use blake2::digest::{Update as _, VariableOutput as _};
use blake2::Blake2bVar;

// =============================================================================
// GOLDEN VALUES
// =============================================================================

#[test]
fn test_tree_hash_empty_golden() {
    // Published 32-byte digest of the empty input.
    assert_eq!(
        sigmatch::hash(b"").to_hex(),
        "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
    );
}

#[test]
fn test_tree_hash_ascii_golden() {
    // Published digest of a short ASCII string.
    assert_eq!(
        sigmatch::hash_hex(b"hello world"),
        "d74981efa70a0c880b8d8c1985d075dbcbf679b99a5f9914e5aaf96b831a9e24"
    );
}

// =============================================================================
// TREE HASH ORACLE CROSS-CHECKS
// =============================================================================

/// Deterministic byte pattern so failures reproduce.
fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Sizes straddling the block (64) and chunk (1024) boundaries, plus
/// multi-level trees.
const SIZES: &[usize] = &[
    0, 1, 63, 64, 65, 127, 128, 129, 512, 1023, 1024, 1025, 2048, 2049, 3072, 3073, 4096, 5000,
    8192, 16384, 31744, 102_400,
];

#[test]
fn test_tree_hash_matches_reference_crate() {
    for &size in SIZES {
        let input = pattern(size);
        let ours = sigmatch::hash(&input);
        let theirs = blake3::hash(&input);
        assert_eq!(
            ours.as_bytes(),
            theirs.as_bytes(),
            "tree hash diverged from reference at {size} bytes"
        );
    }
}

#[test]
fn test_keyed_mode_matches_reference_crate() {
    let key = *b"whats the Elvish word for friend";
    for &size in SIZES {
        let input = pattern(size);
        let ours = sigmatch::hash_keyed(&key, &input);
        let theirs = blake3::keyed_hash(&key, &input);
        assert_eq!(
            ours.as_bytes(),
            theirs.as_bytes(),
            "keyed hash diverged from reference at {size} bytes"
        );
    }
}

#[test]
fn test_derive_key_mode_matches_reference_crate() {
    let context = "sigmatch 2025-08-24 signature database key";
    for &size in SIZES {
        let material = pattern(size);
        let ours = sigmatch::derive_key(context, &material);
        let theirs = blake3::derive_key(context, &material);
        assert_eq!(
            ours, theirs,
            "derived key diverged from reference at {size} bytes of material"
        );
    }
}

#[test]
fn test_xof_matches_reference_crate() {
    let input = pattern(3073);
    let ours = sigmatch::hash_xof(&input, 1000);

    let mut hasher = blake3::Hasher::new();
    hasher.update(&input);
    let mut theirs = vec![0u8; 1000];
    hasher.finalize_xof().fill(&mut theirs);

    assert_eq!(ours.as_bytes(), &theirs[..]);
}

#[test]
fn test_xof_unaligned_reads_match_reference_crate() {
    let input = pattern(100);
    let mut hasher = sigmatch::Blake3::new();
    hasher.update(&input);
    let mut reader = hasher.finalize_xof();

    let mut reference = blake3::Hasher::new();
    reference.update(&input);
    let mut reference_reader = reference.finalize_xof();

    // Read in deliberately awkward step sizes.
    for step in [1usize, 3, 7, 31, 64, 65, 127] {
        let mut ours = vec![0u8; step];
        let mut theirs = vec![0u8; step];
        reader.fill(&mut ours);
        reference_reader.fill(&mut theirs);
        assert_eq!(ours, theirs, "XOF mismatch reading {step} bytes");
    }
}

// =============================================================================
// SEQUENTIAL HASH ORACLE CROSS-CHECKS
// =============================================================================

fn blake2b_reference(input: &[u8], out_len: usize) -> Vec<u8> {
    let mut hasher = Blake2bVar::new(out_len).unwrap();
    hasher.update(input);
    let mut out = vec![0u8; out_len];
    hasher.finalize_variable(&mut out).unwrap();
    out
}

#[test]
fn test_sequential_hash_matches_reference_crate() {
    // 127/128/129 straddle the engine's block boundary; 256 is an exact
    // multiple, which exercises the buffered-final-block path.
    for &size in &[0usize, 1, 3, 64, 127, 128, 129, 255, 256, 257, 1000, 4096] {
        let input = pattern(size);
        let ours = sigmatch::hash_sequential(&input, 64).unwrap();
        assert_eq!(
            ours.as_bytes(),
            &blake2b_reference(&input, 64)[..],
            "sequential hash diverged from reference at {size} bytes"
        );
    }
}

#[test]
fn test_sequential_hash_all_output_lengths() {
    let input = pattern(300);
    for out_len in 1..=64 {
        let ours = sigmatch::hash_sequential(&input, out_len).unwrap();
        assert_eq!(ours.len(), out_len);
        assert_eq!(
            ours.as_bytes(),
            &blake2b_reference(&input, out_len)[..],
            "sequential hash diverged at output length {out_len}"
        );
    }
}

#[test]
fn test_sequential_hash_empty_input_matches_reference() {
    let ours = sigmatch::hash_sequential(b"", 32).unwrap();
    assert_eq!(ours.as_bytes(), &blake2b_reference(b"", 32)[..]);
}

// =============================================================================
// HEX ENCODING
// =============================================================================

#[test]
fn test_hex_matches_reference_crate() {
    let digest = sigmatch::hash(b"hex check");
    assert_eq!(digest.to_hex(), hex::encode(digest.as_bytes()));
    assert_eq!(sigmatch::encode::to_hex(&[]), "");
    assert_eq!(sigmatch::encode::to_hex(&[0x00, 0x0f, 0xf0, 0xff]), "000ff0ff");
}

#[test]
fn test_hex_is_lowercase_and_double_length() {
    let digest = sigmatch::hash_xof(b"case check", 48);
    let text = digest.to_hex();
    assert_eq!(text.len(), 96);
    assert!(text.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
}
