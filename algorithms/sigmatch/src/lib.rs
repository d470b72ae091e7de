#![cfg_attr(not(feature = "std"), no_std)]

//! # sigmatch
//!
//! Content-fingerprint engines and batch signature matching: hash a
//! suspicious payload, then ask a signature database "is this known?"
//! and "what is closest?".
//!
//! Two engines produce the fingerprints:
//! - [`Blake3`] — chunked Merkle-tree hash with extendable output.
//! - [`Blake2b`] — sequential hash with a configurable 1–64 byte digest.

//! # Usage
//! ```rust
//! // 1. Fingerprint a payload
//! let digest = sigmatch::hash(b"eval(base64.decode(payload))");
//!
//! // 2. Exact lookup against a signature database
//! let db = [Some(digest.to_hex()), None];
//! let hits = sigmatch::matching::exact_match(&digest.to_hex(), &db)?;
//! assert_eq!(hits, vec![0]);
//!
//! // 3. Nearest variants above a similarity threshold
//! let signatures = [Some(sigmatch::hash(b"eval(base64.decode(payload2))"))];
//! let ranked = sigmatch::matching::similarity_search(digest.as_bytes(), &signatures, 0.25)?;
//! assert_eq!(ranked[0].index, 0);
//! # Ok::<(), sigmatch::MatchError>(())
//! ```

// =============================================================================
// MODULES
// =============================================================================

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod blake2b;
pub mod blake3;
pub mod encode;
pub mod matching;
mod oneshot;
mod types;

// =============================================================================
// EXPORTS
// =============================================================================

#[cfg(feature = "digest-trait")]
pub use digest;
pub use blake2b::Blake2b;
pub use blake3::{Blake3, OutputReader};
pub use oneshot::{
    batch_hash, derive_key, hash, hash_hex, hash_keyed, hash_sequential, hash_xof, verify,
};
pub use types::{Digest, HashError, MatchError, SimilarityResult};
