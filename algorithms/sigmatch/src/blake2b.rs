//! Sequential Hash Engine (BLAKE2b)
//!
//! Fixed compression-function hash over a single linear byte stream,
//! RFC 7693 semantics, unkeyed, with a configurable digest length of
//! 1–64 bytes. Strictly single-pass and single-use: after `finalize`
//! the state is spent and further calls are rejected.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::types::{Digest, HashError};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Input block size in bytes.
pub const BLOCK_LEN: usize = 128;

/// Maximum digest length in bytes.
pub const MAX_OUT_LEN: usize = 64;

const IV: [u64; 8] = [
    0x6a09_e667_f3bc_c908,
    0xbb67_ae85_84ca_a73b,
    0x3c6e_f372_fe94_f82b,
    0xa54f_f53a_5f1d_36f1,
    0x510e_527f_ade6_82d1,
    0x9b05_688c_2b3e_6c1f,
    0x1f83_d9ab_fb41_bd6b,
    0x5be0_cd19_137e_2179,
];

/// Message word schedule, one row per round (rows 10 and 11 repeat 0 and 1).
const SIGMA: [[usize; 16]; 12] = [
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
    [11, 8, 12, 0, 5, 2, 15, 13, 10, 14, 3, 6, 7, 1, 9, 4],
    [7, 9, 3, 1, 13, 12, 11, 14, 2, 6, 5, 10, 4, 0, 15, 8],
    [9, 0, 5, 7, 2, 4, 10, 15, 14, 1, 11, 12, 6, 8, 3, 13],
    [2, 12, 6, 10, 0, 11, 8, 3, 4, 13, 7, 5, 15, 14, 1, 9],
    [12, 5, 1, 15, 14, 13, 4, 10, 0, 7, 6, 3, 9, 2, 8, 11],
    [13, 11, 7, 14, 12, 1, 3, 9, 5, 0, 15, 4, 8, 6, 2, 10],
    [6, 15, 14, 9, 11, 3, 0, 8, 12, 2, 13, 7, 1, 4, 10, 5],
    [10, 2, 8, 4, 7, 6, 1, 5, 15, 11, 9, 14, 3, 12, 13, 0],
    [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
    [14, 10, 4, 8, 9, 15, 13, 6, 1, 12, 0, 2, 11, 7, 5, 3],
];

const ROUNDS: usize = 12;

// =============================================================================
// COMPRESSION
// =============================================================================

/// Quarter-round mixing (64-bit ARX, rotations 32/24/16/63).
#[inline]
#[allow(clippy::many_single_char_names)]
const fn g(v: &mut [u64; 16], a: usize, b: usize, c: usize, d: usize, x: u64, y: u64) {
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(x);
    v[d] = (v[d] ^ v[a]).rotate_right(32);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(24);
    v[a] = v[a].wrapping_add(v[b]).wrapping_add(y);
    v[d] = (v[d] ^ v[a]).rotate_right(16);
    v[c] = v[c].wrapping_add(v[d]);
    v[b] = (v[b] ^ v[c]).rotate_right(63);
}

// =============================================================================
// SEQUENTIAL ENGINE
// =============================================================================

/// Incremental BLAKE2b state.
///
/// ```rust
/// use sigmatch::Blake2b;
///
/// let mut hasher = Blake2b::new(32)?;
/// hasher.update(b"suspicious payload")?;
/// let digest = hasher.finalize(32)?;
/// assert_eq!(digest.len(), 32);
/// # Ok::<(), sigmatch::HashError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Blake2b {
    /// Chaining words.
    h: [u64; 8],
    /// 128-bit byte counter, low half first.
    t: [u64; 2],
    /// Finalization flags; `f[0]` goes all-ones on the last block.
    f: [u64; 2],
    buf: [u8; BLOCK_LEN],
    buf_len: usize,
    out_len: usize,
    finalized: bool,
}

impl Blake2b {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    /// Create a new state producing `out_len` digest bytes.
    ///
    /// # Errors
    /// `InvalidLength` unless `1 <= out_len <= 64`.
    pub const fn new(out_len: usize) -> Result<Self, HashError> {
        if out_len == 0 || out_len > MAX_OUT_LEN {
            return Err(HashError::InvalidLength { requested: out_len });
        }
        let mut h = IV;
        // Parameter block for an unkeyed sequential hash: digest length,
        // fanout 1, depth 1.
        h[0] ^= 0x0101_0000 ^ out_len as u64;
        Ok(Self {
            h,
            t: [0, 0],
            f: [0, 0],
            buf: [0; BLOCK_LEN],
            buf_len: 0,
            out_len,
            finalized: false,
        })
    }

    // =========================================================================
    // STATE MODIFICATION
    // =========================================================================

    /// Absorb input, compressing a block each time the 128-byte buffer fills.
    ///
    /// The byte counter only ever advances by full-block multiples here; the
    /// final partial block is counted during `finalize`.
    ///
    /// # Errors
    /// `AlreadyFinalized` once `finalize` has succeeded.
    pub fn update(&mut self, mut input: &[u8]) -> Result<(), HashError> {
        if self.finalized {
            return Err(HashError::AlreadyFinalized);
        }
        if self.buf_len + input.len() > BLOCK_LEN {
            // The buffer overflows: flush it, then stream whole blocks
            // directly from the input, always keeping at least one byte
            // back so the last block is finalized with the flag set.
            let fill = BLOCK_LEN - self.buf_len;
            self.buf[self.buf_len..].copy_from_slice(&input[..fill]);
            input = &input[fill..];
            self.buf_len = 0;
            self.advance_counter(BLOCK_LEN as u64);
            let block = self.buf;
            self.compress(&block);

            while input.len() > BLOCK_LEN {
                let mut block = [0u8; BLOCK_LEN];
                block.copy_from_slice(&input[..BLOCK_LEN]);
                input = &input[BLOCK_LEN..];
                self.advance_counter(BLOCK_LEN as u64);
                self.compress(&block);
            }
        }
        self.buf[self.buf_len..self.buf_len + input.len()].copy_from_slice(input);
        self.buf_len += input.len();
        Ok(())
    }

    /// Pad the last block with zeros, set the finalization flag, run one
    /// last compression, and serialize the chaining words little-endian.
    ///
    /// Validation happens before any mutation: a rejected call leaves the
    /// state exactly as it was, so hashing can continue or be retried.
    ///
    /// # Errors
    /// `LengthMismatch` if `out_len` differs from the length given to
    /// [`Blake2b::new`]; `AlreadyFinalized` on a second call.
    pub fn finalize(&mut self, out_len: usize) -> Result<Digest, HashError> {
        if out_len != self.out_len {
            return Err(HashError::LengthMismatch {
                expected: self.out_len,
                requested: out_len,
            });
        }
        if self.finalized {
            return Err(HashError::AlreadyFinalized);
        }

        self.advance_counter(self.buf_len as u64);
        self.f[0] = u64::MAX;
        self.buf[self.buf_len..].fill(0);
        let block = self.buf;
        self.compress(&block);
        self.finalized = true;

        let mut out = Vec::with_capacity(self.out_len);
        for word in self.h {
            out.extend_from_slice(&word.to_le_bytes());
        }
        out.truncate(self.out_len);
        Ok(Digest::new(out))
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Advance the 128-bit byte counter with carry into the high half.
    const fn advance_counter(&mut self, n: u64) {
        self.t[0] = self.t[0].wrapping_add(n);
        if self.t[0] < n {
            self.t[1] = self.t[1].wrapping_add(1);
        }
    }

    fn compress(&mut self, block: &[u8; BLOCK_LEN]) {
        let mut m = [0u64; 16];
        for (i, word) in m.iter_mut().enumerate() {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(&block[8 * i..8 * i + 8]);
            *word = u64::from_le_bytes(bytes);
        }

        let mut v = [0u64; 16];
        v[..8].copy_from_slice(&self.h);
        v[8..12].copy_from_slice(&IV[..4]);
        v[12] = IV[4] ^ self.t[0];
        v[13] = IV[5] ^ self.t[1];
        v[14] = IV[6] ^ self.f[0];
        v[15] = IV[7] ^ self.f[1];

        for s in SIGMA.iter().take(ROUNDS) {
            // Columns.
            g(&mut v, 0, 4, 8, 12, m[s[0]], m[s[1]]);
            g(&mut v, 1, 5, 9, 13, m[s[2]], m[s[3]]);
            g(&mut v, 2, 6, 10, 14, m[s[4]], m[s[5]]);
            g(&mut v, 3, 7, 11, 15, m[s[6]], m[s[7]]);
            // Diagonals.
            g(&mut v, 0, 5, 10, 15, m[s[8]], m[s[9]]);
            g(&mut v, 1, 6, 11, 12, m[s[10]], m[s[11]]);
            g(&mut v, 2, 7, 8, 13, m[s[12]], m[s[13]]);
            g(&mut v, 3, 4, 9, 14, m[s[14]], m[s[15]]);
        }

        for i in 0..8 {
            self.h[i] ^= v[i] ^ v[i + 8];
        }
    }
}
