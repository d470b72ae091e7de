//! Tree Hash Engine (BLAKE3)
//!
//! Chunk-based hash with an internal Merkle-tree reduction and unbounded
//! extendable output. Input is consumed 1024-byte chunks at a time; each
//! completed chunk yields a 256-bit chaining value that is folded into a
//! stack of unmerged subtree roots, mirroring binary-counter carries. The
//! stack never exceeds 54 entries, the maximum tree depth for any input
//! that fits in a 64-bit byte counter.
//!
//! Three modes: plain, keyed (32-byte key), and key derivation (context
//! string hashed through an internal instance, domain-separated from both
//! other modes by flag bits).

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

#[cfg(feature = "digest-trait")]
use crypto_common::{Key, KeySizeUser};
#[cfg(feature = "digest-trait")]
use digest::typenum::U32;
#[cfg(feature = "digest-trait")]
use digest::Output as DigestOutput;
#[cfg(feature = "digest-trait")]
use digest::{FixedOutput, HashMarker, KeyInit, OutputSizeUser, Reset, Update};

use crate::types::Digest;

// =============================================================================
// CONSTANTS
// =============================================================================

/// Default digest length in bytes.
pub const OUT_LEN: usize = 32;

/// Key length in bytes for keyed mode.
pub const KEY_LEN: usize = 32;

/// Compression-function block size in bytes.
pub const BLOCK_LEN: usize = 64;

/// Chunk size in bytes (16 blocks).
pub const CHUNK_LEN: usize = 1024;

/// Deepest possible chaining-value stack: one entry per incomplete
/// subtree level for up to 2^64 bytes of input.
const MAX_DEPTH: usize = 54;

const IV: [u32; 8] = [
    0x6a09_e667,
    0xbb67_ae85,
    0x3c6e_f372,
    0xa54f_f53a,
    0x510e_527f,
    0x9b05_688c,
    0x1f83_d9ab,
    0x5be0_cd19,
];

const MSG_PERMUTATION: [usize; 16] = [2, 6, 3, 10, 7, 0, 4, 13, 1, 11, 12, 5, 9, 14, 15, 8];

// Domain-separation flag bits.
const CHUNK_START: u32 = 1 << 0;
const CHUNK_END: u32 = 1 << 1;
const PARENT: u32 = 1 << 2;
const ROOT: u32 = 1 << 3;
const KEYED_HASH: u32 = 1 << 4;
const DERIVE_KEY_CONTEXT: u32 = 1 << 5;
const DERIVE_KEY_MATERIAL: u32 = 1 << 6;

// =============================================================================
// COMPRESSION
// =============================================================================

/// Quarter-round mixing (32-bit ARX, rotations 16/12/8/7).
#[inline]
#[allow(clippy::many_single_char_names)]
const fn g(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize, mx: u32, my: u32) {
    state[a] = state[a].wrapping_add(state[b]).wrapping_add(mx);
    state[d] = (state[d] ^ state[a]).rotate_right(16);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_right(12);
    state[a] = state[a].wrapping_add(state[b]).wrapping_add(my);
    state[d] = (state[d] ^ state[a]).rotate_right(8);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_right(7);
}

fn round(state: &mut [u32; 16], m: &[u32; 16]) {
    // Columns.
    g(state, 0, 4, 8, 12, m[0], m[1]);
    g(state, 1, 5, 9, 13, m[2], m[3]);
    g(state, 2, 6, 10, 14, m[4], m[5]);
    g(state, 3, 7, 11, 15, m[6], m[7]);
    // Diagonals.
    g(state, 0, 5, 10, 15, m[8], m[9]);
    g(state, 1, 6, 11, 12, m[10], m[11]);
    g(state, 2, 7, 8, 13, m[12], m[13]);
    g(state, 3, 4, 9, 14, m[14], m[15]);
}

fn permute(m: &mut [u32; 16]) {
    let mut permuted = [0u32; 16];
    for i in 0..16 {
        permuted[i] = m[MSG_PERMUTATION[i]];
    }
    *m = permuted;
}

/// Core compression: 16-word state from 8 chaining words, 4 IV words, the
/// two counter halves, the block length, and the flag byte; 7 rounds with
/// the message permuted between rounds.
fn compress(
    chaining_value: &[u32; 8],
    block_words: &[u32; 16],
    counter: u64,
    block_len: u32,
    flags: u32,
) -> [u32; 16] {
    #[allow(clippy::cast_possible_truncation)]
    let mut state = [
        chaining_value[0],
        chaining_value[1],
        chaining_value[2],
        chaining_value[3],
        chaining_value[4],
        chaining_value[5],
        chaining_value[6],
        chaining_value[7],
        IV[0],
        IV[1],
        IV[2],
        IV[3],
        counter as u32,
        (counter >> 32) as u32,
        block_len,
        flags,
    ];
    let mut block = *block_words;

    round(&mut state, &block); // round 1
    permute(&mut block);
    round(&mut state, &block); // round 2
    permute(&mut block);
    round(&mut state, &block); // round 3
    permute(&mut block);
    round(&mut state, &block); // round 4
    permute(&mut block);
    round(&mut state, &block); // round 5
    permute(&mut block);
    round(&mut state, &block); // round 6
    permute(&mut block);
    round(&mut state, &block); // round 7

    for i in 0..8 {
        state[i] ^= state[i + 8];
        state[i + 8] ^= chaining_value[i];
    }
    state
}

fn first_8_words(compression_output: [u32; 16]) -> [u32; 8] {
    let mut words = [0u32; 8];
    words.copy_from_slice(&compression_output[..8]);
    words
}

fn words_from_le_bytes_32(bytes: &[u8; 32]) -> [u32; 8] {
    let mut words = [0u32; 8];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        let mut four = [0u8; 4];
        four.copy_from_slice(chunk);
        *word = u32::from_le_bytes(four);
    }
    words
}

fn words_from_le_bytes_64(bytes: &[u8; 64]) -> [u32; 16] {
    let mut words = [0u32; 16];
    for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
        let mut four = [0u8; 4];
        four.copy_from_slice(chunk);
        *word = u32::from_le_bytes(four);
    }
    words
}

// =============================================================================
// NODE OUTPUT
// =============================================================================

/// A chunk or parent node captured just before its final compression.
///
/// Keeping the pre-compression inputs (rather than the compressed value)
/// lets the same node serve two purposes: produce a 256-bit chaining value
/// for the tree, or, with the root flag added, seed the XOF output stream
/// at any block counter.
#[derive(Clone, Copy)]
struct NodeOutput {
    input_chaining_value: [u32; 8],
    block_words: [u32; 16],
    counter: u64,
    block_len: u32,
    flags: u32,
}

impl NodeOutput {
    fn chaining_value(&self) -> [u32; 8] {
        first_8_words(compress(
            &self.input_chaining_value,
            &self.block_words,
            self.counter,
            self.block_len,
            self.flags,
        ))
    }
}

fn parent_node(
    left_child_cv: [u32; 8],
    right_child_cv: [u32; 8],
    key_words: [u32; 8],
    flags: u32,
) -> NodeOutput {
    let mut block_words = [0u32; 16];
    block_words[..8].copy_from_slice(&left_child_cv);
    block_words[8..].copy_from_slice(&right_child_cv);
    NodeOutput {
        input_chaining_value: key_words,
        block_words,
        // Parent nodes always use counter 0.
        counter: 0,
        block_len: BLOCK_LEN as u32,
        flags: PARENT | flags,
    }
}

fn parent_cv(
    left_child_cv: [u32; 8],
    right_child_cv: [u32; 8],
    key_words: [u32; 8],
    flags: u32,
) -> [u32; 8] {
    parent_node(left_child_cv, right_child_cv, key_words, flags).chaining_value()
}

// =============================================================================
// CHUNK STATE
// =============================================================================

/// State for the chunk currently being absorbed: at most 16 compressed
/// blocks plus one partially filled 64-byte buffer.
#[derive(Clone)]
struct ChunkState {
    chaining_value: [u32; 8],
    chunk_counter: u64,
    block: [u8; BLOCK_LEN],
    block_len: u8,
    blocks_compressed: u8,
    flags: u32,
}

impl ChunkState {
    const fn new(key_words: [u32; 8], chunk_counter: u64, flags: u32) -> Self {
        Self {
            chaining_value: key_words,
            chunk_counter,
            block: [0; BLOCK_LEN],
            block_len: 0,
            blocks_compressed: 0,
            flags,
        }
    }

    /// Bytes absorbed into this chunk so far.
    const fn len(&self) -> usize {
        BLOCK_LEN * self.blocks_compressed as usize + self.block_len as usize
    }

    /// The first block of each chunk carries the chunk-start flag.
    const fn start_flag(&self) -> u32 {
        if self.blocks_compressed == 0 {
            CHUNK_START
        } else {
            0
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn update(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            // A full buffered block is only compressed once more input
            // arrives; the chunk's last block must instead flow into
            // `node()` with the chunk-end flag.
            if usize::from(self.block_len) == BLOCK_LEN {
                let block_words = words_from_le_bytes_64(&self.block);
                self.chaining_value = first_8_words(compress(
                    &self.chaining_value,
                    &block_words,
                    self.chunk_counter,
                    BLOCK_LEN as u32,
                    self.flags | self.start_flag(),
                ));
                self.blocks_compressed += 1;
                self.block = [0; BLOCK_LEN];
                self.block_len = 0;
            }

            let want = BLOCK_LEN - usize::from(self.block_len);
            let take = want.min(input.len());
            self.block[usize::from(self.block_len)..usize::from(self.block_len) + take]
                .copy_from_slice(&input[..take]);
            self.block_len += take as u8;
            input = &input[take..];
        }
    }

    fn node(&self) -> NodeOutput {
        NodeOutput {
            input_chaining_value: self.chaining_value,
            block_words: words_from_le_bytes_64(&self.block),
            counter: self.chunk_counter,
            block_len: u32::from(self.block_len),
            flags: self.flags | self.start_flag() | CHUNK_END,
        }
    }
}

// =============================================================================
// TREE HASHER
// =============================================================================

/// Incremental tree hasher with extendable output.
///
/// Splitting the input across any combination of [`update`](Self::update)
/// calls yields the same digest as a single call, and `finalize` borrows
/// the state immutably, so output may be requested repeatedly and at any
/// length.
///
/// ```rust
/// use sigmatch::Blake3;
///
/// let mut hasher = Blake3::new();
/// hasher.update(b"chunk 1");
/// hasher.update(b"chunk 2");
/// let digest = hasher.finalize(32);
/// assert_eq!(digest, {
///     let mut h = Blake3::new();
///     h.update(b"chunk 1chunk 2");
///     h.finalize(32)
/// });
/// ```
#[derive(Clone)]
pub struct Blake3 {
    chunk_state: ChunkState,
    key_words: [u32; 8],
    /// Unmerged subtree roots, one per set bit of the completed-chunk
    /// count, deepest (largest subtree) first.
    cv_stack: [[u32; 8]; MAX_DEPTH],
    cv_stack_len: u8,
    flags: u32,
}

impl Blake3 {
    // =========================================================================
    // INITIALIZATION
    // =========================================================================

    const fn new_internal(key_words: [u32; 8], flags: u32) -> Self {
        Self {
            chunk_state: ChunkState::new(key_words, 0, flags),
            key_words,
            cv_stack: [[0; 8]; MAX_DEPTH],
            cv_stack_len: 0,
            flags,
        }
    }

    /// Plain hashing mode: the root key is the fixed IV.
    #[must_use]
    pub const fn new() -> Self {
        Self::new_internal(IV, 0)
    }

    /// Keyed mode with an explicit 32-byte key.
    #[must_use]
    pub fn new_keyed(key: &[u8; KEY_LEN]) -> Self {
        Self::new_internal(words_from_le_bytes_32(key), KEYED_HASH)
    }

    /// Key-derivation mode.
    ///
    /// The context string is hashed through an internal instance with its
    /// own flag to derive the key, then the material is hashed keyed with
    /// a second, distinct flag. The two-stage construction keeps derived
    /// keys domain-separated from directly supplied ones.
    #[must_use]
    pub fn new_derive_key(context: &str) -> Self {
        let mut context_hasher = Self::new_internal(IV, DERIVE_KEY_CONTEXT);
        context_hasher.update(context.as_bytes());
        let mut context_key = [0u8; KEY_LEN];
        Self::finalize_into(&context_hasher, &mut context_key);
        Self::new_internal(words_from_le_bytes_32(&context_key), DERIVE_KEY_MATERIAL)
    }

    // =========================================================================
    // STATE MODIFICATION
    // =========================================================================

    /// Absorb input. May be called any number of times with chunks of any
    /// length.
    pub fn update(&mut self, mut input: &[u8]) {
        while !input.is_empty() {
            // A full chunk is only reduced to a chaining value once more
            // input exists: the final chunk of the message must stay in
            // `chunk_state` so finalization can flag it as the root.
            if self.chunk_state.len() == CHUNK_LEN {
                let chunk_cv = self.chunk_state.node().chaining_value();
                let total_chunks = self.chunk_state.chunk_counter + 1;
                self.add_chunk_chaining_value(chunk_cv, total_chunks);
                self.chunk_state = ChunkState::new(self.key_words, total_chunks, self.flags);
            }

            let want = CHUNK_LEN - self.chunk_state.len();
            let take = want.min(input.len());
            self.chunk_state.update(&input[..take]);
            input = &input[take..];
        }
    }

    /// Reset to the empty-input state, keeping the mode and key.
    pub fn reset(&mut self) {
        self.chunk_state = ChunkState::new(self.key_words, 0, self.flags);
        self.cv_stack_len = 0;
    }

    /// Fold a completed chunk's chaining value into the stack.
    ///
    /// Each trailing zero bit of the new total chunk count marks a subtree
    /// that just completed: its left child is on top of the stack and its
    /// right child is `new_cv`. Merging per bit and pushing the remainder
    /// is exactly binary-counter carry propagation, which keeps the stack
    /// equal to the set bits of the chunk count.
    fn add_chunk_chaining_value(&mut self, mut new_cv: [u32; 8], mut total_chunks: u64) {
        while total_chunks & 1 == 0 {
            new_cv = parent_cv(self.pop_stack(), new_cv, self.key_words, self.flags);
            total_chunks >>= 1;
        }
        self.push_stack(new_cv);
    }

    const fn push_stack(&mut self, cv: [u32; 8]) {
        self.cv_stack[self.cv_stack_len as usize] = cv;
        self.cv_stack_len += 1;
    }

    const fn pop_stack(&mut self) -> [u32; 8] {
        self.cv_stack_len -= 1;
        self.cv_stack[self.cv_stack_len as usize]
    }

    // =========================================================================
    // FINALIZATION
    // =========================================================================

    /// The root node: the current chunk merged with every stacked subtree
    /// root, most recent first. A single-chunk message has no parent nodes
    /// at all; its own chunk output becomes the root directly.
    fn root_node(&self) -> NodeOutput {
        let mut node = self.chunk_state.node();
        let mut parents_remaining = usize::from(self.cv_stack_len);
        while parents_remaining > 0 {
            parents_remaining -= 1;
            node = parent_node(
                self.cv_stack[parents_remaining],
                node.chaining_value(),
                self.key_words,
                self.flags,
            );
        }
        node
    }

    /// Produce a digest of `out_len` bytes.
    ///
    /// Any length ≥ 0 is valid and outputs of different lengths share a
    /// common prefix. The length is caller-controlled and uncapped; bound
    /// it before passing through untrusted values.
    #[must_use]
    pub fn finalize(&self, out_len: usize) -> Digest {
        let mut out = Vec::new();
        out.resize(out_len, 0);
        self.finalize_into(&mut out);
        Digest::new(out)
    }

    /// Fill `out` with XOF output.
    pub fn finalize_into(&self, out: &mut [u8]) {
        self.finalize_xof().fill(out);
    }

    /// Incremental XOF output stream starting at position 0.
    #[must_use]
    pub fn finalize_xof(&self) -> OutputReader {
        OutputReader {
            node: self.root_node(),
            position: 0,
        }
    }
}

impl Default for Blake3 {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// XOF OUTPUT READER
// =============================================================================

/// Streaming reader over the unbounded XOF output.
///
/// Each 64-byte output block is one compression of the root node at an
/// incrementing block counter; the reader tracks a byte position so reads
/// need not be block-aligned. Output length is caller-bounded.
#[derive(Clone)]
pub struct OutputReader {
    node: NodeOutput,
    position: u64,
}

impl OutputReader {
    /// Fill `buf` with the next bytes of output, advancing the position.
    #[allow(clippy::cast_possible_truncation)]
    pub fn fill(&mut self, buf: &mut [u8]) {
        let mut filled = 0;
        while filled < buf.len() {
            let block_counter = self.position / BLOCK_LEN as u64;
            let offset_within_block = (self.position % BLOCK_LEN as u64) as usize;

            let words = compress(
                &self.node.input_chaining_value,
                &self.node.block_words,
                block_counter,
                self.node.block_len,
                self.node.flags | ROOT,
            );
            let mut block = [0u8; BLOCK_LEN];
            for (chunk, word) in block.chunks_exact_mut(4).zip(words.iter()) {
                chunk.copy_from_slice(&word.to_le_bytes());
            }

            let take = (BLOCK_LEN - offset_within_block).min(buf.len() - filled);
            buf[filled..filled + take]
                .copy_from_slice(&block[offset_within_block..offset_within_block + take]);
            filled += take;
            self.position += take as u64;
        }
    }

    /// Current byte position in the output stream.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }
}

// =============================================================================
// TRAIT IMPL
// =============================================================================

#[cfg(feature = "digest-trait")]
impl OutputSizeUser for Blake3 {
    type OutputSize = U32;
}

#[cfg(feature = "digest-trait")]
impl KeySizeUser for Blake3 {
    type KeySize = U32;
}

#[cfg(feature = "digest-trait")]
impl Update for Blake3 {
    fn update(&mut self, data: &[u8]) {
        self.update(data);
    }
}

#[cfg(feature = "digest-trait")]
impl FixedOutput for Blake3 {
    fn finalize_into(self, out: &mut DigestOutput<Self>) {
        let digest = self.finalize(OUT_LEN);
        out.copy_from_slice(digest.as_bytes());
    }
}

#[cfg(feature = "digest-trait")]
impl Reset for Blake3 {
    fn reset(&mut self) {
        self.reset();
    }
}

#[cfg(feature = "digest-trait")]
impl HashMarker for Blake3 {}

#[cfg(feature = "digest-trait")]
impl KeyInit for Blake3 {
    #[allow(clippy::expect_used)]
    fn new(key: &Key<Self>) -> Self {
        // Safe conversion since KeySize is U32 (32 bytes)
        let k: [u8; KEY_LEN] = key.as_slice().try_into().expect("Key length mismatch");
        Self::new_keyed(&k)
    }
}
