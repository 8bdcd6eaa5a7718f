//! Fixed-width numeric model for the packed stream.
//!
//! The codec moves data in 64-bit big-endian "words" and decodes against a
//! 256-bit "block": four words plus a count of how many leading bits are
//! valid. `BitBlock` is the single shiftable accumulator behind both the
//! decoder's bit window and the decode-table keys, replacing a pile of ad
//! hoc word-merging helpers with two operations: `push_word` and `take`.
//!
//! # Bit order
//!
//! Everything here is MSB-first: bit 0 of a block is the most significant
//! bit of `words[0]`, and bits beyond `len` are always zero. That zero-fill
//! invariant is what makes magnitude comparison (`BlockKey`) equivalent to
//! prefix comparison for left-justified canonical codes.

/// Number of distinct byte symbols.
pub const SYMBOL_COUNT: usize = 256;

/// Width in bits of one packed output word.
pub const WORD_BITS: u32 = 64;

/// Bytes per packed output word.
pub const WORD_BYTES: usize = (WORD_BITS / 8) as usize;

/// Words in one decode block.
pub const BLOCK_WORDS: usize = 4;

/// Total bit capacity of a [`BitBlock`].
pub const BLOCK_BITS: u32 = WORD_BITS * BLOCK_WORDS as u32;

/// Longest representable code. Codes must stay strictly below the word
/// width so a codeword always fits one word during encoding.
pub const MAX_CODE_BITS: u8 = (WORD_BITS - 1) as u8;

/// Internal buffer size for stream-backed bit I/O.
pub(crate) const IO_BUF_BYTES: usize = 32 * 1024;

/// Keep only the `count` most significant bits of `bits`.
#[inline]
pub(crate) fn mask_high(bits: u64, count: u32) -> u64 {
    if count >= WORD_BITS {
        bits
    } else if count == 0 {
        0
    } else {
        bits & (!0u64 << (WORD_BITS - count))
    }
}

/// 256-bit magnitude of a block, ordered most-significant word first.
///
/// Lexicographic comparison of the word array equals numeric comparison of
/// the 256-bit value, which is exactly the order the decode table needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BlockKey(pub [u64; BLOCK_WORDS]);

/// MSB-first accumulator of up to 256 bits.
///
/// # Invariants
/// - `len <= BLOCK_BITS`
/// - every bit at position >= `len` is zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BitBlock {
    words: [u64; BLOCK_WORDS],
    len: u32,
}

impl BitBlock {
    /// An empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of valid bits currently held.
    pub fn len(&self) -> u32 {
        self.len
    }

    /// True when no valid bits are held.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remaining bit capacity.
    pub fn capacity_left(&self) -> u32 {
        BLOCK_BITS - self.len
    }

    /// Magnitude of the block for ordered decode-table lookup.
    pub fn key(&self) -> BlockKey {
        BlockKey(self.words)
    }

    /// Append the `count` most significant bits of `bits`.
    ///
    /// The caller must leave at least `count` bits of capacity; this is an
    /// internal building block, so the precondition is only debug-checked.
    pub fn push_word(&mut self, bits: u64, count: u32) {
        debug_assert!(count <= self.capacity_left());
        if count == 0 {
            return;
        }
        let bits = mask_high(bits, count);
        let idx = (self.len / WORD_BITS) as usize;
        let offset = self.len % WORD_BITS;
        self.words[idx] |= bits >> offset;
        if offset > 0 && offset + count > WORD_BITS && idx + 1 < BLOCK_WORDS {
            self.words[idx + 1] |= bits << (WORD_BITS - offset);
        }
        self.len += count;
    }

    /// Consume the top `n` bits, shifting the remainder up.
    pub fn take(&mut self, n: u32) {
        debug_assert!(n <= self.len);
        let word_shift = (n / WORD_BITS) as usize;
        let bit_shift = n % WORD_BITS;
        let mut shifted = [0u64; BLOCK_WORDS];
        for (i, slot) in shifted.iter_mut().enumerate() {
            let src = i + word_shift;
            if src >= BLOCK_WORDS {
                break;
            }
            let mut value = self.words[src] << bit_shift;
            if bit_shift > 0 && src + 1 < BLOCK_WORDS {
                value |= self.words[src + 1] >> (WORD_BITS - bit_shift);
            }
            *slot = value;
        }
        self.words = shifted;
        self.len -= n;
    }
}
