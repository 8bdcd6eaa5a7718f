//! Canonical Huffman code construction.
//!
//! The wire format carries nothing but a 256-entry table of code lengths,
//! so both sides derive their tables from lengths alone: the encoder
//! builds lengths from frequencies via a transient Huffman tree, then both
//! encoder and decoder run the same canonical assignment over the lengths.
//! Canonical order is increasing code length, then increasing symbol
//! value, with the first code of each length equal to
//! `(last code of the previous length + 1) << 1`.
//!
//! The decode table maps each code, left-justified into 256 bits, to its
//! symbol. Because canonical codes are prefix-free and left-justified keys
//! are the minimum window value compatible with a code, "greatest stored
//! key <= window" is an unambiguous prefix match.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, BTreeMap};
use std::io::{ErrorKind, Read};

use crate::block::{BitBlock, BlockKey, MAX_CODE_BITS, SYMBOL_COUNT, WORD_BITS};
use crate::error::{CodebookError, Result};

/// Per-symbol occurrence counts over the full input.
pub type FreqTable = [u64; SYMBOL_COUNT];

/// Per-symbol canonical code lengths; 0 marks an absent symbol. This array
/// is written verbatim as the stream header.
pub type CodeLengths = [u8; SYMBOL_COUNT];

/// One assigned codeword: the code bits left-aligned in a word, plus the
/// number of significant bits (1..=63). `len == 0` marks an absent symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Codeword {
    pub bits: u64,
    pub len: u8,
}

/// Count symbol frequencies with a single buffered pass over `input`.
///
/// Guarantees at least two symbols end up with nonzero frequency: if the
/// input holds fewer than two distinct bytes, the lowest-valued absent
/// symbols are given a synthetic count of one. This keeps the Huffman tree
/// from degenerating to a single node, so every present symbol receives a
/// code of length >= 1.
pub fn count_frequencies<R: Read>(input: &mut R) -> Result<FreqTable> {
    let mut freq = [0u64; SYMBOL_COUNT];
    let mut distinct = 0usize;
    let mut buf = [0u8; crate::block::IO_BUF_BYTES];
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        for &byte in &buf[..n] {
            freq[byte as usize] += 1;
            if freq[byte as usize] == 1 {
                distinct += 1;
            }
        }
    }
    for slot in freq.iter_mut() {
        if distinct >= 2 {
            break;
        }
        if *slot == 0 {
            *slot = 1;
            distinct += 1;
        }
    }
    Ok(freq)
}

/// Arena node of the transient Huffman tree. The tree lives only long
/// enough to read off leaf depths.
enum Node {
    Leaf(u8),
    Internal(usize, usize),
}

/// Build code lengths from frequencies via greedy tree construction.
///
/// Nodes are merged lowest-frequency-first out of a min-priority queue,
/// with insertion order breaking ties so the result is deterministic. Leaf
/// depth in the finished tree is the symbol's code length.
///
/// # Errors
/// [`CodebookError::EmptyFrequencyTable`] when no symbol has a nonzero
/// count.
pub fn build_code_lengths(freq: &FreqTable) -> Result<CodeLengths> {
    let mut arena: Vec<Node> = Vec::new();
    let mut heap: BinaryHeap<Reverse<(u64, usize, usize)>> = BinaryHeap::new();
    for (symbol, &count) in freq.iter().enumerate() {
        if count > 0 {
            arena.push(Node::Leaf(symbol as u8));
            heap.push(Reverse((count, arena.len() - 1, arena.len() - 1)));
        }
    }
    if heap.is_empty() {
        return Err(CodebookError::EmptyFrequencyTable.into());
    }
    let mut order = arena.len();
    while heap.len() > 1 {
        let Reverse((count_a, _, a)) = heap.pop().unwrap();
        let Reverse((count_b, _, b)) = heap.pop().unwrap();
        arena.push(Node::Internal(a, b));
        heap.push(Reverse((count_a + count_b, order, arena.len() - 1)));
        order += 1;
    }
    let Reverse((_, _, root)) = heap.pop().unwrap();

    let mut lengths = [0u8; SYMBOL_COUNT];
    let mut stack = vec![(root, 0u8)];
    while let Some((idx, depth)) = stack.pop() {
        match arena[idx] {
            Node::Leaf(symbol) => lengths[symbol as usize] = depth,
            Node::Internal(left, right) => {
                stack.push((left, depth + 1));
                stack.push((right, depth + 1));
            }
        }
    }
    Ok(lengths)
}

/// Run the canonical assignment over a length table, yielding
/// `(symbol, length, MSB-aligned code)` in canonical order.
///
/// The same routine serves both directions; the validation doubles as the
/// decoder's defense against untrusted headers. Over-subscription at any
/// length, an under-covered code space (Kraft sum below one), and lengths
/// at or above the word width are all rejected.
fn canonical_codes(lengths: &CodeLengths) -> Result<Vec<(u8, u8, u64)>> {
    for (symbol, &len) in lengths.iter().enumerate() {
        if len > MAX_CODE_BITS {
            return Err(CodebookError::CodeLengthTooLong {
                symbol: symbol as u8,
                length: len as usize,
                max: MAX_CODE_BITS,
            }
            .into());
        }
    }

    let mut assigned = Vec::new();
    let mut code = 0u64;
    for len in 1..=MAX_CODE_BITS {
        code <<= 1;
        let space = 1u64 << len;
        for (symbol, &l) in lengths.iter().enumerate() {
            if l != len {
                continue;
            }
            if code >= space {
                return Err(CodebookError::OversubscribedLength(len).into());
            }
            assigned.push((symbol as u8, len, code << (WORD_BITS - u32::from(len))));
            code += 1;
        }
    }
    // A complete prefix code doubles up to exactly 2^63 by the last level;
    // an all-zero table never gets off the ground and fails here too.
    if code != 1u64 << MAX_CODE_BITS {
        return Err(CodebookError::IncompleteCode.into());
    }
    Ok(assigned)
}

/// Encode-side code table: symbol to canonical codeword.
#[derive(Debug, Clone)]
pub struct Codebook {
    lengths: CodeLengths,
    codes: [Codeword; SYMBOL_COUNT],
}

impl Codebook {
    /// Build the codebook for a frequency table.
    pub fn from_frequencies(freq: &FreqTable) -> Result<Self> {
        Self::from_lengths(build_code_lengths(freq)?)
    }

    /// Build the codebook from a length table, validating it canonically.
    pub fn from_lengths(lengths: CodeLengths) -> Result<Self> {
        let mut codes = [Codeword::default(); SYMBOL_COUNT];
        for (symbol, len, bits) in canonical_codes(&lengths)? {
            codes[symbol as usize] = Codeword { bits, len };
        }
        Ok(Self { lengths, codes })
    }

    /// The 256-entry length table, exactly as written to the header.
    pub fn lengths(&self) -> &CodeLengths {
        &self.lengths
    }

    /// The codeword for `symbol`, or `None` when the symbol is absent.
    pub fn code(&self, symbol: u8) -> Option<Codeword> {
        let cw = self.codes[symbol as usize];
        (cw.len > 0).then_some(cw)
    }
}

/// Decode-side table: ordered map from left-justified code magnitude to
/// the originating symbol and its code length.
#[derive(Debug, Clone)]
pub struct DecodeTable {
    entries: BTreeMap<BlockKey, (u8, u8)>,
}

impl DecodeTable {
    /// Reconstruct the decode table from a (possibly untrusted) header
    /// length table.
    pub fn from_lengths(lengths: &CodeLengths) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (symbol, len, bits) in canonical_codes(lengths)? {
            let mut key = BitBlock::new();
            key.push_word(bits, u32::from(len));
            entries.insert(key.key(), (symbol, len));
        }
        Ok(Self { entries })
    }

    /// Match the longest-prefix code at the front of `window`.
    ///
    /// Returns the symbol and the number of window bits it consumed.
    /// `symbols_decoded` is only used to report where corruption was hit.
    pub fn lookup(&self, window: &BitBlock, symbols_decoded: u64) -> Result<(u8, u32)> {
        let entry = self
            .entries
            .range(..=window.key())
            .next_back()
            .map(|(_, &v)| v);
        match entry {
            Some((symbol, len)) if u32::from(len) <= window.len() => {
                Ok((symbol, u32::from(len)))
            }
            _ => Err(CodebookError::CorruptStream { symbols_decoded }.into()),
        }
    }

    /// Number of distinct codes in the table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table holds no codes. Unreachable through
    /// [`DecodeTable::from_lengths`], which rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Cursor;

    fn freq_of(data: &[u8]) -> FreqTable {
        count_frequencies(&mut Cursor::new(data)).unwrap()
    }

    #[test]
    fn test_count_frequencies_basic() {
        let freq = freq_of(b"AAB");
        assert_eq!(freq[b'A' as usize], 2);
        assert_eq!(freq[b'B' as usize], 1);
        assert_eq!(freq.iter().filter(|&&c| c > 0).count(), 2);
    }

    #[test]
    fn test_count_frequencies_pads_empty_input() {
        let freq = freq_of(b"");
        assert_eq!(freq[0], 1);
        assert_eq!(freq[1], 1);
        assert_eq!(freq.iter().filter(|&&c| c > 0).count(), 2);
    }

    #[test]
    fn test_count_frequencies_pads_single_symbol() {
        let freq = freq_of(&[b'Z'; 100]);
        assert_eq!(freq[b'Z' as usize], 100);
        assert_eq!(freq[0], 1);
        assert_eq!(freq.iter().filter(|&&c| c > 0).count(), 2);
    }

    #[test]
    fn test_count_frequencies_pad_skips_occupied_low_symbols() {
        let freq = freq_of(&[0x00; 10]);
        assert_eq!(freq[0], 10);
        assert_eq!(freq[1], 1);
    }

    #[test]
    fn test_two_symbol_lengths() {
        let lengths = build_code_lengths(&freq_of(b"AAB")).unwrap();
        assert_eq!(lengths[b'A' as usize], 1);
        assert_eq!(lengths[b'B' as usize], 1);
        assert_eq!(lengths.iter().filter(|&&l| l > 0).count(), 2);
    }

    #[test]
    fn test_empty_frequency_table_rejected() {
        let freq = [0u64; SYMBOL_COUNT];
        assert!(matches!(
            build_code_lengths(&freq),
            Err(Error::Codebook(CodebookError::EmptyFrequencyTable))
        ));
    }

    #[test]
    fn test_skewed_frequencies_give_skewed_lengths() {
        let mut freq = [0u64; SYMBOL_COUNT];
        freq[b'a' as usize] = 100;
        freq[b'b' as usize] = 1;
        freq[b'c' as usize] = 1;
        let lengths = build_code_lengths(&freq).unwrap();
        assert_eq!(lengths[b'a' as usize], 1);
        assert_eq!(lengths[b'b' as usize], 2);
        assert_eq!(lengths[b'c' as usize], 2);
    }

    #[test]
    fn test_kraft_equality_holds() {
        for data in [
            &b"AAB"[..],
            &b"the quick brown fox jumps over the lazy dog"[..],
            &[7u8; 1][..],
            &(0..=255u8).collect::<Vec<_>>()[..],
        ] {
            let lengths = build_code_lengths(&freq_of(data)).unwrap();
            let kraft: f64 = lengths
                .iter()
                .filter(|&&l| l > 0)
                .map(|&l| 0.5f64.powi(i32::from(l)))
                .sum();
            assert!((kraft - 1.0).abs() < 1e-9, "Kraft sum {kraft} for {data:?}");
        }
    }

    #[test]
    fn test_canonical_codes_concrete() {
        // Lengths {A: 1, B: 1} -> codes 0 and 1 in symbol order.
        let book = Codebook::from_frequencies(&freq_of(b"AAB")).unwrap();
        let a = book.code(b'A').unwrap();
        let b = book.code(b'B').unwrap();
        assert_eq!((a.bits, a.len), (0, 1));
        assert_eq!((b.bits, b.len), (1u64 << 63, 1));
        assert_eq!(book.code(b'C'), None);
    }

    #[test]
    fn test_canonical_assignment_orders_by_length_then_symbol() {
        let mut lengths = [0u8; SYMBOL_COUNT];
        lengths[b'd' as usize] = 1;
        lengths[b'a' as usize] = 3;
        lengths[b'b' as usize] = 3;
        lengths[b'c' as usize] = 2;
        let book = Codebook::from_lengths(lengths).unwrap();
        // d=0, c=10, a=110, b=111
        assert_eq!(book.code(b'd').unwrap().bits, 0);
        assert_eq!(book.code(b'c').unwrap().bits, 0b10u64 << 62);
        assert_eq!(book.code(b'a').unwrap().bits, 0b110u64 << 61);
        assert_eq!(book.code(b'b').unwrap().bits, 0b111u64 << 61);
    }

    #[test]
    fn test_encode_and_decode_assignment_agree() {
        let data = b"canonical determinism: both sides must derive identical codes";
        let book = Codebook::from_frequencies(&freq_of(data)).unwrap();
        let table = DecodeTable::from_lengths(book.lengths()).unwrap();
        assert_eq!(
            table.len(),
            book.lengths().iter().filter(|&&l| l > 0).count()
        );
        for symbol in 0..=255u8 {
            if let Some(cw) = book.code(symbol) {
                let mut window = BitBlock::new();
                window.push_word(cw.bits, u32::from(cw.len));
                let (decoded, len) = table.lookup(&window, 0).unwrap();
                assert_eq!(decoded, symbol);
                assert_eq!(len, u32::from(cw.len));
            }
        }
    }

    #[test]
    fn test_all_zero_lengths_rejected() {
        let lengths = [0u8; SYMBOL_COUNT];
        assert!(matches!(
            DecodeTable::from_lengths(&lengths),
            Err(Error::Codebook(CodebookError::IncompleteCode))
        ));
    }

    #[test]
    fn test_oversubscribed_lengths_rejected() {
        // 256 codes of 7 bits only fit a 128-slot space.
        let lengths = [7u8; SYMBOL_COUNT];
        assert!(matches!(
            DecodeTable::from_lengths(&lengths),
            Err(Error::Codebook(CodebookError::OversubscribedLength(7)))
        ));
    }

    #[test]
    fn test_incomplete_lengths_rejected() {
        // 256 codes of 9 bits cover half the space; decoding would be
        // ambiguous for the other half.
        let lengths = [9u8; SYMBOL_COUNT];
        assert!(matches!(
            DecodeTable::from_lengths(&lengths),
            Err(Error::Codebook(CodebookError::IncompleteCode))
        ));

        let mut single = [0u8; SYMBOL_COUNT];
        single[42] = 1;
        assert!(matches!(
            DecodeTable::from_lengths(&single),
            Err(Error::Codebook(CodebookError::IncompleteCode))
        ));
    }

    #[test]
    fn test_uniform_byte_lengths_accepted() {
        // 256 codes of 8 bits is exactly complete.
        let lengths = [8u8; SYMBOL_COUNT];
        let table = DecodeTable::from_lengths(&lengths).unwrap();
        assert_eq!(table.len(), 256);
        let book = Codebook::from_lengths(lengths).unwrap();
        // Canonical 8-bit codes over all symbols are the identity.
        assert_eq!(book.code(0x41).unwrap().bits, 0x41u64 << 56);
    }

    #[test]
    fn test_over_length_code_rejected() {
        let mut lengths = [0u8; SYMBOL_COUNT];
        lengths[0] = 64;
        lengths[1] = 1;
        assert!(matches!(
            DecodeTable::from_lengths(&lengths),
            Err(Error::Codebook(CodebookError::CodeLengthTooLong {
                symbol: 0,
                length: 64,
                ..
            }))
        ));
    }

    #[test]
    fn test_lookup_rejects_short_window() {
        let mut lengths = [0u8; SYMBOL_COUNT];
        lengths[b'd' as usize] = 1;
        lengths[b'c' as usize] = 2;
        lengths[b'a' as usize] = 3;
        lengths[b'b' as usize] = 3;
        let table = DecodeTable::from_lengths(&lengths).unwrap();

        // Window "11" matches the 3-bit code 110/111 region but holds only
        // two valid bits: that is a truncated or corrupt stream.
        let mut window = BitBlock::new();
        window.push_word(0b11u64 << 62, 2);
        assert!(matches!(
            table.lookup(&window, 7),
            Err(Error::Codebook(CodebookError::CorruptStream {
                symbols_decoded: 7
            }))
        ));
    }

    #[test]
    fn test_tree_depth_deterministic_on_ties() {
        let mut freq = [0u64; SYMBOL_COUNT];
        for s in 0..8usize {
            freq[s] = 5;
        }
        let first = build_code_lengths(&freq).unwrap();
        let second = build_code_lengths(&freq).unwrap();
        assert_eq!(first, second);
        // Eight equal weights give a balanced tree.
        assert!(first[..8].iter().all(|&l| l == 3));
    }
}
