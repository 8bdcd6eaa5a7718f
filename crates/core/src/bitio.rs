//! Word-oriented bit I/O over byte streams.
//!
//! The packed stream is a sequence of 64-bit big-endian words, MSB-first
//! within and across words, followed by a one-byte padding trailer naming
//! how many bits of the final word are valid (64 when none were padded).
//! The trailer is always present, even when the payload is empty.
//!
//! [`WordWriter`] accumulates pushed bit runs in a 64-bit tail and flushes
//! whole words through a 32 KiB buffer. [`WordReader`] hands words back
//! together with their valid-bit count, taking the count for the final
//! word from the trailer byte.
//!
//! # Stream layout
//!
//! ```text
//! +--------------------+--------------------+-----+---------+
//! | word 0 (8 bytes BE)| word 1 (8 bytes BE)| ... | trailer |
//! +--------------------+--------------------+-----+---------+
//!                                                  1 byte: valid
//!                                                  bits of last word
//! ```

use std::io::{ErrorKind, Read, Write};

use crate::block::{mask_high, BitBlock, BLOCK_WORDS, IO_BUF_BYTES, WORD_BITS, WORD_BYTES};
use crate::error::{BitIoError, Result};

/// Writes MSB-first bit runs as big-endian words to an underlying stream.
///
/// # Invariants
/// - `tail_bits < 64`; a full tail is flushed immediately
/// - bits of `tail` at positions >= `tail_bits` are zero
/// - `buf.len()` is a multiple of 8 and at most [`IO_BUF_BYTES`]
pub struct WordWriter<W: Write> {
    out: W,
    buf: Vec<u8>,
    tail: u64,
    tail_bits: u32,
    bytes_written: u64,
}

impl<W: Write> WordWriter<W> {
    /// Create a writer over `out`.
    ///
    /// Probes the stream with a flush so a stream that is already broken
    /// is reported here rather than at the first push.
    pub fn new(mut out: W) -> Result<Self> {
        out.flush()?;
        Ok(Self {
            out,
            buf: Vec::with_capacity(IO_BUF_BYTES),
            tail: 0,
            tail_bits: 0,
            bytes_written: 0,
        })
    }

    /// Append the `count` most significant bits of `bits` to the stream.
    ///
    /// `count` of 0 is a no-op; `count` above 64 is rejected with
    /// [`BitIoError::InvalidBitCount`].
    pub fn push(&mut self, bits: u64, count: u32) -> Result<()> {
        if count > WORD_BITS {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count == 0 {
            return Ok(());
        }
        let bits = mask_high(bits, count);
        if self.tail_bits + count > WORD_BITS {
            // The run straddles a word boundary: complete the current tail
            // and start a new one with the overflow.
            let word = self.tail | (bits >> self.tail_bits);
            self.push_word(word)?;
            self.tail = bits << (WORD_BITS - self.tail_bits);
            self.tail_bits = self.tail_bits + count - WORD_BITS;
        } else {
            self.tail |= bits >> self.tail_bits;
            self.tail_bits += count;
            if self.tail_bits == WORD_BITS {
                let word = self.tail;
                self.push_word(word)?;
                self.tail = 0;
                self.tail_bits = 0;
            }
        }
        Ok(())
    }

    /// Append one whole byte, MSB-first.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.push(u64::from(byte) << (WORD_BITS - 8), 8)
    }

    /// Flush the remaining tail and append the padding trailer.
    ///
    /// The trailer byte records how many bits of the last data word are
    /// valid; an empty tail records 64 (no padding). Consumes the writer
    /// and returns the total number of bytes written to the stream.
    pub fn finish(mut self) -> Result<u64> {
        let valid = if self.tail_bits == 0 {
            WORD_BITS as u8
        } else {
            let word = self.tail;
            self.push_word(word)?;
            self.tail_bits as u8
        };
        self.buf.push(valid);
        self.flush_buf()?;
        self.out.flush()?;
        Ok(self.bytes_written)
    }

    fn push_word(&mut self, word: u64) -> Result<()> {
        self.buf.extend_from_slice(&word.to_be_bytes());
        if self.buf.len() == IO_BUF_BYTES {
            self.flush_buf()?;
        }
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            self.out.write_all(&self.buf)?;
            self.bytes_written += self.buf.len() as u64;
            self.buf.clear();
        }
        Ok(())
    }
}

/// Reads big-endian words and their valid-bit counts from a stream.
///
/// The buffer is refilled only once fully consumed, which keeps word
/// boundaries aligned to refills; since refill chunks are a multiple of
/// the word size, the trailer byte always lands in the final short fill
/// and is recognized as the single byte following the last word.
pub struct WordReader<R: Read> {
    src: R,
    buf: Vec<u8>,
    pos: usize,
}

impl<R: Read> WordReader<R> {
    /// Create a reader over `src` and prime its buffer.
    ///
    /// A stream that fails immediately is reported here.
    pub fn new(src: R) -> Result<Self> {
        let mut reader = Self {
            src,
            buf: Vec::new(),
            pos: 0,
        };
        reader.refill()?;
        Ok(reader)
    }

    /// True when the stream consisted of the padding trailer alone, i.e.
    /// the encoded payload carried zero data bits. Meaningful before any
    /// word has been read.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == 1
    }

    /// True when every word (and the trailer) has been consumed.
    pub fn at_end(&self) -> bool {
        self.pos >= self.buf.len()
    }

    /// Read the next word and the number of its bits that are valid.
    ///
    /// Every word reports 64 valid bits except the last one before end of
    /// stream, whose count comes from the trailer byte.
    ///
    /// # Errors
    /// - [`BitIoError::UnexpectedEof`] when no whole word remains
    /// - [`BitIoError::InvalidTrailer`] when the trailer claims more than
    ///   64 valid bits
    pub fn read_word(&mut self) -> Result<(u64, u32)> {
        if self.pos + WORD_BYTES > self.buf.len() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let word = u64::from_be_bytes(
            self.buf[self.pos..self.pos + WORD_BYTES].try_into().unwrap(),
        );
        self.pos += WORD_BYTES;

        if self.pos == self.buf.len() && self.buf.len() == IO_BUF_BYTES {
            self.refill()?;
            if self.buf.is_empty() {
                // The stream ended flush with the buffer but without a
                // trailer byte: truncated.
                return Err(BitIoError::UnexpectedEof.into());
            }
        }

        let valid = if self.pos + 1 == self.buf.len() {
            let raw = self.buf[self.pos];
            self.pos += 1;
            match u32::from(raw) {
                0 => WORD_BITS,
                v if v <= WORD_BITS => v,
                _ => return Err(BitIoError::InvalidTrailer(raw).into()),
            }
        } else {
            WORD_BITS
        };
        Ok((word, valid))
    }

    /// Read up to one block (4 words, 256 bits) into an accumulator,
    /// stopping early at a trailer-shortened word or end of stream.
    pub fn read_block(&mut self) -> Result<BitBlock> {
        if self.at_end() {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let mut block = BitBlock::new();
        for _ in 0..BLOCK_WORDS {
            let (bits, valid) = self.read_word()?;
            block.push_word(bits, valid);
            if valid < WORD_BITS || self.at_end() {
                break;
            }
        }
        Ok(block)
    }

    fn refill(&mut self) -> Result<()> {
        self.buf.resize(IO_BUF_BYTES, 0);
        let mut filled = 0;
        while filled < IO_BUF_BYTES {
            match self.src.read(&mut self.buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        self.buf.truncate(filled);
        self.pos = 0;
        Ok(())
    }
}
