//! Stream encode and decode orchestration.
//!
//! Encoding is two passes over a seekable input: one scan to count
//! frequencies, a rewind, then a second scan emitting codewords behind the
//! 256-byte length header. Decoding reads the header, rebuilds the decode
//! table from it alone, and consumes the packed words through a 256-bit
//! window matched against the table.
//!
//! Callers with non-seekable input buffer it in memory and use
//! [`encode_bytes`] / [`decode_bytes`].

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};

use crate::bitio::{WordReader, WordWriter};
use crate::block::{IO_BUF_BYTES, SYMBOL_COUNT, WORD_BITS};
use crate::codebook::{count_frequencies, Codebook, CodeLengths, DecodeTable};
use crate::error::{BitIoError, Result};

/// Byte counts observed by one encode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeStats {
    /// Original input size
    pub input_bytes: u64,
    /// Size of the produced stream, header and trailer included
    pub output_bytes: u64,
}

/// Byte counts observed by one decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeStats {
    /// Size of the reconstructed output
    pub output_bytes: u64,
}

/// Compress `input` into `output`.
///
/// The input must be seekable: after the frequency-counting pass the
/// stream is rewound to the start for the emission pass.
pub fn encode<R, W>(input: &mut R, output: W) -> Result<EncodeStats>
where
    R: Read + Seek,
    W: Write,
{
    let freq = count_frequencies(input)?;
    let book = Codebook::from_frequencies(&freq)?;

    input.seek(SeekFrom::Start(0))?;
    let mut writer = WordWriter::new(output)?;
    for &len in book.lengths().iter() {
        writer.write_byte(len)?;
    }

    let mut buf = [0u8; IO_BUF_BYTES];
    let mut input_bytes: u64 = 0;
    loop {
        let n = match input.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        input_bytes += n as u64;
        for &byte in &buf[..n] {
            // Every input byte was counted, so it always has a code.
            let cw = book.code(byte).unwrap_or_default();
            writer.push(cw.bits, u32::from(cw.len))?;
        }
    }

    let output_bytes = writer.finish()?;
    Ok(EncodeStats {
        input_bytes,
        output_bytes,
    })
}

/// Decompress `input` into `output`.
pub fn decode<R, W>(mut input: R, output: &mut W) -> Result<DecodeStats>
where
    R: Read,
    W: Write,
{
    let mut lengths: CodeLengths = [0u8; SYMBOL_COUNT];
    input.read_exact(&mut lengths).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            BitIoError::UnexpectedEof.into()
        } else {
            crate::error::Error::Io(e)
        }
    })?;
    let table = DecodeTable::from_lengths(&lengths)?;

    let mut reader = WordReader::new(input)?;
    if reader.is_empty() {
        // Header plus trailer with no payload words: an empty original.
        return Ok(DecodeStats { output_bytes: 0 });
    }

    let mut window = reader.read_block()?;
    let mut buf = Vec::with_capacity(IO_BUF_BYTES);
    let mut decoded: u64 = 0;
    loop {
        while !reader.at_end() && window.capacity_left() >= WORD_BITS {
            let (bits, valid) = reader.read_word()?;
            window.push_word(bits, valid);
        }
        if window.is_empty() {
            break;
        }
        let (symbol, len) = table.lookup(&window, decoded)?;
        window.take(len);
        buf.push(symbol);
        decoded += 1;
        if buf.len() == IO_BUF_BYTES {
            output.write_all(&buf)?;
            buf.clear();
        }
    }
    output.write_all(&buf)?;
    output.flush()?;
    Ok(DecodeStats {
        output_bytes: decoded,
    })
}

/// Compress an in-memory buffer.
pub fn encode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode(&mut std::io::Cursor::new(data), &mut out)?;
    Ok(out)
}

/// Decompress an in-memory buffer.
pub fn decode_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decode(std::io::Cursor::new(data), &mut out)?;
    Ok(out)
}
