//! Error types for the compression core.
//!
//! Every failure is fatal for the encode or decode call that hit it; the
//! core never retries internally. Callers (the CLI) decide how to report
//! and whether to clean up partial output.

use thiserror::Error;

/// Top-level error type for all core operations.
///
/// Each variant corresponds to a failure domain:
/// - Bit I/O: word-level reading/writing of the packed stream
/// - Codebook: code construction or prefix matching
/// - I/O: the underlying byte streams
#[derive(Debug, Error)]
pub enum Error {
    /// Bit-level stream operation failed
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Code table construction or decode lookup failed
    #[error("codebook error: {0}")]
    Codebook(#[from] CodebookError),

    /// Underlying stream was unreadable or unwritable
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Word-level I/O errors on the packed stream.
#[derive(Debug, Error)]
pub enum BitIoError {
    /// Asked to read beyond the available encoded data
    #[error("unexpected end of encoded data")]
    UnexpectedEof,

    /// A single push may carry at most one word of bits
    #[error("invalid bit count: {0} exceeds word width")]
    InvalidBitCount(u32),

    /// The padding trailer must name 1..=64 valid bits
    #[error("invalid padding trailer: {0} valid bits claimed for final word")]
    InvalidTrailer(u8),
}

/// Code table construction and decoding errors.
#[derive(Debug, Error)]
pub enum CodebookError {
    /// No symbol has a nonzero frequency, so no code can be built
    #[error("empty frequency table: cannot build a code")]
    EmptyFrequencyTable,

    /// A code length reached the word width; the stream format cannot
    /// carry it
    #[error("code length {length} for symbol {symbol:#04x} exceeds maximum {max}")]
    CodeLengthTooLong { symbol: u8, length: usize, max: u8 },

    /// The length table demands more codes at some length than the code
    /// space holds
    #[error("invalid code length table: over-subscribed at length {0}")]
    OversubscribedLength(u8),

    /// The length table does not cover the code space (Kraft sum < 1), so
    /// some bit patterns would be undecodable
    #[error("invalid code length table: code space not fully covered")]
    IncompleteCode,

    /// No canonical code matches the bits at the front of the decode window
    #[error("corrupt encoded stream: no matching code after {symbols_decoded} symbols")]
    CorruptStream { symbols_decoded: u64 },
}

/// Type alias for Result with the core Error type
pub type Result<T> = std::result::Result<T, Error>;
