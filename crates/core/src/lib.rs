//! huffpack-core: canonical Huffman stream compression
//!
//! This library compresses byte streams against a canonical Huffman code
//! and decompresses them bit-exactly. The entire code is carried in the
//! stream as a fixed 256-entry table of code lengths; everything else is
//! reconstructed deterministically on the decode side.
//!
//! # Architecture
//!
//! The system is built from small modules with clear boundaries:
//! - `block`: fixed-width constants and the 256-bit shiftable accumulator
//! - `bitio`: word-level writer/reader with the padding trailer convention
//! - `codebook`: frequencies, tree construction, canonical code tables
//! - `codec`: the two-pass encoder and windowed decoder
//!
//! # Design principles
//!
//! - **No panics**: every fallible path returns a structured error
//! - **Bit-exact round trips**: `decode(encode(s)) == s` for all byte
//!   sequences, including empty and single-symbol inputs
//! - **Untrusted headers**: the decoder validates the length table before
//!   touching the payload
//!
//! # Example
//! ```
//! use huffpack_core::codec::{decode_bytes, encode_bytes};
//!
//! let packed = encode_bytes(b"abracadabra").unwrap();
//! assert_eq!(decode_bytes(&packed).unwrap(), b"abracadabra");
//! ```

pub mod bitio;
pub mod block;
pub mod codebook;
pub mod codec;
pub mod error;

// Re-export commonly used types
pub use error::{Error, Result};
