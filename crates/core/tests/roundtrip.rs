//! End-to-end tests over the public codec API: encode a byte stream,
//! decode it back, and verify the result is bit-exact. Also covers the
//! wire-format guarantees a foreign decoder would rely on and the error
//! behavior for damaged streams.

use std::io::Cursor;

use huffpack_core::codec::{decode, decode_bytes, encode, encode_bytes};
use huffpack_core::codebook::{Codebook, DecodeTable};
use huffpack_core::error::{BitIoError, CodebookError, Error};

fn round_trip(data: &[u8]) -> Vec<u8> {
    let encoded = encode_bytes(data).unwrap();
    let decoded = decode_bytes(&encoded).unwrap();
    assert_eq!(decoded, data);
    encoded
}

#[test]
fn test_round_trip_text() {
    round_trip(b"The quick brown fox jumps over the lazy dog.");
    round_trip("žluťoučký kůň úpěl ďábelské ódy".as_bytes());
}

#[test]
fn test_round_trip_edge_inputs() {
    round_trip(b"");
    round_trip(b"\x00");
    round_trip(b"\xFF");
    round_trip(&[0xAB; 1_000_000]);
}

#[test]
fn test_round_trip_all_byte_values() {
    let mut data: Vec<u8> = (0..=255u8).collect();
    data.extend((0..=255u8).rev());
    round_trip(&data);
}

#[test]
fn test_round_trip_incompressible() {
    // A pseudo-random sequence with a full alphabet barely compresses but
    // must still survive the trip.
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    let data: Vec<u8> = (0..100_000)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 56) as u8
        })
        .collect();
    let encoded = round_trip(&data);
    assert!(encoded.len() > 256);
}

#[test]
fn test_round_trip_through_streams() {
    let data = b"streamed rather than sliced".repeat(1000);
    let mut packed = Vec::new();
    let stats = encode(&mut Cursor::new(&data), &mut packed).unwrap();
    assert_eq!(stats.input_bytes, data.len() as u64);
    assert_eq!(stats.output_bytes, packed.len() as u64);
    assert!(packed.len() < data.len());

    let mut restored = Vec::new();
    let dstats = decode(Cursor::new(&packed), &mut restored).unwrap();
    assert_eq!(dstats.output_bytes, data.len() as u64);
    assert_eq!(restored, data);
}

#[test]
fn test_header_is_always_256_entries() {
    for data in [&b""[..], &b"a"[..], &b"abc"[..], &(0..=255u8).collect::<Vec<_>>()[..]] {
        let encoded = encode_bytes(data).unwrap();
        assert!(encoded.len() >= 257);
        // The header alone must reconstruct the decode table.
        let lengths: [u8; 256] = encoded[..256].try_into().unwrap();
        DecodeTable::from_lengths(&lengths).unwrap();
    }
}

#[test]
fn test_header_satisfies_kraft_equality() {
    let encoded = encode_bytes(b"mississippi riverbanks").unwrap();
    let kraft: f64 = encoded[..256]
        .iter()
        .filter(|&&l| l > 0)
        .map(|&l| 0.5f64.powi(i32::from(l)))
        .sum();
    assert!((kraft - 1.0).abs() < 1e-9);
}

#[test]
fn test_header_reconstruction_matches_encoder() {
    let data = b"codes must be reconstructible from lengths alone";
    let encoded = encode_bytes(data).unwrap();
    let lengths: [u8; 256] = encoded[..256].try_into().unwrap();
    let book = Codebook::from_lengths(lengths).unwrap();
    for (symbol, &len) in lengths.iter().enumerate() {
        match book.code(symbol as u8) {
            Some(cw) => assert_eq!(cw.len, len),
            None => assert_eq!(len, 0),
        }
    }
}

#[test]
fn test_single_symbol_file_shape() {
    // One repeated byte exercises the pad-to-two-symbols rule: the header
    // carries a one-bit code for the data byte and one for the synthetic
    // symbol 0.
    let encoded = round_trip(&[b'Q'; 50_000]);
    assert_eq!(encoded[b'Q' as usize], 1);
    assert_eq!(encoded[0], 1);
    assert_eq!(encoded[..256].iter().filter(|&&l| l > 0).count(), 2);
    // 50_000 one-bit codes round up to 782 words of payload.
    assert_eq!(encoded.len(), 256 + 782 * 8 + 1);
}

#[test]
fn test_decode_all_zero_header_fails() {
    let mut stream = vec![0u8; 256];
    stream.push(64);
    assert!(matches!(
        decode_bytes(&stream),
        Err(Error::Codebook(CodebookError::IncompleteCode))
    ));
}

#[test]
fn test_decode_oversubscribed_header_fails() {
    let mut stream = vec![3u8; 256];
    stream.push(64);
    assert!(matches!(
        decode_bytes(&stream),
        Err(Error::Codebook(CodebookError::OversubscribedLength(3)))
    ));
}

#[test]
fn test_decode_over_length_header_fails() {
    let mut stream = vec![0u8; 256];
    stream[10] = 200;
    stream[11] = 1;
    stream.push(64);
    assert!(matches!(
        decode_bytes(&stream),
        Err(Error::Codebook(CodebookError::CodeLengthTooLong { .. }))
    ));
}

#[test]
fn test_decode_truncations() {
    let encoded = encode_bytes(&[b'r'; 4096]).unwrap();
    // Any cut that loses the trailer must surface as unexpected EOF.
    for keep in [0, 100, 255, 256, 260, encoded.len() - 2] {
        let err = decode_bytes(&encoded[..keep]).unwrap_err();
        assert!(
            matches!(err, Error::BitIo(BitIoError::UnexpectedEof)),
            "cut at {keep} gave {err}"
        );
    }
}

#[test]
fn test_encoded_stream_is_deterministic() {
    let data = b"same input, same stream, every time".repeat(64);
    assert_eq!(encode_bytes(&data).unwrap(), encode_bytes(&data).unwrap());
}
