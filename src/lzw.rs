//! LZW dictionary compression over the bit stream, plus the blob framing
//! used for strings and opaque byte buffers.
//!
//! Codes are at most [`MAX_CODE_BITS`] wide. The dictionary seeds with the
//! 256 single-byte chunks; new multi-byte chunks are assigned codes from 256
//! up. Each code is written with exactly `ceil(log2(assigned_codes))` bits,
//! measured just before emission. The reserved [`STOP_CODE`] at the top of
//! the code space resets the dictionary to its seeded state; the encoder
//! emits it when an insertion reaches [`DICT_CAPACITY`] (~92% of the code
//! space), at which point the code width is already maximal.
//!
//! Blob framing: `[packed original byte length][1 bit: 0 = raw / 1 =
//! compressed][if compressed: 2-bit method id, only 0 = LZW][payload]`.
//! Decompression requires the declared length up front and stops at exactly
//! that many bytes, which bounds work against truncated or adversarial
//! streams.

use crate::bitio::{code_bit_width, BitInput, BitOutput};
use crate::error::{LynonError, Result};
use crate::varint::{pack_unsigned, unpack_unsigned};
use rustc_hash::FxHashMap;

/// Maximum LZW code width in bits.
pub const MAX_CODE_BITS: u32 = 12;

/// Reserved dictionary-reset sentinel at the top of the code space.
pub const STOP_CODE: u32 = (1 << MAX_CODE_BITS) - 1;

/// Assigned-code count that triggers a dictionary reset (~92% of the code
/// space, keeping the stop code unassignable).
pub const DICT_CAPACITY: u32 = ((1u32 << MAX_CODE_BITS) * 92) / 100;

/// Single-byte seed entries.
const SEED_CODES: u32 = 256;

/// Method id for LZW in the compressed-blob framing.
pub const METHOD_LZW: u8 = 0;

fn seed_dict() -> FxHashMap<Vec<u8>, u32> {
    let mut dict = FxHashMap::default();
    for b in 0..SEED_CODES {
        dict.insert(vec![b as u8], b);
    }
    dict
}

// =============================================================================
// Compress
// =============================================================================

/// Compress `bytes` into `out` as a bare LZW code stream (no framing).
pub fn compress(bytes: &[u8], out: &mut BitOutput) {
    if bytes.is_empty() {
        return;
    }
    let mut dict = seed_dict();
    let mut next_code = SEED_CODES;
    let mut current: Vec<u8> = Vec::new();

    for &b in bytes {
        current.push(b);
        if dict.contains_key(&current) {
            continue;
        }
        // miss: emit the match so far, record the new chunk, restart at `b`
        let prefix_code = dict[&current[..current.len() - 1]];
        out.put_bits(prefix_code as u64, code_bit_width(next_code as u64));
        dict.insert(std::mem::take(&mut current), next_code);
        next_code += 1;
        current.push(b);

        if next_code >= DICT_CAPACITY {
            tracing::debug!(next_code, "lzw dictionary full; emitting stop code");
            out.put_bits(STOP_CODE as u64, code_bit_width(next_code as u64));
            dict = seed_dict();
            next_code = SEED_CODES;
        }
    }

    let final_code = dict[&current[..]];
    out.put_bits(final_code as u64, code_bit_width(next_code as u64));
}

// =============================================================================
// Decompress
// =============================================================================

/// Decompress exactly `expected_len` bytes of a bare LZW code stream.
///
/// The dictionary growth mirrors the compressor, with the decoder counting
/// its one yet-unresolved pending entry so code widths stay in lock-step.
/// A shortfall or overrun against `expected_len` is a hard error, as is any
/// code that is neither seeded, assigned, pending (the classic `cScSc`
/// case), nor the stop code.
pub fn decompress(input: &mut BitInput, expected_len: usize) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(expected_len.min(1 << 20));
    // entries[i] is the chunk for code SEED_CODES + i
    let mut entries: Vec<Vec<u8>> = Vec::new();
    let mut prev: Option<Vec<u8>> = None;

    while out.len() < expected_len {
        let assigned = SEED_CODES + entries.len() as u32 + u32::from(prev.is_some());
        let code = input.get_bits(code_bit_width(assigned as u64))? as u32;

        if code == STOP_CODE {
            entries.clear();
            prev = None;
            continue;
        }
        if assigned >= DICT_CAPACITY {
            // the compressor always resets here, so anything else is corrupt
            return Err(LynonError::InvalidLzwCode { code });
        }

        let chunk: Vec<u8> = if code < SEED_CODES {
            vec![code as u8]
        } else {
            let idx = (code - SEED_CODES) as usize;
            if let Some(entry) = entries.get(idx) {
                entry.clone()
            } else if idx == entries.len() {
                // cScSc: the pending entry is the previous chunk plus its
                // own first byte
                match &prev {
                    Some(p) => {
                        let mut chunk = p.clone();
                        chunk.push(p[0]);
                        chunk
                    }
                    None => return Err(LynonError::InvalidLzwCode { code }),
                }
            } else {
                return Err(LynonError::InvalidLzwCode { code });
            }
        };

        if let Some(mut p) = prev.take() {
            p.push(chunk[0]);
            entries.push(p);
        }
        if out.len() + chunk.len() > expected_len {
            return Err(LynonError::LengthMismatch {
                expected: expected_len,
                actual: out.len() + chunk.len(),
            });
        }
        out.extend_from_slice(&chunk);
        prev = Some(chunk);
    }

    Ok(out)
}

// =============================================================================
// Blob framing
// =============================================================================

/// Write `bytes` into `out` with the compressed-blob framing, compressing
/// only when the LZW stream is actually smaller than the raw bytes.
pub fn compress_blob(out: &mut BitOutput, bytes: &[u8], min_len: usize) {
    pack_unsigned(out, bytes.len() as u64);
    if bytes.len() >= min_len {
        let mut scratch = BitOutput::new();
        compress(bytes, &mut scratch);
        // +2 for the method id; raw wins ties
        if scratch.bit_len() + 2 < bytes.len() as u64 * 8 {
            out.put_bit(true);
            out.put_bits(METHOD_LZW as u64, 2);
            out.append(&scratch);
            return;
        }
        tracing::trace!(len = bytes.len(), "blob incompressible; framing raw");
    }
    out.put_bit(false);
    for &b in bytes {
        out.put_bits(b as u64, 8);
    }
}

/// Read a compressed-blob record from `input`.
pub fn decompress_blob(input: &mut BitInput) -> Result<Vec<u8>> {
    let len = unpack_unsigned(input)? as usize;
    if input.get_bit()? == 0 {
        // raw payload: reject a declared length the stream cannot hold
        let needed = (len as u64)
            .checked_mul(8)
            .ok_or(LynonError::UnexpectedEof)?;
        if input.remaining_bits() < needed {
            return Err(LynonError::UnexpectedEof);
        }
        let mut bytes = Vec::with_capacity(len);
        for _ in 0..len {
            bytes.push(input.get_bits(8)? as u8);
        }
        Ok(bytes)
    } else {
        let method = input.get_bits(2)? as u8;
        if method != METHOD_LZW {
            return Err(LynonError::UnknownCompressionMethod(method));
        }
        decompress(input, len)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn round_trip(bytes: &[u8]) {
        let mut out = BitOutput::new();
        compress(bytes, &mut out);
        let (data, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&data, len);
        let decoded = decompress(&mut input, bytes.len()).unwrap();
        assert_eq!(decoded, bytes);
    }

    fn blob_round_trip(bytes: &[u8]) {
        let mut out = BitOutput::new();
        compress_blob(&mut out, bytes, 16);
        let (data, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&data, len);
        assert_eq!(decompress_blob(&mut input).unwrap(), bytes);
    }

    #[test]
    fn test_round_trip_tiny() {
        round_trip(b"");
        round_trip(b"a");
        round_trip(b"ab");
        round_trip(b"aa");
    }

    #[test]
    fn test_round_trip_repetitive() {
        let bytes: Vec<u8> = b"abcabcabcabc".iter().cycle().take(100).copied().collect();
        round_trip(&bytes);

        let bytes = vec![0u8; 100];
        round_trip(&bytes);
    }

    #[test]
    fn test_round_trip_cscsc_pattern() {
        // classic self-referential pending-code shape
        round_trip(b"abababababab");
        round_trip(b"aaaaaaaaaaaaaaaa");
    }

    #[test]
    fn test_round_trip_random_large_forces_reset() {
        // 100k random bytes grow the dictionary far past capacity, so at
        // least one stop-code reset must round-trip correctly
        let mut rng = StdRng::seed_from_u64(7);
        let bytes: Vec<u8> = (0..100_000).map(|_| rng.gen()).collect();
        round_trip(&bytes);
    }

    #[test]
    fn test_round_trip_repetitive_large() {
        let bytes: Vec<u8> = (0..100_000u32).map(|i| (i % 7) as u8).collect();
        round_trip(&bytes);
    }

    #[test]
    fn test_declared_length_mismatch_is_error() {
        // a run of one byte decodes as chunks of length 1,2,3,...: declaring
        // 30 bytes lands mid-chunk (28 + 4 > 30) and must error, not truncate
        let bytes = vec![b'a'; 32];
        let mut out = BitOutput::new();
        compress(&bytes, &mut out);
        let (data, len) = out.into_bytes();

        let mut input = BitInput::with_bit_len(&data, len);
        let shorter = decompress(&mut input, 30);
        assert!(matches!(shorter, Err(LynonError::LengthMismatch { .. })));

        // too long: the stream exhausts before enough bytes are produced
        let mut input = BitInput::with_bit_len(&data, len);
        let longer = decompress(&mut input, bytes.len() + 10);
        assert!(longer.is_err());
    }

    #[test]
    fn test_invalid_code_rejected() {
        // after one seed code only 256 (the pending entry) is a legal
        // non-seed; 257 points past everything the decoder can know
        let mut out = BitOutput::new();
        out.put_bits(b'a' as u64, 8);
        out.put_bits(257, 9);
        let (data, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&data, len);
        assert!(matches!(
            decompress(&mut input, 4),
            Err(LynonError::InvalidLzwCode { code: 257 })
        ));
    }

    #[test]
    fn test_blob_framing_raw_and_compressed() {
        blob_round_trip(b"");
        blob_round_trip(b"x");
        blob_round_trip(b"short");
        // compressible
        let bytes: Vec<u8> = b"lynonlynon".iter().cycle().take(400).copied().collect();
        blob_round_trip(&bytes);
        // incompressible stays raw and still round-trips
        let mut rng = StdRng::seed_from_u64(11);
        let bytes: Vec<u8> = (0..64).map(|_| rng.gen()).collect();
        blob_round_trip(&bytes);
    }

    #[test]
    fn test_blob_compression_shrinks_repetitive_input() {
        let bytes: Vec<u8> = b"abcd".iter().cycle().take(4096).copied().collect();
        let mut out = BitOutput::new();
        compress_blob(&mut out, &bytes, 16);
        assert!(out.bit_len() < bytes.len() as u64 * 8);
    }

    #[test]
    fn test_unknown_method_rejected() {
        let mut out = BitOutput::new();
        pack_unsigned(&mut out, 10);
        out.put_bit(true);
        out.put_bits(2, 2); // method 2 is undefined
        let (data, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&data, len);
        assert!(matches!(
            decompress_blob(&mut input),
            Err(LynonError::UnknownCompressionMethod(2))
        ));
    }

    #[test]
    fn test_raw_blob_truncated_is_eof() {
        let mut out = BitOutput::new();
        pack_unsigned(&mut out, 1000); // declares far more than follows
        out.put_bit(false);
        out.put_bits(0xAB, 8);
        let (data, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&data, len);
        assert!(matches!(
            decompress_blob(&mut input),
            Err(LynonError::UnexpectedEof)
        ));
    }
}
