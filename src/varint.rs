//! Nibble-packed variable-length integers over the bit stream.
//!
//! Wire format: `[nibble_count - 1: 4 bits][nibble_count x 4-bit nibbles,
//! least-significant nibble first]`. The count is the minimal `n in 1..=16`
//! such that `n * 4` bits hold the value; zero always packs as count field
//! `0` (one nibble) with nibble value `0`. The signed variant prefixes one
//! sign bit (`1` = negative) around the magnitude's unsigned packing.

use crate::bitio::{BitInput, BitOutput};
use crate::error::{LynonError, Result};

/// Minimal number of 4-bit nibbles holding `value` (1..=16).
#[inline]
fn nibble_count(value: u64) -> u32 {
    if value == 0 {
        1
    } else {
        (64 - value.leading_zeros() + 3) / 4
    }
}

/// Pack an unsigned 64-bit integer into `out`.
pub fn pack_unsigned(out: &mut BitOutput, value: u64) {
    let n = nibble_count(value);
    out.put_bits((n - 1) as u64, 4);
    for i in 0..n {
        out.put_bits((value >> (4 * i)) & 0xF, 4);
    }
}

/// Unpack an unsigned 64-bit integer from `input`.
pub fn unpack_unsigned(input: &mut BitInput) -> Result<u64> {
    let n = input.get_bits(4)? as u32 + 1;
    let mut value = 0u64;
    for i in 0..n {
        value |= input.get_bits(4)? << (4 * i);
    }
    Ok(value)
}

/// Pack a signed 64-bit integer: sign bit, then the magnitude unsigned.
/// `-0` cannot occur: the sign bit is written from `value < 0`.
pub fn pack_signed(out: &mut BitOutput, value: i64) {
    out.put_bit(value < 0);
    pack_unsigned(out, value.unsigned_abs());
}

/// Unpack a signed 64-bit integer.
pub fn unpack_signed(input: &mut BitInput) -> Result<i64> {
    let negative = input.get_bit()? == 1;
    let magnitude = unpack_unsigned(input)?;
    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            return Err(LynonError::IntegerOverflow(magnitude));
        }
        Ok((magnitude as i64).wrapping_neg())
    } else {
        if magnitude > i64::MAX as u64 {
            return Err(LynonError::IntegerOverflow(magnitude));
        }
        Ok(magnitude as i64)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn round_trip_unsigned(value: u64) {
        let mut out = BitOutput::new();
        pack_unsigned(&mut out, value);
        let (bytes, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&bytes, len);
        assert_eq!(unpack_unsigned(&mut input).unwrap(), value);
        assert_eq!(input.remaining_bits(), 0);
    }

    fn round_trip_signed(value: i64) {
        let mut out = BitOutput::new();
        pack_signed(&mut out, value);
        let (bytes, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&bytes, len);
        assert_eq!(unpack_signed(&mut input).unwrap(), value);
        assert_eq!(input.remaining_bits(), 0);
    }

    #[test]
    fn test_unsigned_corpus() {
        for value in [0, 1, 15, 16, 255, 256, u32::MAX as u64, (1u64 << 63) - 1, u64::MAX] {
            round_trip_unsigned(value);
        }
    }

    #[test]
    fn test_zero_packs_as_one_nibble() {
        let mut out = BitOutput::new();
        pack_unsigned(&mut out, 0);
        // 4-bit count field (0) + one zero nibble
        assert_eq!(out.bit_len(), 8);
        let (bytes, _) = out.into_bytes();
        assert_eq!(bytes, vec![0]);
    }

    #[test]
    fn test_nibble_boundaries() {
        // 15 fits one nibble, 16 needs two
        let mut out = BitOutput::new();
        pack_unsigned(&mut out, 15);
        assert_eq!(out.bit_len(), 8);

        let mut out = BitOutput::new();
        pack_unsigned(&mut out, 16);
        assert_eq!(out.bit_len(), 12);

        // u64::MAX needs all 16 nibbles
        let mut out = BitOutput::new();
        pack_unsigned(&mut out, u64::MAX);
        assert_eq!(out.bit_len(), 4 + 16 * 4);
    }

    #[test]
    fn test_signed_corpus() {
        for value in [0, 1, -1, 15, -15, 16, -16, 255, -256, i64::MAX, i64::MIN] {
            round_trip_signed(value);
        }
    }

    #[test]
    fn test_negative_zero_normalizes() {
        // -0 is 0 in two's complement; the sign bit must come out 0
        let mut out = BitOutput::new();
        pack_signed(&mut out, -0);
        let (bytes, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&bytes, len);
        assert_eq!(input.get_bit().unwrap(), 0);
        assert_eq!(unpack_unsigned(&mut input).unwrap(), 0);
    }

    #[test]
    fn test_multiple_in_stream() {
        let mut out = BitOutput::new();
        pack_unsigned(&mut out, 100);
        pack_signed(&mut out, -200);
        pack_unsigned(&mut out, 300);
        let (bytes, len) = out.into_bytes();

        let mut input = BitInput::with_bit_len(&bytes, len);
        assert_eq!(unpack_unsigned(&mut input).unwrap(), 100);
        assert_eq!(unpack_signed(&mut input).unwrap(), -200);
        assert_eq!(unpack_unsigned(&mut input).unwrap(), 300);
    }

    #[test]
    fn test_truncated_stream_is_eof() {
        let mut out = BitOutput::new();
        pack_unsigned(&mut out, u32::MAX as u64);
        let (bytes, len) = out.into_bytes();
        let mut input = BitInput::with_bit_len(&bytes, len - 4);
        assert!(matches!(
            unpack_unsigned(&mut input),
            Err(LynonError::UnexpectedEof)
        ));
    }
}
