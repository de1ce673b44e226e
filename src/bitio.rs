//! Bit-granular stream primitives: `BitOutput` (sink) and `BitInput` (source).
//!
//! Canonical bit order: **LSB-first within each byte**. `put_bit` fills bit 0
//! of the in-progress byte first; `put_bits` emits the least-significant bit
//! of the value first, and `BitInput` mirrors both. Every higher layer
//! (varints, type tags, LZW codes, Huffman tables) goes through these
//! primitives, so the whole wire format inherits the one ordering.

use crate::bitlist::BitList;
use crate::error::{LynonError, Result};

/// Bits needed to represent codes `0..n-1`: `ceil(log2(n))`, 0 for `n <= 1`.
#[inline]
pub fn code_bit_width(n: u64) -> u32 {
    if n <= 1 {
        0
    } else {
        64 - (n - 1).leading_zeros()
    }
}

/// Bits used for a cache back-reference into `n` entries (minimum 1).
#[inline]
pub fn ref_bit_width(n: u64) -> u32 {
    code_bit_width(n).max(1)
}

// =============================================================================
// BitOutput
// =============================================================================

/// Single-writer bit sink over a growing byte buffer.
///
/// Owns an in-progress partial byte (the accumulator) and the count of bits
/// already placed in it. `close` flushes the partial byte; the total count of
/// valid bits is tracked so the last byte's padding is never significant.
#[derive(Debug, Default)]
pub struct BitOutput {
    buf: Vec<u8>,
    acc: u8,
    acc_bits: u32,
    closed: bool,
}

impl BitOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit.
    #[inline]
    pub fn put_bit(&mut self, bit: bool) {
        debug_assert!(!self.closed, "write after close");
        if bit {
            self.acc |= 1 << self.acc_bits;
        }
        self.acc_bits += 1;
        if self.acc_bits == 8 {
            self.buf.push(self.acc);
            self.acc = 0;
            self.acc_bits = 0;
        }
    }

    /// Append the low `count` bits of `value`, least-significant bit first.
    pub fn put_bits(&mut self, value: u64, count: u32) {
        debug_assert!(count <= 64);
        for i in 0..count {
            self.put_bit((value >> i) & 1 == 1);
        }
    }

    /// Total bits written so far.
    #[inline]
    pub fn bit_len(&self) -> u64 {
        self.buf.len() as u64 * 8 + self.acc_bits as u64
    }

    /// Append every bit of another (unclosed) writer.
    pub fn append(&mut self, other: &BitOutput) {
        for &byte in &other.buf {
            self.put_bits(byte as u64, 8);
        }
        if other.acc_bits > 0 {
            self.put_bits(other.acc as u64, other.acc_bits);
        }
    }

    /// Flush the partial final byte, if any. Calling twice is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        if self.acc_bits > 0 {
            self.buf.push(self.acc);
            self.acc = 0;
            self.acc_bits = 0;
        }
        self.closed = true;
    }

    /// Close and return the written bits as a byte-backed `BitList`.
    pub fn into_bit_list(mut self) -> BitList {
        let len = self.bit_len();
        self.close();
        BitList::from_bytes(self.buf, len)
    }

    /// Close and return the raw bytes plus the count of valid bits.
    pub fn into_bytes(mut self) -> (Vec<u8>, u64) {
        let len = self.bit_len();
        self.close();
        (self.buf, len)
    }
}

// =============================================================================
// BitInput
// =============================================================================

/// Single-reader bit cursor over a fixed byte buffer.
///
/// `len` bounds the valid bits so padding in a final partial byte is never
/// served; reads past it report end of stream.
#[derive(Debug)]
pub struct BitInput<'a> {
    data: &'a [u8],
    pos: u64,
    len: u64,
}

impl<'a> BitInput<'a> {
    /// Read all bits of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            pos: 0,
            len: data.len() as u64 * 8,
        }
    }

    /// Read only the first `bit_len` bits of `data`.
    pub fn with_bit_len(data: &'a [u8], bit_len: u64) -> Self {
        debug_assert!(bit_len <= data.len() as u64 * 8);
        Self {
            data,
            pos: 0,
            len: bit_len,
        }
    }

    /// Bits left before end of stream.
    #[inline]
    pub fn remaining_bits(&self) -> u64 {
        self.len - self.pos
    }

    /// Read one bit, or `None` at end of stream.
    #[inline]
    pub fn get_bit_or_null(&mut self) -> Option<u8> {
        if self.pos >= self.len {
            return None;
        }
        let byte = self.data[(self.pos / 8) as usize];
        let bit = (byte >> (self.pos % 8)) & 1;
        self.pos += 1;
        Some(bit)
    }

    /// Read one bit, failing with stream exhaustion at end of stream.
    #[inline]
    pub fn get_bit(&mut self) -> Result<u8> {
        self.get_bit_or_null().ok_or(LynonError::UnexpectedEof)
    }

    /// Read `count` bits assembled least-significant-bit first.
    pub fn get_bits(&mut self, count: u32) -> Result<u64> {
        debug_assert!(count <= 64);
        let mut value = 0u64;
        for i in 0..count {
            value |= (self.get_bit()? as u64) << i;
        }
        Ok(value)
    }

    /// Like `get_bits`, but `None` (consuming nothing) if fewer than `count`
    /// bits remain.
    pub fn get_bits_or_null(&mut self, count: u32) -> Option<u64> {
        if self.remaining_bits() < count as u64 {
            return None;
        }
        let mut value = 0u64;
        for i in 0..count {
            value |= (self.get_bit_or_null()? as u64) << i;
        }
        Some(value)
    }
}

// =============================================================================
// Tests
// =============================================================================
