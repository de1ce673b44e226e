//! `BitList`: an ordered, fixed-length sequence of bits.
//!
//! Two representations share one contract: an inline form holding at most 64
//! bits in a machine word, and a byte-backed form of arbitrary size. Both are
//! indexable bit-by-bit, and equality/hashing consider only the valid bits —
//! trailing padding in the final byte is never significant.

use crate::error::{LynonError, Result};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub enum BitList {
    /// Up to 64 bits packed LSB-first into a machine word.
    Inline { bits: u64, len: u32 },
    /// Arbitrary size; `len` counts the valid bits, so padding in the last
    /// byte is derivable and excluded from comparisons.
    Bytes { data: Vec<u8>, len: u64 },
}

impl BitList {
    /// Empty inline list.
    pub fn empty() -> Self {
        BitList::Inline { bits: 0, len: 0 }
    }

    /// Inline list from the low `len` bits of `bits` (`len <= 64`).
    pub fn inline(bits: u64, len: u32) -> Self {
        debug_assert!(len <= 64);
        let masked = if len == 64 {
            bits
        } else {
            bits & ((1u64 << len) - 1)
        };
        BitList::Inline { bits: masked, len }
    }

    /// Byte-backed list over the first `len` bits of `data`.
    pub fn from_bytes(data: Vec<u8>, len: u64) -> Self {
        debug_assert!(len <= data.len() as u64 * 8);
        BitList::Bytes { data, len }
    }

    /// Number of valid bits.
    pub fn len(&self) -> u64 {
        match self {
            BitList::Inline { len, .. } => *len as u64,
            BitList::Bytes { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read the bit at `index`.
    pub fn get(&self, index: u64) -> Result<bool> {
        if index >= self.len() {
            return Err(LynonError::BitIndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        Ok(match self {
            BitList::Inline { bits, .. } => (bits >> index) & 1 == 1,
            BitList::Bytes { data, .. } => {
                (data[(index / 8) as usize] >> (index % 8)) & 1 == 1
            }
        })
    }

    /// Set the bit at `index`.
    pub fn set(&mut self, index: u64, value: bool) -> Result<()> {
        if index >= self.len() {
            return Err(LynonError::BitIndexOutOfRange {
                index,
                len: self.len(),
            });
        }
        match self {
            BitList::Inline { bits, .. } => {
                if value {
                    *bits |= 1 << index;
                } else {
                    *bits &= !(1 << index);
                }
            }
            BitList::Bytes { data, .. } => {
                let byte = &mut data[(index / 8) as usize];
                if value {
                    *byte |= 1 << (index % 8);
                } else {
                    *byte &= !(1 << (index % 8));
                }
            }
        }
        Ok(())
    }

    /// Iterate the valid bits in order.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(move |i| match self {
            BitList::Inline { bits, .. } => (bits >> i) & 1 == 1,
            BitList::Bytes { data, .. } => (data[(i / 8) as usize] >> (i % 8)) & 1 == 1,
        })
    }

    /// The `i`-th byte with any padding bits masked to zero.
    fn masked_byte(&self, i: u64) -> u8 {
        let len = self.len();
        let raw = match self {
            BitList::Inline { bits, .. } => (bits >> (i * 8)) as u8,
            BitList::Bytes { data, .. } => data[i as usize],
        };
        let bits_here = (len - i * 8).min(8);
        if bits_here == 8 {
            raw
        } else {
            raw & ((1u8 << bits_here) - 1)
        }
    }

    fn byte_count(&self) -> u64 {
        self.len().div_ceil(8)
    }

    /// Copy out the bits as bytes, padding bits zeroed.
    pub fn to_bytes(&self) -> Vec<u8> {
        (0..self.byte_count()).map(|i| self.masked_byte(i)).collect()
    }
}

impl PartialEq for BitList {
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        (0..self.byte_count()).all(|i| self.masked_byte(i) == other.masked_byte(i))
    }
}

impl Eq for BitList {}

impl Hash for BitList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for i in 0..self.byte_count() {
            self.masked_byte(i).hash(state);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
