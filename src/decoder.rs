//! `LynonDecoder`: the cached object codec, read side.
//!
//! Exact mirror of the encoder: one cache-flag bit, then either a
//! back-reference sized to the current cache length or a tag (unless the
//! caller already knows the type) plus payload. Decoded values pass through
//! the same eligibility predicate as on the encode side, keeping the two
//! caches in lock-step insertion order.
//!
//! All failure modes are fatal to the decode attempt: bit-stream corruption
//! is not recoverable by re-reading.

use crate::bitio::{ref_bit_width, BitInput};
use crate::cache::{should_cache, DecodeCache};
use crate::error::Result;
use crate::lzw;
use crate::settings::LynonSettings;
use crate::tags::LynonType;
use crate::value::LynonValue;
use crate::varint;

pub struct LynonDecoder<'a> {
    input: BitInput<'a>,
    cache: DecodeCache,
    settings: LynonSettings,
}

impl<'a> LynonDecoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_settings(data, LynonSettings::default())
    }

    pub fn with_settings(data: &'a [u8], settings: LynonSettings) -> Self {
        Self {
            input: BitInput::new(data),
            cache: DecodeCache::new(),
            settings,
        }
    }

    /// Decode only the first `bit_len` bits of `data` (e.g. from a
    /// `BitList` produced by `LynonEncoder::finish`).
    pub fn with_bit_len(data: &'a [u8], bit_len: u64) -> Self {
        Self {
            input: BitInput::with_bit_len(data, bit_len),
            cache: DecodeCache::new(),
            settings: LynonSettings::default(),
        }
    }

    /// Decode a self-describing value record.
    pub fn decode_any(&mut self) -> Result<LynonValue> {
        if self.input.get_bit()? == 1 {
            return self.read_back_reference();
        }
        let tag = LynonType::from_u4(self.input.get_bits(4)? as u8)?;
        let value = LynonValue::deserialize_payload(self, tag)?;
        if should_cache(&value, &self.settings) {
            self.cache.push(value.clone());
        }
        Ok(value)
    }

    /// Decode a value of a known type: no tag in the stream, cache handling
    /// unchanged. Mirror of `LynonEncoder::encode_expected`.
    pub fn decode_expected(&mut self, tag: LynonType) -> Result<LynonValue> {
        if self.input.get_bit()? == 1 {
            return self.read_back_reference();
        }
        let value = LynonValue::deserialize_payload(self, tag)?;
        if should_cache(&value, &self.settings) {
            self.cache.push(value.clone());
        }
        Ok(value)
    }

    /// Decode a list record (homogeneous or per-element tagged).
    pub fn decode_any_list(&mut self) -> Result<Vec<LynonValue>> {
        if self.input.get_bit()? == 1 {
            let tag = LynonType::from_u4(self.input.get_bits(4)? as u8)?;
            let count = varint::unpack_unsigned(&mut self.input)? as usize;
            let mut values = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                values.push(self.decode_expected(tag)?);
            }
            Ok(values)
        } else {
            let count = varint::unpack_unsigned(&mut self.input)? as usize;
            let mut values = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                values.push(self.decode_any()?);
            }
            Ok(values)
        }
    }

    fn read_back_reference(&mut self) -> Result<LynonValue> {
        let width = ref_bit_width(self.cache.len() as u64);
        let index = self.input.get_bits(width)?;
        Ok(self.cache.get(index)?.clone())
    }

    // --- primitives exposed to deserialization hooks ---

    pub fn get_bit(&mut self) -> Result<u8> {
        self.input.get_bit()
    }

    pub fn get_bits(&mut self, count: u32) -> Result<u64> {
        self.input.get_bits(count)
    }

    pub fn unpack_unsigned(&mut self) -> Result<u64> {
        varint::unpack_unsigned(&mut self.input)
    }

    pub fn unpack_signed(&mut self) -> Result<i64> {
        varint::unpack_signed(&mut self.input)
    }

    /// Read a compressed-blob record.
    pub fn decompress(&mut self) -> Result<Vec<u8>> {
        lzw::decompress_blob(&mut self.input)
    }
}

// =============================================================================
// Tests
// =============================================================================
