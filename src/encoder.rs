//! `LynonEncoder`: the cached object codec, write side.
//!
//! Any-value record: `[1 bit cache-flag][backref | 4-bit tag + payload]`. A
//! cache hit writes flag `1` and the cached ordinal in exactly
//! `max(1, ceil(log2(cache_size)))` bits, sized at the moment of lookup. A
//! miss writes flag `0`, the tag, and the payload; afterwards the value is
//! appended to the cache if the eligibility predicate admits it.
//!
//! List record: `[1 bit homogeneous][tag if homogeneous][packed count]
//! [elements]`. When every element's natural tag generalizes to one shared
//! tag, elements are written as known-type records (cache flag + payload,
//! no per-element tag); otherwise each element is a full any-value record.

use crate::bitio::{ref_bit_width, BitOutput};
use crate::bitlist::BitList;
use crate::cache::{should_cache, EncodeCache};
use crate::error::Result;
use crate::lzw;
use crate::settings::LynonSettings;
use crate::tags::LynonType;
use crate::value::LynonValue;
use crate::varint;

pub struct LynonEncoder {
    out: BitOutput,
    cache: EncodeCache,
    settings: LynonSettings,
}

impl LynonEncoder {
    pub fn new() -> Self {
        Self::with_settings(LynonSettings::default())
    }

    pub fn with_settings(settings: LynonSettings) -> Self {
        Self {
            out: BitOutput::new(),
            cache: EncodeCache::new(),
            settings,
        }
    }

    /// Encode a self-describing value record.
    pub fn encode_any(&mut self, value: &LynonValue) -> Result<()> {
        if self.try_back_reference(value) {
            return Ok(());
        }
        self.out.put_bit(false);
        let tag = value.tag();
        self.out.put_bits(tag as u64, 4);
        value.serialize_payload(self, tag)?;
        if should_cache(value, &self.settings) {
            self.cache.insert(value.clone());
        }
        Ok(())
    }

    /// Encode a value whose type the decoder already knows: the 4-bit tag is
    /// omitted, cache handling is unchanged. `tag` is the value's natural
    /// tag or a generalized integer tag.
    pub fn encode_expected(&mut self, value: &LynonValue, tag: LynonType) -> Result<()> {
        if self.try_back_reference(value) {
            return Ok(());
        }
        self.out.put_bit(false);
        value.serialize_payload(self, tag)?;
        if should_cache(value, &self.settings) {
            self.cache.insert(value.clone());
        }
        Ok(())
    }

    /// Encode a collection with the homogeneous-list optimization.
    pub fn encode_any_list(&mut self, values: &[LynonValue]) -> Result<()> {
        match shared_tag(values) {
            Some(tag) => {
                self.out.put_bit(true);
                self.out.put_bits(tag as u64, 4);
                varint::pack_unsigned(&mut self.out, values.len() as u64);
                for value in values {
                    self.encode_expected(value, tag)?;
                }
            }
            None => {
                self.out.put_bit(false);
                varint::pack_unsigned(&mut self.out, values.len() as u64);
                for value in values {
                    self.encode_any(value)?;
                }
            }
        }
        Ok(())
    }

    fn try_back_reference(&mut self, value: &LynonValue) -> bool {
        match self.cache.lookup(value) {
            Some(ordinal) => {
                let width = ref_bit_width(self.cache.len() as u64);
                self.out.put_bit(true);
                self.out.put_bits(ordinal as u64, width);
                tracing::trace!(ordinal, width, "emitting back-reference");
                true
            }
            None => false,
        }
    }

    // --- primitives exposed to serialization hooks ---

    pub fn put_bit(&mut self, bit: bool) {
        self.out.put_bit(bit);
    }

    pub fn put_bits(&mut self, value: u64, count: u32) {
        self.out.put_bits(value, count);
    }

    pub fn pack_unsigned(&mut self, value: u64) {
        varint::pack_unsigned(&mut self.out, value);
    }

    pub fn pack_signed(&mut self, value: i64) {
        varint::pack_signed(&mut self.out, value);
    }

    /// Write a compressed-blob record.
    pub fn compress(&mut self, bytes: &[u8]) {
        lzw::compress_blob(&mut self.out, bytes, self.settings.compress_min_len);
    }

    // --- output ---

    /// Total bits written so far.
    pub fn bit_len(&self) -> u64 {
        self.out.bit_len()
    }

    /// Close the stream and return it as a `BitList`.
    pub fn finish(self) -> BitList {
        self.out.into_bit_list()
    }

    /// Close the stream and return the raw bytes plus the valid bit count.
    pub fn into_bytes(self) -> (Vec<u8>, u64) {
        self.out.into_bytes()
    }
}

impl Default for LynonEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// The single tag every element generalizes to, if any. Empty collections
/// have no tags to generalize and are framed heterogeneous.
fn shared_tag(values: &[LynonValue]) -> Option<LynonType> {
    let mut iter = values.iter();
    let mut tag = iter.next()?.tag();
    for value in iter {
        tag = tag.generalize(value.tag())?;
    }
    Some(tag)
}

// =============================================================================
// Tests
// =============================================================================
