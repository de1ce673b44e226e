//! Deduplicating value caches for the object codec.
//!
//! One `EncodeCache` lives for the duration of one encode call tree, one
//! `DecodeCache` for one decode call tree; neither is persisted or shared.
//! Both sides must insert in identical order for identical input, which
//! holds as long as both apply the same `should_cache` predicate and visit
//! children in the same order.

use crate::error::{LynonError, Result};
use crate::settings::LynonSettings;
use crate::value::LynonValue;
use rustc_hash::FxHashMap;

// =============================================================================
// Encode side
// =============================================================================

/// Append-only value -> ordinal mapping for the encoder.
///
/// Uses FxHashMap for faster hashing than SipHash on small values.
#[derive(Debug, Default)]
pub struct EncodeCache {
    map: FxHashMap<LynonValue, u32>,
}

impl EncodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Ordinal of a previously inserted value, if any.
    pub fn lookup(&self, value: &LynonValue) -> Option<u32> {
        self.map.get(value).copied()
    }

    /// Insert a value; its ordinal is the cache size just before insertion.
    pub fn insert(&mut self, value: LynonValue) -> u32 {
        let ordinal = self.map.len() as u32;
        self.map.insert(value, ordinal);
        ordinal
    }
}

// =============================================================================
// Decode side
// =============================================================================

/// Ordinal-indexed values for the decoder, mirrored insertion order.
#[derive(Debug, Default)]
pub struct DecodeCache {
    entries: Vec<LynonValue>,
}

impl DecodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Resolve a back-reference; out of range is a corrupt stream.
    pub fn get(&self, index: u64) -> Result<&LynonValue> {
        self.entries
            .get(index as usize)
            .ok_or(LynonError::InvalidReference {
                index,
                cache_len: self.entries.len(),
            })
    }

    pub fn push(&mut self, value: LynonValue) {
        self.entries.push(value);
    }
}

// =============================================================================
// Eligibility predicate
// =============================================================================

/// Whether a value is worth deduplicating. Values whose re-encoding is
/// cheaper than a back-reference are excluded: null, booleans, small
/// integers, single characters, and byte sequences of length <= the blob
/// threshold. Mirrored exactly on the decode side.
pub fn should_cache(value: &LynonValue, settings: &LynonSettings) -> bool {
    match value {
        LynonValue::Null | LynonValue::Bool(_) => false,
        LynonValue::Int(n) => n.unsigned_abs() >= settings.int_cache_threshold,
        LynonValue::String(s) => {
            s.len() > settings.blob_cache_threshold && s.chars().nth(1).is_some()
        }
        LynonValue::Buffer(b) => b.len() > settings.blob_cache_threshold,
        _ => true,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_cache_ordinals() {
        let mut cache = EncodeCache::new();
        assert_eq!(cache.insert(LynonValue::String("alpha".into())), 0);
        assert_eq!(cache.insert(LynonValue::String("beta".into())), 1);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(&LynonValue::String("alpha".into())), Some(0));
        assert_eq!(cache.lookup(&LynonValue::String("gamma".into())), None);
    }

    #[test]
    fn test_decode_cache_out_of_range() {
        let mut cache = DecodeCache::new();
        cache.push(LynonValue::Int(1000));
        assert_eq!(cache.get(0).unwrap(), &LynonValue::Int(1000));
        assert!(matches!(
            cache.get(1),
            Err(LynonError::InvalidReference {
                index: 1,
                cache_len: 1
            })
        ));
    }

    #[test]
    fn test_should_cache_policy() {
        let settings = LynonSettings::default();
        assert!(!should_cache(&LynonValue::Null, &settings));
        assert!(!should_cache(&LynonValue::Bool(true), &settings));
        assert!(!should_cache(&LynonValue::Int(0), &settings));
        assert!(!should_cache(&LynonValue::Int(255), &settings));
        assert!(!should_cache(&LynonValue::Int(-255), &settings));
        assert!(should_cache(&LynonValue::Int(256), &settings));
        assert!(should_cache(&LynonValue::Int(-256), &settings));

        // single characters and tiny blobs are cheaper re-encoded
        assert!(!should_cache(&LynonValue::String("a".into()), &settings));
        assert!(!should_cache(&LynonValue::String("ab".into()), &settings));
        // one 3-byte character is still a single character
        assert!(!should_cache(&LynonValue::String("\u{20ac}".into()), &settings));
        assert!(should_cache(&LynonValue::String("abc".into()), &settings));

        assert!(!should_cache(&LynonValue::Buffer(vec![1, 2]), &settings));
        assert!(should_cache(&LynonValue::Buffer(vec![1, 2, 3]), &settings));

        // composites and the remaining scalars are always cached
        assert!(should_cache(&LynonValue::Real(0.5), &settings));
        assert!(should_cache(&LynonValue::List(vec![]), &settings));
        assert!(should_cache(&LynonValue::Instant(0), &settings));
    }
}
