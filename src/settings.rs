//! Encoder/decoder policy knobs.

/// Cache and compression policy for one encoder or decoder.
///
/// The cache thresholds are part of the wire contract: encoder and decoder
/// caches stay in lock-step only if both sides apply the same eligibility
/// predicate, so both must be constructed with equal thresholds. The
/// compression attempt threshold is encoder-local; the raw/compressed flag
/// in the blob framing makes it safe to vary.
#[derive(Debug, Clone)]
pub struct LynonSettings {
    /// Integers with magnitude below this are never cached; re-encoding them
    /// is cheaper than a back-reference.
    pub int_cache_threshold: u64,
    /// Strings and buffers of byte length at or below this are never cached.
    pub blob_cache_threshold: usize,
    /// Blobs shorter than this skip the LZW attempt and are framed raw.
    pub compress_min_len: usize,
}

impl Default for LynonSettings {
    fn default() -> Self {
        Self {
            int_cache_threshold: 256,
            blob_cache_threshold: 2,
            compress_min_len: 16,
        }
    }
}
