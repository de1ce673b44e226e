//! Error types for Lynon encoding and decoding.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LynonError {
    /// Ran out of bits mid-read. Always fatal to the current decode.
    #[error("unexpected end of bitstream")]
    UnexpectedEof,

    /// Bit index outside `[0, len)` on a `BitList`.
    #[error("bit index {index} out of range (length {len})")]
    BitIndexOutOfRange { index: u64, len: u64 },

    /// Back-reference index at or past the current cache size.
    #[error("invalid object reference {index} (cache has {cache_len} entries)")]
    InvalidReference { index: u64, cache_len: usize },

    /// Type tag ordinal not in the known set.
    #[error("unsupported type tag {0}")]
    UnsupportedTag(u8),

    /// Compression method id other than LZW in a compressed-blob record.
    #[error("unknown compression method {0}")]
    UnknownCompressionMethod(u8),

    /// LZW code that is neither seeded, assigned, pending, nor the stop code.
    #[error("invalid LZW code {code}")]
    InvalidLzwCode { code: u32 },

    /// Declared decompressed length does not match actual decoded content.
    #[error("decompressed length mismatch (expected {expected}, got {actual})")]
    LengthMismatch { expected: usize, actual: usize },

    /// Unsigned payload does not fit a 64-bit signed integer.
    #[error("integer {0} does not fit a 64-bit signed value")]
    IntegerOverflow(u64),

    /// String payload is not valid UTF-8.
    #[error("string payload is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// Malformed canonical Huffman table or code stream.
    #[error("huffman decode error: {0}")]
    Huffman(String),
}

pub type Result<T> = std::result::Result<T, LynonError>;
