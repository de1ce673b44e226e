//! Lynon: a compact, self-describing binary codec.
//!
//! Serializes a value graph into a dense bitstream and reconstructs it
//! exactly. Four layers share one bit-granular stream:
//!
//! - bit I/O primitives ([`BitOutput`] / [`BitInput`]) and the
//!   [`BitList`] value type (LSB-first within each byte, the canonical
//!   wire contract);
//! - nibble-packed variable-length integers ([`varint`]);
//! - an LZW dictionary compressor with a size-bounded decompression
//!   contract ([`lzw`]), framing strings and opaque byte buffers;
//! - the cached object codec ([`LynonEncoder`] / [`LynonDecoder`]): a
//!   4-bit type tag makes each value self-describing, and a deduplicating
//!   cache turns repeated sub-values into short back-references.
//!
//! Record layouts:
//!
//! ```text
//! any value   [1 bit cache-flag][backref | 4-bit tag + payload]
//! integer     [4-bit nibble-count - 1][nibbles, LSB-first]  (sign bit if signed)
//! blob        [packed length][1 bit raw/compressed][2-bit method if compressed][payload]
//! list        [1 bit homogeneous][tag if homogeneous][packed count][elements]
//! ```
//!
//! Encoding and decoding are synchronous and single-threaded per call; the
//! cursor and cache are owned exclusively by one encode or decode call tree,
//! so independent calls may run in parallel on separate data. A canonical
//! Huffman coder over an abstract alphabet ([`huffman`]) is included as a
//! standalone, experimental alternative and is not part of the default
//! framing.

pub mod bitio;
pub mod bitlist;
pub mod cache;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod huffman;
pub mod lzw;
pub mod settings;
pub mod tags;
pub mod value;
pub mod varint;

pub use bitio::{BitInput, BitOutput};
pub use bitlist::BitList;
pub use decoder::LynonDecoder;
pub use encoder::LynonEncoder;
pub use error::{LynonError, Result};
pub use settings::LynonSettings;
pub use tags::LynonType;
pub use value::LynonValue;
