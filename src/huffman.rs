//! Canonical Huffman coding over an abstract alphabet.
//!
//! A secondary, experimental coder: it is not wired into the default
//! compressed-blob framing (method ids other than LZW stay undefined) and is
//! not load-bearing for the rest of the codec.
//!
//! Codes are canonical: sorted by (length, ordinal), numerically increasing,
//! so only the code-length table needs serializing. Table wire format:
//! `[packed min length][per alphabet ordinal: 1 presence bit, then packed
//! length - min_length if present]`, preceded by the packed symbol count of
//! the stream. Code words are written most-significant code bit first so
//! prefix decoding can walk the canonical first-code table.

use crate::bitio::{BitInput, BitOutput};
use crate::error::{LynonError, Result};
use crate::varint::{pack_unsigned, unpack_unsigned};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Longest accepted code word. Keeps all shift arithmetic inside u64; real
/// distributions never get close.
const MAX_CODE_LEN: u32 = 63;

/// An ordinal-indexed symbol set.
pub trait Alphabet {
    type Symbol: Clone;

    /// Number of distinct symbols.
    fn size(&self) -> usize;

    /// Dense index of a symbol in `[0, size)`.
    fn ordinal_of(&self, symbol: &Self::Symbol) -> usize;

    /// Symbol for a dense index.
    fn symbol_at(&self, ordinal: usize) -> Self::Symbol;
}

/// The 256-symbol byte alphabet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByteAlphabet;

impl Alphabet for ByteAlphabet {
    type Symbol = u8;

    fn size(&self) -> usize {
        256
    }

    fn ordinal_of(&self, symbol: &u8) -> usize {
        *symbol as usize
    }

    fn symbol_at(&self, ordinal: usize) -> u8 {
        ordinal as u8
    }
}

// =============================================================================
// Code construction
// =============================================================================

enum HuffNode {
    Leaf(usize),
    Join(usize, usize),
}

/// Per-ordinal code lengths from symbol frequencies (0 = absent).
/// Ties break on arena order, so the result is deterministic.
fn code_lengths(freqs: &[u64]) -> Vec<u32> {
    let mut lengths = vec![0u32; freqs.len()];
    let present: Vec<usize> = (0..freqs.len()).filter(|&i| freqs[i] > 0).collect();
    match present.len() {
        0 => return lengths,
        1 => {
            // a lone symbol still needs one bit on the wire
            lengths[present[0]] = 1;
            return lengths;
        }
        _ => {}
    }

    let mut arena: Vec<HuffNode> = Vec::with_capacity(present.len() * 2);
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::with_capacity(present.len());
    for &ordinal in &present {
        arena.push(HuffNode::Leaf(ordinal));
        heap.push(Reverse((freqs[ordinal], arena.len() - 1)));
    }
    while heap.len() > 1 {
        if let (Some(Reverse((w1, a))), Some(Reverse((w2, b)))) = (heap.pop(), heap.pop()) {
            arena.push(HuffNode::Join(a, b));
            heap.push(Reverse((w1 + w2, arena.len() - 1)));
        }
    }
    if let Some(Reverse((_, root))) = heap.pop() {
        let mut stack = vec![(root, 0u32)];
        while let Some((index, depth)) = stack.pop() {
            match arena[index] {
                HuffNode::Leaf(ordinal) => lengths[ordinal] = depth,
                HuffNode::Join(a, b) => {
                    stack.push((a, depth + 1));
                    stack.push((b, depth + 1));
                }
            }
        }
    }
    lengths
}

/// Canonical (length, ordinal, code) triples sorted by (length, ordinal).
fn canonical_codes(lengths: &[u32]) -> Result<Vec<(u32, usize, u64)>> {
    let mut symbols: Vec<(u32, usize)> = lengths
        .iter()
        .enumerate()
        .filter(|(_, &len)| len > 0)
        .map(|(ordinal, &len)| (len, ordinal))
        .collect();
    if symbols.is_empty() {
        return Err(LynonError::Huffman("empty code table".into()));
    }
    symbols.sort_unstable();

    let mut codes = Vec::with_capacity(symbols.len());
    let mut code = 0u64;
    let mut prev_len = symbols[0].0;
    for (i, &(len, ordinal)) in symbols.iter().enumerate() {
        if i > 0 {
            code = (code + 1) << (len - prev_len);
            prev_len = len;
        }
        if code >= 1u64 << len {
            return Err(LynonError::Huffman("over-subscribed code lengths".into()));
        }
        codes.push((len, ordinal, code));
    }
    Ok(codes)
}

// =============================================================================
// Table serialization
// =============================================================================

fn write_table<A: Alphabet>(alphabet: &A, lengths: &[u32], out: &mut BitOutput) {
    let min_len = lengths.iter().copied().filter(|&l| l > 0).min().unwrap_or(0);
    pack_unsigned(out, min_len as u64);
    for ordinal in 0..alphabet.size() {
        if lengths[ordinal] > 0 {
            out.put_bit(true);
            pack_unsigned(out, (lengths[ordinal] - min_len) as u64);
        } else {
            out.put_bit(false);
        }
    }
}

fn read_table<A: Alphabet>(alphabet: &A, input: &mut BitInput) -> Result<Vec<u32>> {
    let min_len = unpack_unsigned(input)?;
    let mut lengths = vec![0u32; alphabet.size()];
    for length in lengths.iter_mut() {
        if input.get_bit()? == 1 {
            let len = min_len + unpack_unsigned(input)?;
            if len == 0 || len > MAX_CODE_LEN as u64 {
                return Err(LynonError::Huffman(format!("code length {} out of range", len)));
            }
            *length = len as u32;
        }
    }
    Ok(lengths)
}

// =============================================================================
// Encode / decode
// =============================================================================

/// Encode a symbol stream: packed count, code-length table, code words.
pub fn encode<A: Alphabet>(alphabet: &A, symbols: &[A::Symbol], out: &mut BitOutput) -> Result<()> {
    pack_unsigned(out, symbols.len() as u64);
    if symbols.is_empty() {
        return Ok(());
    }
    let mut freqs = vec![0u64; alphabet.size()];
    for symbol in symbols {
        freqs[alphabet.ordinal_of(symbol)] += 1;
    }
    let lengths = code_lengths(&freqs);
    write_table(alphabet, &lengths, out);

    let mut code_of = vec![(0u32, 0u64); alphabet.size()];
    for (len, ordinal, code) in canonical_codes(&lengths)? {
        code_of[ordinal] = (len, code);
    }
    for symbol in symbols {
        let (len, code) = code_of[alphabet.ordinal_of(symbol)];
        for i in (0..len).rev() {
            out.put_bit((code >> i) & 1 == 1);
        }
    }
    Ok(())
}

/// Decode a symbol stream written by [`encode`].
pub fn decode<A: Alphabet>(alphabet: &A, input: &mut BitInput) -> Result<Vec<A::Symbol>> {
    let count = unpack_unsigned(input)? as usize;
    if count == 0 {
        return Ok(Vec::new());
    }
    let lengths = read_table(alphabet, input)?;
    let codes = canonical_codes(&lengths)?;

    let max_len = codes.last().map(|&(len, _, _)| len).unwrap_or(0);
    // per-length: first canonical code, index of its symbol, symbol count
    let mut first_code = vec![0u64; max_len as usize + 1];
    let mut first_index = vec![0usize; max_len as usize + 1];
    let mut count_at = vec![0u64; max_len as usize + 1];
    for (i, &(len, _, code)) in codes.iter().enumerate() {
        if count_at[len as usize] == 0 {
            first_code[len as usize] = code;
            first_index[len as usize] = i;
        }
        count_at[len as usize] += 1;
    }

    let mut symbols = Vec::with_capacity(count.min(1 << 20));
    for _ in 0..count {
        let mut code = 0u64;
        let mut len = 0u32;
        loop {
            code = (code << 1) | input.get_bit()? as u64;
            len += 1;
            if len > max_len {
                return Err(LynonError::Huffman("code exceeds table maximum".into()));
            }
            let l = len as usize;
            if count_at[l] > 0 && code >= first_code[l] && code - first_code[l] < count_at[l] {
                let (_, ordinal, _) = codes[first_index[l] + (code - first_code[l]) as usize];
                symbols.push(alphabet.symbol_at(ordinal));
                break;
            }
        }
    }
    Ok(symbols)
}

// =============================================================================
// Tests
// =============================================================================
