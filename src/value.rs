//! `LynonValue`: the closed value model and its serialization hooks.
//!
//! The codec never inspects a value beyond asking for its type tag, calling
//! `serialize_payload` (payload only, tag already written), and constructing
//! results through `deserialize_payload`. The payload dispatch is
//! tag-directed because a homogeneous collection may encode its elements
//! under a *generalized* integer tag rather than each element's natural one.

use crate::decoder::LynonDecoder;
use crate::encoder::LynonEncoder;
use crate::error::{LynonError, Result};
use crate::tags::LynonType;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone)]
pub enum LynonValue {
    Null,
    Int(i64),
    Bool(bool),
    Real(f64),
    String(String),
    List(Vec<LynonValue>),
    /// Entries in insertion order; decoding reproduces the encoded order.
    Map(Vec<(LynonValue, LynonValue)>),
    Set(Vec<LynonValue>),
    Buffer(Vec<u8>),
    /// Epoch milliseconds.
    Instant(i64),
    /// Milliseconds.
    Duration(i64),
}

impl LynonValue {
    /// The value's natural type tag. Integers split by sign so that zero and
    /// small positives need no payload bits for the sign.
    pub fn tag(&self) -> LynonType {
        match self {
            LynonValue::Null => LynonType::Null,
            LynonValue::Int(0) => LynonType::Zero,
            LynonValue::Int(n) if *n > 0 => LynonType::IntPositive,
            LynonValue::Int(_) => LynonType::IntNegative,
            LynonValue::Bool(_) => LynonType::Bool,
            LynonValue::Real(_) => LynonType::Real,
            LynonValue::String(_) => LynonType::String,
            LynonValue::List(_) => LynonType::List,
            LynonValue::Map(_) => LynonType::Map,
            LynonValue::Set(_) => LynonType::Set,
            LynonValue::Buffer(_) => LynonType::Buffer,
            LynonValue::Instant(_) => LynonType::Instant,
            LynonValue::Duration(_) => LynonType::Duration,
        }
    }

    /// Write this value's payload under `tag` (already written by the
    /// caller). `tag` is the value's natural tag or a generalized integer
    /// tag; the pairing is an encoder invariant.
    pub(crate) fn serialize_payload(
        &self,
        enc: &mut LynonEncoder,
        tag: LynonType,
    ) -> Result<()> {
        match (tag, self) {
            (LynonType::Null, LynonValue::Null) => Ok(()),
            (LynonType::Zero, LynonValue::Int(n)) => {
                debug_assert_eq!(*n, 0);
                Ok(())
            }
            (LynonType::IntPositive, LynonValue::Int(n)) => {
                enc.pack_unsigned(*n as u64);
                Ok(())
            }
            (LynonType::IntNegative, LynonValue::Int(n)) => {
                enc.pack_signed(*n);
                Ok(())
            }
            (LynonType::Bool, LynonValue::Bool(b)) => {
                enc.put_bit(*b);
                Ok(())
            }
            (LynonType::Real, LynonValue::Real(x)) => {
                enc.put_bits(x.to_bits(), 64);
                Ok(())
            }
            (LynonType::String, LynonValue::String(s)) => {
                enc.compress(s.as_bytes());
                Ok(())
            }
            (LynonType::Buffer, LynonValue::Buffer(b)) => {
                enc.compress(b);
                Ok(())
            }
            (LynonType::List, LynonValue::List(items))
            | (LynonType::Set, LynonValue::Set(items)) => enc.encode_any_list(items),
            (LynonType::Map, LynonValue::Map(entries)) => {
                enc.pack_unsigned(entries.len() as u64);
                for (key, value) in entries {
                    enc.encode_any(key)?;
                    enc.encode_any(value)?;
                }
                Ok(())
            }
            (LynonType::Instant, LynonValue::Instant(ms))
            | (LynonType::Duration, LynonValue::Duration(ms)) => {
                enc.pack_signed(*ms);
                Ok(())
            }
            _ => unreachable!("value {self:?} cannot serialize under tag {tag:?}"),
        }
    }

    /// Reconstruct a value of the category named by `tag` from the payload.
    pub(crate) fn deserialize_payload(dec: &mut LynonDecoder, tag: LynonType) -> Result<Self> {
        match tag {
            LynonType::Null => Ok(LynonValue::Null),
            LynonType::Zero => Ok(LynonValue::Int(0)),
            LynonType::IntPositive => {
                let n = dec.unpack_unsigned()?;
                if n > i64::MAX as u64 {
                    return Err(LynonError::IntegerOverflow(n));
                }
                Ok(LynonValue::Int(n as i64))
            }
            LynonType::IntNegative => Ok(LynonValue::Int(dec.unpack_signed()?)),
            LynonType::Bool => Ok(LynonValue::Bool(dec.get_bit()? == 1)),
            LynonType::Real => Ok(LynonValue::Real(f64::from_bits(dec.get_bits(64)?))),
            LynonType::String => {
                let bytes = dec.decompress()?;
                Ok(LynonValue::String(String::from_utf8(bytes)?))
            }
            LynonType::List => Ok(LynonValue::List(dec.decode_any_list()?)),
            LynonType::Map => {
                let count = dec.unpack_unsigned()? as usize;
                let mut entries = Vec::with_capacity(count.min(4096));
                for _ in 0..count {
                    let key = dec.decode_any()?;
                    let value = dec.decode_any()?;
                    entries.push((key, value));
                }
                Ok(LynonValue::Map(entries))
            }
            LynonType::Set => Ok(LynonValue::Set(dec.decode_any_list()?)),
            LynonType::Buffer => Ok(LynonValue::Buffer(dec.decompress()?)),
            LynonType::Instant => Ok(LynonValue::Instant(dec.unpack_signed()?)),
            LynonType::Duration => Ok(LynonValue::Duration(dec.unpack_signed()?)),
            LynonType::Other => Err(LynonError::UnsupportedTag(LynonType::Other as u8)),
        }
    }
}

// Reals compare and hash by bit pattern so values can key the encoder cache
// deterministically (NaN equals itself; 0.0 and -0.0 are distinct).
impl PartialEq for LynonValue {
    fn eq(&self, other: &Self) -> bool {
        use LynonValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Int(a), Int(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Real(a), Real(b)) => a.to_bits() == b.to_bits(),
            (String(a), String(b)) => a == b,
            (List(a), List(b)) => a == b,
            (Map(a), Map(b)) => a == b,
            (Set(a), Set(b)) => a == b,
            (Buffer(a), Buffer(b)) => a == b,
            (Instant(a), Instant(b)) => a == b,
            (Duration(a), Duration(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for LynonValue {}

impl Hash for LynonValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            LynonValue::Null => {}
            LynonValue::Int(n) => n.hash(state),
            LynonValue::Bool(b) => b.hash(state),
            LynonValue::Real(x) => x.to_bits().hash(state),
            LynonValue::String(s) => s.hash(state),
            LynonValue::List(items) => items.hash(state),
            LynonValue::Map(entries) => entries.hash(state),
            LynonValue::Set(items) => items.hash(state),
            LynonValue::Buffer(b) => b.hash(state),
            LynonValue::Instant(ms) => ms.hash(state),
            LynonValue::Duration(ms) => ms.hash(state),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
