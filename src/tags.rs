//! The 4-bit type-tag table making encoded values self-describing.
//!
//! Tag ordinals are fixed by the wire format and carried immediately before
//! a value's payload whenever the concrete type is not already known from
//! context. `Other` (13) is reserved for host-runtime classes and is never
//! produced by this crate.

use crate::error::{LynonError, Result};

/// Value category discriminant in the bitstream (4 bits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LynonType {
    Null = 0,
    Zero = 1,
    IntPositive = 2,
    IntNegative = 3,
    Bool = 4,
    Real = 5,
    String = 6,
    List = 7,
    Map = 8,
    Set = 9,
    Buffer = 10,
    Instant = 11,
    Duration = 12,
    Other = 13,
}

impl LynonType {
    pub fn from_u4(b: u8) -> Result<Self> {
        match b {
            0 => Ok(LynonType::Null),
            1 => Ok(LynonType::Zero),
            2 => Ok(LynonType::IntPositive),
            3 => Ok(LynonType::IntNegative),
            4 => Ok(LynonType::Bool),
            5 => Ok(LynonType::Real),
            6 => Ok(LynonType::String),
            7 => Ok(LynonType::List),
            8 => Ok(LynonType::Map),
            9 => Ok(LynonType::Set),
            10 => Ok(LynonType::Buffer),
            11 => Ok(LynonType::Instant),
            12 => Ok(LynonType::Duration),
            13 => Ok(LynonType::Other),
            _ => Err(LynonError::UnsupportedTag(b)),
        }
    }

    /// True for the three integer categories.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            LynonType::Zero | LynonType::IntPositive | LynonType::IntNegative
        )
    }

    /// Generalize two tags to one shared tag for homogeneous collections.
    ///
    /// Equal tags generalize to themselves. The integer categories form a
    /// small lattice: zero and positive generalize to positive; any mix
    /// involving a negative generalizes to the signed category (whose
    /// payload carries a sign bit). Everything else is not generalizable.
    pub fn generalize(self, other: LynonType) -> Option<LynonType> {
        if self == other {
            return Some(self);
        }
        if self.is_integer() && other.is_integer() {
            if self == LynonType::IntNegative || other == LynonType::IntNegative {
                Some(LynonType::IntNegative)
            } else {
                Some(LynonType::IntPositive)
            }
        } else {
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
