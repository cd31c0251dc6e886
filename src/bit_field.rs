//! Range-checked unsigned values of a fixed bit width

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RangeError;

/// An unsigned integer that always fits in `N` bits.
///
/// The range check happens on construction, so a `BitField<N>` held by a
/// record can be packed without masking or truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BitField<const N: u32>(u32);

impl<const N: u32> BitField<N> {
    /// Largest value representable in `N` bits.
    pub const MAX: u32 = {
        assert!(N >= 1 && N <= 24, "bit fields are at most 24 bits wide");
        (1u32 << N) - 1
    };

    pub const ZERO: Self = Self(0);

    /// Create a field, rejecting values wider than `N` bits.
    pub fn new(value: u32) -> Result<Self, RangeError> {
        Self::checked("bit field", value)
    }

    /// Like [`BitField::new`], naming `field` in the error.
    pub fn checked(field: &'static str, value: u32) -> Result<Self, RangeError> {
        if value > Self::MAX {
            return Err(RangeError::FieldOverflow {
                field,
                value: u64::from(value),
                max: u64::from(Self::MAX),
            });
        }
        Ok(Self(value))
    }

    /// Build from raw decoded bits, discarding anything above bit `N`.
    pub(crate) fn from_masked(raw: u32) -> Self {
        Self(raw & Self::MAX)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn width(self) -> u32 {
        N
    }
}

impl<const N: u32> TryFrom<u32> for BitField<N> {
    type Error = RangeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<const N: u32> From<BitField<N>> for u32 {
    fn from(field: BitField<N>) -> Self {
        field.0
    }
}

impl<const N: u32> fmt::Display for BitField<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
