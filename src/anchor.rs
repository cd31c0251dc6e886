//! Card effective date and the 24-bit minute offsets measured from it

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bit_field::BitField;
use crate::error::{CardError, ConsistencyError, PreconditionError, RangeError};
use crate::timestamp::{self, MILLISECONDS_IN_MINUTE};

/// Minutes since the Unix epoch from which a card's offsets are measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectiveDate(u64);

impl EffectiveDate {
    pub const fn from_minutes(minutes: u64) -> Self {
        Self(minutes)
    }

    /// Anchor at the whole minute containing `ms`.
    pub fn from_millis(ms: u64) -> Self {
        Self(ms / MILLISECONDS_IN_MINUTE)
    }

    pub fn minutes(self) -> u64 {
        self.0
    }

    /// The anchor in milliseconds, saturating at `u64::MAX` for dates too far
    /// out to represent. Use [`EffectiveDate::checked_millis`] to detect that.
    pub fn as_millis(self) -> u64 {
        self.0.saturating_mul(MILLISECONDS_IN_MINUTE)
    }

    pub fn checked_millis(self) -> Result<u64, RangeError> {
        self.0.checked_mul(MILLISECONDS_IN_MINUTE).ok_or_else(|| RangeError::TimestampOverflow {
            reason: format!("effective date {} min is beyond the millisecond range", self.0),
        })
    }
}

impl fmt::Display for EffectiveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a record or history has been bound to an effective date yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Anchor {
    #[default]
    Unanchored,
    Anchored(EffectiveDate),
}

impl Anchor {
    pub fn effective_date(self) -> Option<EffectiveDate> {
        match self {
            Anchor::Unanchored => None,
            Anchor::Anchored(date) => Some(date),
        }
    }

    pub fn is_anchored(self) -> bool {
        matches!(self, Anchor::Anchored(_))
    }

    /// The anchor date, or a precondition error naming `operation`.
    pub fn require(self, operation: &'static str) -> Result<EffectiveDate, PreconditionError> {
        self.effective_date().ok_or(PreconditionError::Unanchored { operation })
    }

    /// Bind to `date`. Re-binding to the same date is a no-op; any other date
    /// is rejected so an anchor never changes once set.
    pub fn bind(&mut self, what: &'static str, date: EffectiveDate) -> Result<(), ConsistencyError> {
        match *self {
            Anchor::Unanchored => {
                *self = Anchor::Anchored(date);
                Ok(())
            }
            Anchor::Anchored(current) if current == date => Ok(()),
            Anchor::Anchored(current) => Err(ConsistencyError::AlreadyAnchored {
                what,
                current: current.minutes(),
                requested: date.minutes(),
            }),
        }
    }

    /// Verify that a child's anchor equals its owner's date.
    pub fn ensure_matches(self, what: &'static str, owner: EffectiveDate) -> Result<(), ConsistencyError> {
        match self {
            Anchor::Anchored(date) if date == owner => Ok(()),
            Anchor::Anchored(date) => {
                tracing::debug!(what, expected = owner.minutes(), actual = date.minutes(), "anchor mismatch");
                Err(ConsistencyError::AnchorMismatch {
                    what,
                    expected: owner.minutes(),
                    actual: date.minutes(),
                })
            }
            Anchor::Unanchored => {
                tracing::debug!(what, expected = owner.minutes(), "unanchored child rejected");
                Err(ConsistencyError::UnanchoredChild { what, expected: owner.minutes() })
            }
        }
    }
}

impl From<EffectiveDate> for Anchor {
    fn from(date: EffectiveDate) -> Self {
        Anchor::Anchored(date)
    }
}

/// Whole minutes elapsed between an effective date and a transaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeOffset(BitField<24>);

impl TimeOffset {
    pub const MAX_MINUTES: u32 = BitField::<24>::MAX;

    /// Offset of `absolute_ms` (truncated to the minute) from `anchor`.
    pub fn between(anchor: EffectiveDate, absolute_ms: u64) -> Result<Self, RangeError> {
        let minutes = timestamp::to_minute(absolute_ms) / MILLISECONDS_IN_MINUTE;
        if minutes < anchor.minutes() {
            return Err(RangeError::BeforeEffectiveDate {
                time_minutes: minutes,
                effective_date: anchor.minutes(),
            });
        }
        let offset = minutes - anchor.minutes();
        if offset > u64::from(Self::MAX_MINUTES) {
            return Err(RangeError::OffsetOverflow { offset, max: u64::from(Self::MAX_MINUTES) });
        }
        Ok(Self(BitField::from_masked(offset as u32)))
    }

    pub fn from_field(field: BitField<24>) -> Self {
        Self(field)
    }

    pub fn minutes(self) -> u32 {
        self.0.get()
    }

    pub fn field(self) -> BitField<24> {
        self.0
    }

    /// Absolute time in milliseconds this offset denotes under `anchor`.
    pub fn resolve(self, anchor: EffectiveDate) -> Result<u64, RangeError> {
        anchor
            .minutes()
            .checked_add(u64::from(self.minutes()))
            .and_then(|minutes| minutes.checked_mul(MILLISECONDS_IN_MINUTE))
            .ok_or_else(|| RangeError::TimestampOverflow {
                reason: format!("{} min after effective date {} min", self.minutes(), anchor.minutes()),
            })
    }
}

/// Anchor plus offset: the time state every transaction record carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionTime {
    anchor: Anchor,
    offset: TimeOffset,
}

impl TransactionTime {
    pub fn anchored(date: EffectiveDate) -> Self {
        Self { anchor: Anchor::Anchored(date), offset: TimeOffset::default() }
    }

    pub(crate) fn decoded(date: EffectiveDate, offset: BitField<24>) -> Self {
        Self { anchor: Anchor::Anchored(date), offset: TimeOffset::from_field(offset) }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn offset(&self) -> TimeOffset {
        self.offset
    }

    pub fn set_effective_date(&mut self, what: &'static str, date: EffectiveDate) -> Result<(), ConsistencyError> {
        self.anchor.bind(what, date)
    }

    /// Store `absolute_ms` as an offset from the anchor.
    pub fn set(&mut self, absolute_ms: u64) -> Result<(), CardError> {
        let date = self.anchor.require("setting the transaction time")?;
        self.offset = TimeOffset::between(date, absolute_ms)?;
        Ok(())
    }

    pub fn get(&self) -> Result<u64, CardError> {
        let date = self.anchor.require("reading the transaction time")?;
        Ok(self.offset.resolve(date)?)
    }
}
