//! Error types for card block encoding and decoding

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CardError {
    #[error("Range error: {0}")]
    Range(#[from] RangeError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Precondition error: {0}")]
    Precondition(#[from] PreconditionError),

    #[error("Consistency error: {0}")]
    Consistency(#[from] ConsistencyError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("{field} value {value} exceeds maximum {max}")]
    FieldOverflow { field: &'static str, value: u64, max: u64 },

    #[error("transaction time {time_minutes} min precedes effective date {effective_date} min")]
    BeforeEffectiveDate { time_minutes: u64, effective_date: u64 },

    #[error("time offset {offset} min exceeds the 24-bit limit of {max} min")]
    OffsetOverflow { offset: u64, max: u64 },

    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfBounds { field: &'static str, value: u64, min: u64, max: u64 },

    #[error("timestamp arithmetic overflowed: {reason}")]
    TimestampOverflow { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("{what} must be exactly {expected} bytes, got {actual}")]
    Length { what: &'static str, expected: usize, actual: usize },

    #[error("{what} must be exactly {expected} characters, got {actual}")]
    TextLength { what: &'static str, expected: usize, actual: usize },

    #[error("{what} contains invalid characters: {input:?}")]
    InvalidCharacters { what: &'static str, input: String },

    #[error("buffer too short: wanted {wanted} bytes at offset {offset}, {remaining} remaining")]
    OutOfBounds { offset: usize, wanted: usize, remaining: usize },

    #[error("could not parse timestamp {input:?} with format {format:?}: {reason}")]
    Timestamp { input: String, format: String, reason: String },

    #[error("snapshot decoding failed: {reason}")]
    Snapshot { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("effective date must be set before {operation}")]
    Unanchored { operation: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyError {
    #[error("{what} effective date {actual} does not match owner's {expected}")]
    AnchorMismatch { what: &'static str, expected: u64, actual: u64 },

    #[error("{what} has no effective date, owner expects {expected}")]
    UnanchoredChild { what: &'static str, expected: u64 },

    #[error("{what} has no effective date, so records cannot be attached")]
    UnanchoredOwner { what: &'static str },

    #[error("{what} is already anchored at {current}, cannot re-anchor to {requested}")]
    AlreadyAnchored { what: &'static str, current: u64, requested: u64 },

    #[error("snapshot holds a {actual} block, expected {expected}")]
    AreaMismatch { expected: String, actual: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("{what} index {index} is out of bounds (len {len})")]
    OutOfBounds { what: &'static str, index: usize, len: usize },
}
