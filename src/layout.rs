//! Compile-time layout of the 96-byte service areas
//!
//! Every size and offset used by the codecs lives here so callers can size
//! buffers without instantiating anything.

/// Size of a complete service-area block on the card.
pub const BLOCK_SIZE: usize = 96;

/// Width in bits of every offset-encoded or absolute timestamp.
pub const TIME_FIELD_BITS: u32 = 24;

pub const TERMINAL_SIZE: usize = 6;
pub const TERMINAL_ID_HEX_LENGTH: usize = 6;

pub mod csa {
    use super::BLOCK_SIZE;

    pub const GENERAL_SIZE: usize = 2;
    pub const VALIDATION_SIZE: usize = 19;
    pub const LOG_ENTRY_SIZE: usize = 17;
    pub const HISTORY_CAPACITY: usize = 4;
    pub const HISTORY_SIZE: usize = HISTORY_CAPACITY * LOG_ENTRY_SIZE;
    pub const RFU_SIZE: usize = 7;

    pub const GENERAL_OFFSET: usize = 0;
    pub const VALIDATION_OFFSET: usize = GENERAL_OFFSET + GENERAL_SIZE;
    pub const HISTORY_OFFSET: usize = VALIDATION_OFFSET + VALIDATION_SIZE;
    pub const RFU_OFFSET: usize = HISTORY_OFFSET + HISTORY_SIZE;

    const _: () = assert!(RFU_OFFSET + RFU_SIZE == BLOCK_SIZE);
}

pub mod osa {
    use super::BLOCK_SIZE;

    pub const GENERAL_SIZE: usize = 7;
    pub const PHONE_NUMBER_BYTES: usize = 5;
    pub const PHONE_NUMBER_DIGITS: usize = 10;
    pub const TRANSACTION_RECORD_SIZE: usize = 13;
    pub const HISTORY_CAPACITY: usize = 2;
    pub const HISTORY_SIZE: usize = HISTORY_CAPACITY * TRANSACTION_RECORD_SIZE;
    pub const TRIP_PASS_SIZE: usize = 20;
    pub const TRIP_PASS_COUNT: usize = 2;

    pub const GENERAL_OFFSET: usize = 0;
    pub const VALIDATION_OFFSET: usize = GENERAL_OFFSET + GENERAL_SIZE;
    pub const HISTORY_OFFSET: usize = VALIDATION_OFFSET + TRANSACTION_RECORD_SIZE;
    pub const TRIP_PASS_OFFSET: usize = HISTORY_OFFSET + HISTORY_SIZE;
    pub const PADDING_OFFSET: usize = TRIP_PASS_OFFSET + TRIP_PASS_COUNT * TRIP_PASS_SIZE;
    pub const PADDING_SIZE: usize = BLOCK_SIZE - PADDING_OFFSET;

    const _: () = assert!(PADDING_SIZE == 10);
}
