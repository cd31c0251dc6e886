//! Operator Service Area: the operator-specific alternative 96-byte block
//!
//! Layout: general (7) ‖ validation (13) ‖ history of 2 records (26) ‖
//! two trip passes (2 × 20) ‖ zero padding (10).

pub mod container;
pub mod general;
pub mod transaction_record;
pub mod trip_pass;

use crate::history::History;
use crate::layout::osa::HISTORY_CAPACITY;

pub use container::OsaContainer;
pub use general::General;
pub use transaction_record::TransactionRecord;
pub use trip_pass::TripPass;

pub type OsaHistory = History<TransactionRecord, HISTORY_CAPACITY>;
