//! Common Service Area: the shared 96-byte open-loop block
//!
//! Layout: general (2) ‖ validation (19) ‖ history of 4 log entries (68) ‖ RFU (7).

pub mod container;
pub mod general;
pub mod log_entry;
pub mod validation;

use crate::history::History;
use crate::layout::csa::HISTORY_CAPACITY;

pub use container::CsaContainer;
pub use general::General;
pub use log_entry::LogEntry;
pub use validation::Validation;

/// The four most recent taps, newest first.
pub type CsaHistory = History<LogEntry, HISTORY_CAPACITY>;
