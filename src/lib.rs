//! Openloop transit card data model
//!
//! Encodes and decodes the 96-byte service-area blocks stored on open-loop
//! transit cards: the shared Common Service Area (CSA) and the
//! operator-specific Operator Service Area (OSA). Transaction times are stored
//! as 24-bit minute offsets from a per-card effective date.

pub mod anchor;
pub mod bit_field;
pub mod codec;
pub mod csa;
pub mod error;
pub mod history;
pub mod layout;
pub mod osa;
pub mod snapshot;
pub mod terminal;
pub mod timestamp;
pub mod traits;
pub mod types;

// Re-export core types and traits
pub use anchor::{Anchor, EffectiveDate, TimeOffset, TransactionTime};
pub use bit_field::BitField;
pub use codec::{ByteReader, ByteWriter};
pub use csa::{CsaContainer, CsaHistory, LogEntry, Validation};
pub use error::{CardError, ConsistencyError, FormatError, IndexError, PreconditionError, RangeError};
pub use history::History;
pub use layout::BLOCK_SIZE;
pub use osa::{OsaContainer, OsaHistory, TransactionRecord, TripPass};
pub use snapshot::{BlockSnapshot, ServiceArea};
pub use terminal::Terminal;
pub use traits::{AnchoredRecord, FixedRecord};
pub use types::{Language, ServiceStatus, TxnStatus, Version};
