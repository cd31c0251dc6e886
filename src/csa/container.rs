//! The complete 96-byte Common Service Area

use serde::Serialize;

use super::{CsaHistory, General, Validation};
use crate::anchor::EffectiveDate;
use crate::codec::{expect_len, ByteWriter};
use crate::error::{CardError, FormatError};
use crate::layout::csa::{GENERAL_OFFSET, HISTORY_OFFSET, RFU_OFFSET, RFU_SIZE, VALIDATION_OFFSET};
use crate::layout::BLOCK_SIZE;
use crate::traits::{AnchoredRecord, FixedRecord};

/// Owns the card effective date and every child record bound to it.
///
/// The validation record and history are created already anchored to the
/// container's date, and replacing either checks that the incoming child
/// carries the same date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsaContainer {
    effective_date: EffectiveDate,
    general: General,
    validation: Validation,
    history: CsaHistory,
    rfu: [u8; RFU_SIZE],
}

impl CsaContainer {
    pub const SIZE: usize = BLOCK_SIZE;

    pub fn new(effective_date: EffectiveDate) -> Self {
        Self {
            effective_date,
            general: General::default(),
            validation: Validation::anchored(effective_date),
            history: CsaHistory::anchored(effective_date),
            rfu: [0; RFU_SIZE],
        }
    }

    pub fn effective_date(&self) -> EffectiveDate {
        self.effective_date
    }

    pub fn set_general(&mut self, general: General) {
        self.general = general;
    }

    /// Replace the validation record. Its effective date must match.
    pub fn set_validation(&mut self, validation: Validation) -> Result<(), CardError> {
        validation.anchor().ensure_matches("validation", self.effective_date)?;
        self.validation = validation;
        Ok(())
    }

    /// Replace the history. Its effective date must match.
    pub fn set_history(&mut self, history: CsaHistory) -> Result<(), CardError> {
        history.anchor().ensure_matches("history", self.effective_date)?;
        self.history = history;
        Ok(())
    }

    pub fn set_rfu(&mut self, rfu: [u8; RFU_SIZE]) {
        self.rfu = rfu;
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn general_mut(&mut self) -> &mut General {
        &mut self.general
    }

    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// Mutable access to the validation record. Its anchor is already set
    /// and cannot be changed to another date through this reference.
    pub fn validation_mut(&mut self) -> &mut Validation {
        &mut self.validation
    }

    pub fn history(&self) -> &CsaHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut CsaHistory {
        &mut self.history
    }

    pub fn rfu(&self) -> &[u8; RFU_SIZE] {
        &self.rfu
    }

    /// A log entry pre-bound to this container's effective date.
    pub fn new_log_entry(&self) -> super::LogEntry {
        super::LogEntry::anchored(self.effective_date)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(BLOCK_SIZE);
        self.general.encode(&mut writer);
        self.validation.encode(&mut writer);
        self.history.encode(&mut writer);
        writer.write_bytes(&self.rfu);
        debug_assert_eq!(writer.len(), BLOCK_SIZE);
        writer.into_vec()
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.to_bytes())
    }

    /// Decode a 96-byte block, binding every child to `effective_date`.
    pub fn parse(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        expect_len("CSA block", bytes, BLOCK_SIZE)?;
        let general = General::parse(&bytes[GENERAL_OFFSET..VALIDATION_OFFSET])?;
        let validation = Validation::parse(&bytes[VALIDATION_OFFSET..HISTORY_OFFSET], effective_date)?;
        let history = CsaHistory::parse(&bytes[HISTORY_OFFSET..RFU_OFFSET], effective_date)?;
        let mut rfu = [0u8; RFU_SIZE];
        rfu.copy_from_slice(&bytes[RFU_OFFSET..]);
        tracing::debug!(
            effective_date = effective_date.minutes(),
            history_entries = history.len(),
            "parsed CSA block"
        );
        Ok(Self { effective_date, general, validation, history, rfu })
    }

    pub fn from_hex(block_hex: &str, effective_date: EffectiveDate) -> Result<Self, CardError> {
        let bytes = hex::decode(block_hex).map_err(|e| FormatError::InvalidCharacters {
            what: "CSA block hex",
            input: e.to_string(),
        })?;
        Self::parse(&bytes, effective_date)
    }
}
