//! The complete 96-byte Operator Service Area

use serde::Serialize;

use super::{General, OsaHistory, TransactionRecord, TripPass};
use crate::anchor::EffectiveDate;
use crate::codec::{expect_len, ByteWriter};
use crate::error::{CardError, FormatError, IndexError};
use crate::layout::osa::{
    GENERAL_OFFSET, HISTORY_OFFSET, PADDING_OFFSET, PADDING_SIZE, TRIP_PASS_COUNT, TRIP_PASS_OFFSET,
    TRIP_PASS_SIZE, VALIDATION_OFFSET,
};
use crate::layout::BLOCK_SIZE;
use crate::traits::{AnchoredRecord, FixedRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OsaContainer {
    effective_date: EffectiveDate,
    general: General,
    validation: TransactionRecord,
    history: OsaHistory,
    trip_passes: [TripPass; TRIP_PASS_COUNT],
}

fn pass_index(index: usize) -> Result<usize, IndexError> {
    if index >= TRIP_PASS_COUNT {
        return Err(IndexError::OutOfBounds { what: "trip pass", index, len: TRIP_PASS_COUNT });
    }
    Ok(index)
}

impl OsaContainer {
    pub const SIZE: usize = BLOCK_SIZE;

    pub fn new(effective_date: EffectiveDate) -> Self {
        Self {
            effective_date,
            general: General::default(),
            validation: TransactionRecord::anchored(effective_date),
            history: OsaHistory::anchored(effective_date),
            trip_passes: [TripPass::default(); TRIP_PASS_COUNT],
        }
    }

    pub fn effective_date(&self) -> EffectiveDate {
        self.effective_date
    }

    pub fn set_general(&mut self, general: General) {
        self.general = general;
    }

    /// Replace the validation record. Its effective date must match.
    pub fn set_validation(&mut self, validation: TransactionRecord) -> Result<(), CardError> {
        validation.anchor().ensure_matches("validation", self.effective_date)?;
        self.validation = validation;
        Ok(())
    }

    pub fn set_history(&mut self, history: OsaHistory) -> Result<(), CardError> {
        history.anchor().ensure_matches("history", self.effective_date)?;
        self.history = history;
        Ok(())
    }

    /// Store `pass` in slot 0 or 1.
    pub fn set_trip_pass(&mut self, pass: TripPass, index: usize) -> Result<(), CardError> {
        self.trip_passes[pass_index(index)?] = pass;
        Ok(())
    }

    pub fn general(&self) -> &General {
        &self.general
    }

    pub fn general_mut(&mut self) -> &mut General {
        &mut self.general
    }

    pub fn validation(&self) -> &TransactionRecord {
        &self.validation
    }

    pub fn validation_mut(&mut self) -> &mut TransactionRecord {
        &mut self.validation
    }

    pub fn history(&self) -> &OsaHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut OsaHistory {
        &mut self.history
    }

    pub fn trip_pass(&self, index: usize) -> Result<&TripPass, IndexError> {
        Ok(&self.trip_passes[pass_index(index)?])
    }

    pub fn trip_pass_mut(&mut self, index: usize) -> Result<&mut TripPass, IndexError> {
        Ok(&mut self.trip_passes[pass_index(index)?])
    }

    pub fn trip_passes(&self) -> &[TripPass; TRIP_PASS_COUNT] {
        &self.trip_passes
    }

    /// A transaction record pre-bound to this container's effective date.
    pub fn new_transaction_record(&self) -> TransactionRecord {
        TransactionRecord::anchored(self.effective_date)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(BLOCK_SIZE);
        self.general.encode(&mut writer);
        self.validation.encode(&mut writer);
        self.history.encode(&mut writer);
        for pass in &self.trip_passes {
            pass.encode(&mut writer);
        }
        writer.write_zeros(PADDING_SIZE);
        debug_assert_eq!(writer.len(), BLOCK_SIZE);
        writer.into_vec()
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.to_bytes())
    }

    /// Decode a 96-byte block. The trailing padding is not inspected.
    pub fn parse(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        expect_len("OSA block", bytes, BLOCK_SIZE)?;
        let general = General::parse(&bytes[GENERAL_OFFSET..VALIDATION_OFFSET])?;
        let validation =
            TransactionRecord::parse(&bytes[VALIDATION_OFFSET..HISTORY_OFFSET], effective_date)?;
        let history = OsaHistory::parse(&bytes[HISTORY_OFFSET..TRIP_PASS_OFFSET], effective_date)?;
        let mut trip_passes = [TripPass::default(); TRIP_PASS_COUNT];
        let pass_bytes = &bytes[TRIP_PASS_OFFSET..PADDING_OFFSET];
        for (pass, chunk) in trip_passes.iter_mut().zip(pass_bytes.chunks_exact(TRIP_PASS_SIZE)) {
            *pass = TripPass::parse(chunk)?;
        }
        tracing::debug!(
            effective_date = effective_date.minutes(),
            history_entries = history.len(),
            "parsed OSA block"
        );
        Ok(Self { effective_date, general, validation, history, trip_passes })
    }

    pub fn from_hex(block_hex: &str, effective_date: EffectiveDate) -> Result<Self, CardError> {
        let bytes = hex::decode(block_hex).map_err(|e| FormatError::InvalidCharacters {
            what: "OSA block hex",
            input: e.to_string(),
        })?;
        Self::parse(&bytes, effective_date)
    }
}
