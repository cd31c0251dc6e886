//! OSA transaction record, used both as the validation slot and in the history

use serde::{Deserialize, Serialize};

use crate::anchor::{Anchor, EffectiveDate, TimeOffset, TransactionTime};
use crate::bit_field::BitField;
use crate::codec::{expect_len, ByteReader, ByteWriter};
use crate::error::CardError;
use crate::layout::osa::TRANSACTION_RECORD_SIZE;
use crate::traits::{AnchoredRecord, FixedRecord};
use crate::types::TxnStatus;

/// | bytes  | field                         |
/// |--------|-------------------------------|
/// | 0      | error code                    |
/// | 1      | product type                  |
/// | 2..5   | time offset (minutes, 24 bit) |
/// | 5..7   | station id                    |
/// | 7..9   | fare                          |
/// | 9..12  | terminal id (24 bit)          |
/// | 12     | status(7..4) rfu(3..0)        |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    error_code: u8,
    product_type: u8,
    time: TransactionTime,
    station_id: u16,
    fare: u16,
    terminal_id: BitField<24>,
    status: TxnStatus,
    rfu: BitField<4>,
}

impl TransactionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchored(date: EffectiveDate) -> Self {
        Self { time: TransactionTime::anchored(date), ..Self::default() }
    }

    pub fn set_effective_date(&mut self, date: EffectiveDate) -> Result<(), CardError> {
        self.time.set_effective_date("transaction record", date)?;
        Ok(())
    }

    pub fn set_date_and_time(&mut self, absolute_ms: u64) -> Result<(), CardError> {
        self.time.set(absolute_ms)
    }

    pub fn set_error_code(&mut self, code: u8) {
        self.error_code = code;
    }

    pub fn set_product_type(&mut self, product_type: u8) {
        self.product_type = product_type;
    }

    pub fn set_station_id(&mut self, id: u16) {
        self.station_id = id;
    }

    pub fn set_fare(&mut self, fare: u16) {
        self.fare = fare;
    }

    pub fn set_terminal_id(&mut self, id: u32) -> Result<(), CardError> {
        self.terminal_id = BitField::checked("terminal id", id)?;
        Ok(())
    }

    pub fn set_txn_status(&mut self, status: TxnStatus) -> Result<(), CardError> {
        self.status = status.validated()?;
        Ok(())
    }

    pub fn set_rfu(&mut self, value: u8) -> Result<(), CardError> {
        self.rfu = BitField::checked("transaction record rfu", u32::from(value))?;
        Ok(())
    }

    pub fn effective_date(&self) -> Option<EffectiveDate> {
        self.time.anchor().effective_date()
    }

    pub fn date_and_time(&self) -> Result<u64, CardError> {
        self.time.get()
    }

    pub fn time_offset(&self) -> TimeOffset {
        self.time.offset()
    }

    pub fn error_code(&self) -> u8 {
        self.error_code
    }

    pub fn product_type(&self) -> u8 {
        self.product_type
    }

    pub fn station_id(&self) -> u16 {
        self.station_id
    }

    pub fn fare(&self) -> u16 {
        self.fare
    }

    pub fn terminal_id(&self) -> u32 {
        self.terminal_id.get()
    }

    pub fn txn_status(&self) -> TxnStatus {
        self.status
    }

    pub fn rfu(&self) -> u8 {
        self.rfu.get() as u8
    }

    pub fn parse(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        expect_len("OSA transaction record", bytes, TRANSACTION_RECORD_SIZE)?;
        let mut reader = ByteReader::new(bytes);
        let error_code = reader.read_u8()?;
        let product_type = reader.read_u8()?;
        let time = TransactionTime::decoded(effective_date, reader.read_u24()?);
        let station_id = reader.read_u16()?;
        let fare = reader.read_u16()?;
        let terminal_id = reader.read_u24()?;
        let (status, rfu) = reader.read_nibbles()?;
        Ok(Self {
            error_code,
            product_type,
            time,
            station_id,
            fare,
            terminal_id,
            status: TxnStatus::from_bits(status),
            rfu,
        })
    }
}

impl FixedRecord for TransactionRecord {
    const SIZE: usize = TRANSACTION_RECORD_SIZE;

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.error_code);
        writer.write_u8(self.product_type);
        writer.write_u24(self.time.offset().field());
        writer.write_u16(self.station_id);
        writer.write_u16(self.fare);
        writer.write_u24(self.terminal_id);
        writer.write_nibbles(self.status.code(), self.rfu);
    }
}

impl AnchoredRecord for TransactionRecord {
    const NAME: &'static str = "transaction record";

    fn anchor(&self) -> Anchor {
        self.time.anchor()
    }

    fn parse_anchored(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        Self::parse(bytes, effective_date)
    }
}
