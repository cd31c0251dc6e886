//! CSA validation record: the most recent tap on an open-loop reader

use serde::{Deserialize, Serialize};

use crate::anchor::{Anchor, EffectiveDate, TimeOffset, TransactionTime};
use crate::bit_field::BitField;
use crate::codec::{expect_len, ByteReader, ByteWriter};
use crate::error::CardError;
use crate::layout::csa::VALIDATION_SIZE;
use crate::terminal::Terminal;
use crate::traits::{AnchoredRecord, FixedRecord};
use crate::types::TxnStatus;

/// | bytes  | field                          |
/// |--------|--------------------------------|
/// | 0      | error code                     |
/// | 1      | product type                   |
/// | 2..8   | terminal                       |
/// | 8..11  | time offset (minutes, 24 bit)  |
/// | 11..13 | fare amount                    |
/// | 13..15 | route number                   |
/// | 15..18 | service provider data (24 bit) |
/// | 18     | status(7..4) rfu(3..0)         |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validation {
    error_code: u8,
    product_type: u8,
    terminal: Terminal,
    time: TransactionTime,
    fare_amount: u16,
    route_number: u16,
    service_provider_data: BitField<24>,
    status: TxnStatus,
    rfu: BitField<4>,
}

impl Validation {
    /// An unanchored record; the transaction time cannot be set until
    /// [`Validation::set_effective_date`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchored(date: EffectiveDate) -> Self {
        Self { time: TransactionTime::anchored(date), ..Self::default() }
    }

    pub fn set_effective_date(&mut self, date: EffectiveDate) -> Result<(), CardError> {
        self.time.set_effective_date("validation", date)?;
        Ok(())
    }

    /// Record the transaction time, given in milliseconds since the epoch.
    pub fn set_date_and_time(&mut self, absolute_ms: u64) -> Result<(), CardError> {
        self.time.set(absolute_ms)
    }

    pub fn set_error_code(&mut self, code: u8) {
        self.error_code = code;
    }

    pub fn set_product_type(&mut self, product_type: u8) {
        self.product_type = product_type;
    }

    pub fn set_terminal(&mut self, terminal: Terminal) {
        self.terminal = terminal;
    }

    pub fn set_fare_amount(&mut self, amount: u16) {
        self.fare_amount = amount;
    }

    pub fn set_route_number(&mut self, number: u16) {
        self.route_number = number;
    }

    pub fn set_service_provider_data(&mut self, data: u32) -> Result<(), CardError> {
        self.service_provider_data = BitField::checked("service provider data", data)?;
        Ok(())
    }

    pub fn set_txn_status(&mut self, status: TxnStatus) -> Result<(), CardError> {
        self.status = status.validated()?;
        Ok(())
    }

    pub fn set_rfu(&mut self, value: u8) -> Result<(), CardError> {
        self.rfu = BitField::checked("validation rfu", u32::from(value))?;
        Ok(())
    }

    pub fn effective_date(&self) -> Option<EffectiveDate> {
        self.time.anchor().effective_date()
    }

    /// Transaction time in milliseconds, truncated to the minute.
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

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn fare_amount(&self) -> u16 {
        self.fare_amount
    }

    pub fn route_number(&self) -> u16 {
        self.route_number
    }

    pub fn service_provider_data(&self) -> u32 {
        self.service_provider_data.get()
    }

    /// Six uppercase hex digits.
    pub fn service_provider_data_hex(&self) -> String {
        hex::encode_upper(&self.service_provider_data.get().to_be_bytes()[1..])
    }

    pub fn txn_status(&self) -> TxnStatus {
        self.status
    }

    pub fn rfu(&self) -> u8 {
        self.rfu.get() as u8
    }

    pub fn parse(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        expect_len("CSA validation", bytes, VALIDATION_SIZE)?;
        let mut reader = ByteReader::new(bytes);
        let error_code = reader.read_u8()?;
        let product_type = reader.read_u8()?;
        let terminal = Terminal::decode(&mut reader)?;
        let time = TransactionTime::decoded(effective_date, reader.read_u24()?);
        let fare_amount = reader.read_u16()?;
        let route_number = reader.read_u16()?;
        let service_provider_data = reader.read_u24()?;
        let (status, rfu) = reader.read_nibbles()?;
        Ok(Self {
            error_code,
            product_type,
            terminal,
            time,
            fare_amount,
            route_number,
            service_provider_data,
            status: TxnStatus::from_bits(status),
            rfu,
        })
    }
}

impl FixedRecord for Validation {
    const SIZE: usize = VALIDATION_SIZE;

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.error_code);
        writer.write_u8(self.product_type);
        self.terminal.encode(writer);
        writer.write_u24(self.time.offset().field());
        writer.write_u16(self.fare_amount);
        writer.write_u16(self.route_number);
        writer.write_u24(self.service_provider_data);
        writer.write_nibbles(self.status.code(), self.rfu);
    }
}

impl AnchoredRecord for Validation {
    const NAME: &'static str = "validation";

    fn anchor(&self) -> Anchor {
        self.time.anchor()
    }

    fn parse_anchored(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        Self::parse(bytes, effective_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    const DATE: EffectiveDate = EffectiveDate::from_minutes(28_399_680);

    #[test]
    fn test_validation_layout() {
        let mut terminal = Terminal::new();
        terminal.set_acquirer_id(0x0F);
        terminal.set_operator_id(0x0401);
        terminal.set_terminal_id("A1B2C3").unwrap();

        let mut v = Validation::anchored(DATE);
        v.set_error_code(0x01);
        v.set_product_type(0x02);
        v.set_terminal(terminal);
        v.set_date_and_time(DATE.as_millis() + 0x010203 * 60_000).unwrap();
        v.set_fare_amount(0x05DC);
        v.set_route_number(0x0042);
        v.set_service_provider_data(0xC0FFEE).unwrap();
        v.set_txn_status(TxnStatus::Penalty).unwrap();
        v.set_rfu(0x9).unwrap();

        let bytes = v.to_bytes();
        assert_eq!(
            bytes,
            vec![
                0x01, 0x02, 0x0F, 0x04, 0x01, 0xA1, 0xB2, 0xC3, 0x01, 0x02, 0x03, 0x05, 0xDC,
                0x00, 0x42, 0xC0, 0xFF, 0xEE, 0x29
            ]
        );
        assert_eq!(Validation::parse(&bytes, DATE).unwrap(), v);
        assert_eq!(v.service_provider_data_hex(), "C0FFEE");
    }

    #[test]
    fn test_time_requires_anchor() {
        let mut v = Validation::new();
        assert!(matches!(v.set_date_and_time(0), Err(CardError::Precondition(_))));
        assert!(matches!(v.date_and_time(), Err(CardError::Precondition(_))));
        v.set_effective_date(DATE).unwrap();
        v.set_date_and_time(DATE.as_millis()).unwrap();
        assert_eq!(v.date_and_time().unwrap(), DATE.as_millis());
    }

    #[test]
    fn test_reanchoring_rejected() {
        let mut v = Validation::anchored(DATE);
        assert!(matches!(
            v.set_effective_date(EffectiveDate::from_minutes(1)),
            Err(CardError::Consistency(_))
        ));
        assert_eq!(v.effective_date(), Some(DATE));
    }

    #[test]
    fn test_width_checks() {
        let mut v = Validation::new();
        assert!(v.set_service_provider_data(0xFFFFFF).is_ok());
        assert!(v.set_service_provider_data(0x1000000).is_err());
        assert!(v.set_rfu(15).is_ok());
        assert!(v.set_rfu(16).is_err());
        assert_eq!(v.rfu(), 15);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Validation::parse(&[0; 18], DATE),
            Err(CardError::Format(FormatError::Length { expected: 19, .. }))
        ));
    }
}
