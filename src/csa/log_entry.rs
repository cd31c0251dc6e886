//! CSA history log entry

use serde::{Deserialize, Serialize};

use crate::anchor::{Anchor, EffectiveDate, TimeOffset, TransactionTime};
use crate::bit_field::BitField;
use crate::codec::{expect_len, ByteReader, ByteWriter};
use crate::error::CardError;
use crate::layout::csa::LOG_ENTRY_SIZE;
use crate::terminal::Terminal;
use crate::traits::{AnchoredRecord, FixedRecord};
use crate::types::TxnStatus;

/// Low nibble of byte 15, always written as ones.
const BALANCE_PADDING: u8 = 0x0F;

/// | bytes  | field                                  |
/// |--------|----------------------------------------|
/// | 0..6   | terminal                               |
/// | 6..9   | time offset (minutes, 24 bit)          |
/// | 9..11  | transaction amount                     |
/// | 11..13 | transaction sequence number            |
/// | 13..16 | card balance (20 bit) + 4 padding bits |
/// | 16     | status(7..4) rfu(3..0)                 |
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    terminal: Terminal,
    time: TransactionTime,
    txn_amount: u16,
    txn_sequence: u16,
    card_balance: BitField<20>,
    status: TxnStatus,
    rfu: BitField<4>,
}

impl LogEntry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anchored(date: EffectiveDate) -> Self {
        Self { time: TransactionTime::anchored(date), ..Self::default() }
    }

    pub fn set_effective_date(&mut self, date: EffectiveDate) -> Result<(), CardError> {
        self.time.set_effective_date("log entry", date)?;
        Ok(())
    }

    pub fn set_date_and_time(&mut self, absolute_ms: u64) -> Result<(), CardError> {
        self.time.set(absolute_ms)
    }

    pub fn set_terminal(&mut self, terminal: Terminal) {
        self.terminal = terminal;
    }

    pub fn set_txn_amount(&mut self, amount: u16) {
        self.txn_amount = amount;
    }

    pub fn set_txn_sequence(&mut self, sequence: u16) {
        self.txn_sequence = sequence;
    }

    pub fn set_card_balance(&mut self, balance: u32) -> Result<(), CardError> {
        self.card_balance = BitField::checked("card balance", balance)?;
        Ok(())
    }

    pub fn set_txn_status(&mut self, status: TxnStatus) -> Result<(), CardError> {
        self.status = status.validated()?;
        Ok(())
    }

    pub fn set_rfu(&mut self, value: u8) -> Result<(), CardError> {
        self.rfu = BitField::checked("log entry rfu", u32::from(value))?;
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

    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    pub fn txn_amount(&self) -> u16 {
        self.txn_amount
    }

    pub fn txn_sequence(&self) -> u16 {
        self.txn_sequence
    }

    pub fn card_balance(&self) -> u32 {
        self.card_balance.get()
    }

    pub fn txn_status(&self) -> TxnStatus {
        self.status
    }

    pub fn rfu(&self) -> u8 {
        self.rfu.get() as u8
    }

    pub fn parse(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        expect_len("CSA log entry", bytes, LOG_ENTRY_SIZE)?;
        let mut reader = ByteReader::new(bytes);
        let terminal = Terminal::decode(&mut reader)?;
        let time = TransactionTime::decoded(effective_date, reader.read_u24()?);
        let txn_amount = reader.read_u16()?;
        let txn_sequence = reader.read_u16()?;
        let [b0, b1, b2] = reader.read_array::<3>()?;
        // The padding nibble in b2 is not checked.
        let balance = (u32::from(b0) << 12) | (u32::from(b1) << 4) | u32::from(b2 >> 4);
        let (status, rfu) = reader.read_nibbles()?;
        Ok(Self {
            terminal,
            time,
            txn_amount,
            txn_sequence,
            card_balance: BitField::from_masked(balance),
            status: TxnStatus::from_bits(status),
            rfu,
        })
    }
}

impl FixedRecord for LogEntry {
    const SIZE: usize = LOG_ENTRY_SIZE;

    fn encode(&self, writer: &mut ByteWriter) {
        self.terminal.encode(writer);
        writer.write_u24(self.time.offset().field());
        writer.write_u16(self.txn_amount);
        writer.write_u16(self.txn_sequence);
        let balance = self.card_balance.get();
        writer.write_u8((balance >> 12) as u8);
        writer.write_u8((balance >> 4) as u8);
        writer.write_u8((((balance & 0x0F) as u8) << 4) | BALANCE_PADDING);
        writer.write_nibbles(self.status.code(), self.rfu);
    }
}

impl AnchoredRecord for LogEntry {
    const NAME: &'static str = "log entry";

    fn anchor(&self) -> Anchor {
        self.time.anchor()
    }

    fn parse_anchored(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        Self::parse(bytes, effective_date)
    }
}
