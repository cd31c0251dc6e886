//! Acquirer, operator and device identity of the terminal that handled a tap

use serde::{Deserialize, Serialize};

use crate::bit_field::BitField;
use crate::codec::{expect_len, ByteReader, ByteWriter};
use crate::error::{CardError, FormatError};
use crate::layout::{TERMINAL_ID_HEX_LENGTH, TERMINAL_SIZE};
use crate::traits::FixedRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Terminal {
    acquirer_id: u8,
    operator_id: u16,
    terminal_id: BitField<24>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_acquirer_id(&mut self, id: u8) {
        self.acquirer_id = id;
    }

    pub fn set_operator_id(&mut self, id: u16) {
        self.operator_id = id;
    }

    /// Set the 24-bit device id from exactly six hex digits (any case).
    pub fn set_terminal_id(&mut self, hex_id: &str) -> Result<(), CardError> {
        if hex_id.len() != TERMINAL_ID_HEX_LENGTH {
            return Err(FormatError::TextLength {
                what: "terminal id",
                expected: TERMINAL_ID_HEX_LENGTH,
                actual: hex_id.len(),
            }
            .into());
        }
        let mut raw = [0u8; 3];
        hex::decode_to_slice(hex_id, &mut raw).map_err(|_| FormatError::InvalidCharacters {
            what: "terminal id",
            input: hex_id.to_string(),
        })?;
        let value = u32::from_be_bytes([0, raw[0], raw[1], raw[2]]);
        self.terminal_id = BitField::checked("terminal id", value)?;
        Ok(())
    }

    pub fn acquirer_id(&self) -> u8 {
        self.acquirer_id
    }

    pub fn operator_id(&self) -> u16 {
        self.operator_id
    }

    /// Six uppercase hex digits.
    pub fn terminal_id(&self) -> String {
        hex::encode_upper(&self.terminal_id.get().to_be_bytes()[1..])
    }

    pub fn terminal_id_value(&self) -> u32 {
        self.terminal_id.get()
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, CardError> {
        expect_len("terminal", bytes, TERMINAL_SIZE)?;
        let mut reader = ByteReader::new(bytes);
        Self::decode(&mut reader)
    }

    pub(crate) fn decode(reader: &mut ByteReader<'_>) -> Result<Self, CardError> {
        Ok(Self {
            acquirer_id: reader.read_u8()?,
            operator_id: reader.read_u16()?,
            terminal_id: reader.read_u24()?,
        })
    }
}

impl FixedRecord for Terminal {
    const SIZE: usize = TERMINAL_SIZE;

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.acquirer_id);
        writer.write_u16(self.operator_id);
        writer.write_u24(self.terminal_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_layout() {
        let mut t = Terminal::new();
        t.set_acquirer_id(10);
        t.set_operator_id(1000);
        t.set_terminal_id("abcdef").unwrap();
        assert_eq!(t.to_bytes(), vec![0x0A, 0x03, 0xE8, 0xAB, 0xCD, 0xEF]);
        assert_eq!(t.terminal_id(), "ABCDEF");
        assert_eq!(Terminal::parse(&t.to_bytes()).unwrap(), t);
    }

    #[test]
    fn test_terminal_id_rejects_bad_input() {
        let mut t = Terminal::new();
        t.set_terminal_id("A1B2C3").unwrap();
        assert!(matches!(
            t.set_terminal_id("12345G"),
            Err(CardError::Format(FormatError::InvalidCharacters { .. }))
        ));
        assert!(matches!(
            t.set_terminal_id("12345"),
            Err(CardError::Format(FormatError::TextLength { actual: 5, .. }))
        ));
        assert!(t.set_terminal_id("+12345").is_err());
        assert_eq!(t.terminal_id(), "A1B2C3");
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            Terminal::parse(&[0; 7]),
            Err(CardError::Format(FormatError::Length { expected: 6, actual: 7, .. }))
        ));
    }
}
