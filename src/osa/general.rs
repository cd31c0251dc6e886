//! OSA general block: version, holder phone number, language and service status

use serde::{Deserialize, Serialize};

use crate::bit_field::BitField;
use crate::codec::{expect_len, ByteReader, ByteWriter};
use crate::error::{CardError, FormatError};
use crate::layout::osa::{GENERAL_SIZE, PHONE_NUMBER_BYTES, PHONE_NUMBER_DIGITS};
use crate::traits::FixedRecord;
use crate::types::{Language, ServiceStatus, Version};

/// Byte 0: version as in the CSA. Bytes 1..6: phone number, packed BCD.
/// Byte 6: language(7..3) service status(2) rfu(1..0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct General {
    version: Version,
    phone_number: [u8; PHONE_NUMBER_BYTES],
    language: Language,
    service_status: ServiceStatus,
    rfu: BitField<2>,
}

impl General {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_version(&mut self, major: u8, minor: u8, patch: u8) -> Result<(), CardError> {
        self.version = Version::new(major, minor, patch)?;
        Ok(())
    }

    /// Store a ten-digit phone number as five bytes of BCD, high nibble first.
    pub fn set_phone_number(&mut self, number: &str) -> Result<(), CardError> {
        if number.len() != PHONE_NUMBER_DIGITS {
            return Err(FormatError::TextLength {
                what: "phone number",
                expected: PHONE_NUMBER_DIGITS,
                actual: number.len(),
            }
            .into());
        }
        if !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FormatError::InvalidCharacters {
                what: "phone number",
                input: number.to_string(),
            }
            .into());
        }
        let digits = number.as_bytes();
        for (byte, pair) in self.phone_number.iter_mut().zip(digits.chunks_exact(2)) {
            *byte = ((pair[0] - b'0') << 4) | (pair[1] - b'0');
        }
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), CardError> {
        self.language = language.validated()?;
        Ok(())
    }

    pub fn set_service_status(&mut self, status: ServiceStatus) {
        self.service_status = status;
    }

    pub fn set_rfu(&mut self, value: u8) -> Result<(), CardError> {
        self.rfu = BitField::checked("OSA general rfu", u32::from(value))?;
        Ok(())
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn version_string(&self) -> String {
        self.version.to_string()
    }

    /// The decoded phone number, or an empty string if none is stored.
    ///
    /// Nibbles above 9 (never written by [`General::set_phone_number`]) are
    /// rendered as uppercase hex digits.
    pub fn phone_number(&self) -> String {
        if self.phone_number.iter().all(|b| *b == 0) {
            return String::new();
        }
        hex::encode_upper(self.phone_number)
    }

    pub fn phone_number_bcd(&self) -> [u8; PHONE_NUMBER_BYTES] {
        self.phone_number
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn service_status(&self) -> ServiceStatus {
        self.service_status
    }

    pub fn rfu(&self) -> u8 {
        self.rfu.get() as u8
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, CardError> {
        expect_len("OSA general", bytes, GENERAL_SIZE)?;
        let mut reader = ByteReader::new(bytes);
        let version = Version::from_byte(reader.read_u8()?);
        let phone_number = reader.read_array::<PHONE_NUMBER_BYTES>()?;
        let last = reader.read_u8()?;
        Ok(Self {
            version,
            phone_number,
            language: Language::from_bits(last >> 3),
            service_status: ServiceStatus::from_bit(last & 0x04 != 0),
            rfu: BitField::from_masked(u32::from(last)),
        })
    }
}

impl FixedRecord for General {
    const SIZE: usize = GENERAL_SIZE;

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.version.to_byte());
        writer.write_bytes(&self.phone_number);
        let status_bit = u8::from(self.service_status.is_active()) << 2;
        writer.write_u8((self.language.code() << 3) | status_bit | self.rfu.get() as u8);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bcd_packing() {
        let mut g = General::new();
        g.set_phone_number("1234567890").unwrap();
        let bytes = g.to_bytes();
        assert_eq!(bytes[1], 0x12);
        assert_eq!(bytes[2], 0x34);
        assert_eq!(bytes[5], 0x90);
        assert_eq!(General::parse(&bytes).unwrap().phone_number(), "1234567890");
    }

    #[test]
    fn test_empty_phone_number() {
        assert_eq!(General::new().phone_number(), "");
    }

    #[test]
    fn test_phone_number_validation() {
        let mut g = General::new();
        assert!(matches!(
            g.set_phone_number("123"),
            Err(CardError::Format(FormatError::TextLength { .. }))
        ));
        assert!(matches!(
            g.set_phone_number("12345678a0"),
            Err(CardError::Format(FormatError::InvalidCharacters { .. }))
        ));
        assert_eq!(g.phone_number(), "");
    }

    #[test]
    fn test_last_byte_packing() {
        let mut g = General::new();
        g.set_version(2, 0, 1).unwrap();
        g.set_language(Language::Hindi).unwrap();
        g.set_service_status(ServiceStatus::Active);
        g.set_rfu(3).unwrap();
        let bytes = g.to_bytes();
        assert_eq!(bytes[0], 0b0100_0001);
        assert_eq!(bytes[6], 0b0000_1111);
        let parsed = General::parse(&bytes).unwrap();
        assert_eq!(parsed, g);
        assert!(parsed.service_status().is_active());
        assert!(g.set_rfu(4).is_err());
    }
}
