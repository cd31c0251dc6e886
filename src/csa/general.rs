//! CSA general block: data-format version and holder language

use serde::{Deserialize, Serialize};

use crate::bit_field::BitField;
use crate::codec::{expect_len, ByteReader, ByteWriter};
use crate::error::CardError;
use crate::layout::csa::GENERAL_SIZE;
use crate::traits::FixedRecord;
use crate::types::{Language, Version};

/// Byte 0: major(7..5) minor(4..2) patch(1..0). Byte 1: language(7..3) rfu(2..0).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct General {
    version: Version,
    language: Language,
    rfu: BitField<3>,
}

impl General {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_version(&mut self, major: u8, minor: u8, patch: u8) -> Result<(), CardError> {
        self.version = Version::new(major, minor, patch)?;
        Ok(())
    }

    pub fn set_language(&mut self, language: Language) -> Result<(), CardError> {
        self.language = language.validated()?;
        Ok(())
    }

    pub fn set_rfu(&mut self, value: u8) -> Result<(), CardError> {
        self.rfu = BitField::checked("general rfu", u32::from(value))?;
        Ok(())
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn version_string(&self) -> String {
        self.version.to_string()
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn rfu(&self) -> u8 {
        self.rfu.get() as u8
    }

    pub fn parse(bytes: &[u8]) -> Result<Self, CardError> {
        expect_len("CSA general", bytes, GENERAL_SIZE)?;
        let mut reader = ByteReader::new(bytes);
        let version = Version::from_byte(reader.read_u8()?);
        let second = reader.read_u8()?;
        Ok(Self {
            version,
            language: Language::from_bits(second >> 3),
            rfu: BitField::from_masked(u32::from(second)),
        })
    }
}

impl FixedRecord for General {
    const SIZE: usize = GENERAL_SIZE;

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.version.to_byte());
        writer.write_u8((self.language.code() << 3) | self.rfu.get() as u8);
    }
}
