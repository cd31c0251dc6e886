//! Small value types shared by both service areas

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bit_field::BitField;
use crate::error::RangeError;

/// Data-format version packed as 3.3.2 bits in the first byte of a general block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Version {
    pub major: BitField<3>,
    pub minor: BitField<3>,
    pub patch: BitField<2>,
}

impl Version {
    /// Create a version, rejecting components wider than their bit fields.
    pub fn new(major: u8, minor: u8, patch: u8) -> Result<Self, RangeError> {
        Ok(Self {
            major: BitField::checked("major version", u32::from(major))?,
            minor: BitField::checked("minor version", u32::from(minor))?,
            patch: BitField::checked("patch version", u32::from(patch))?,
        })
    }

    pub(crate) fn to_byte(self) -> u8 {
        ((self.major.get() << 5) | (self.minor.get() << 2) | self.patch.get()) as u8
    }

    pub(crate) fn from_byte(byte: u8) -> Self {
        let byte = u32::from(byte);
        Self {
            major: BitField::from_masked(byte >> 5),
            minor: BitField::from_masked(byte >> 2),
            patch: BitField::from_masked(byte),
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Card holder's preferred language (5-bit code).
///
/// Serialized as the raw code, so deserialization rejects anything wider
/// than five bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Language {
    #[default]
    English,
    Hindi,
    Bengali,
    Marathi,
    Telugu,
    Tamil,
    Gujarati,
    Urdu,
    Kannada,
    Odia,
    Malayalam,
    Punjabi,
    Sanskrit,
    Assamese,
    Maithili,
    Santali,
    Kashmiri,
    Nepali,
    Sindhi,
    Dogri,
    Konkani,
    Manipuri,
    Bodo,
    /// Codes 23..=31, reserved for future use.
    Reserved(u8),
}

impl Language {
    const NAMED: [Language; 23] = [
        Language::English,
        Language::Hindi,
        Language::Bengali,
        Language::Marathi,
        Language::Telugu,
        Language::Tamil,
        Language::Gujarati,
        Language::Urdu,
        Language::Kannada,
        Language::Odia,
        Language::Malayalam,
        Language::Punjabi,
        Language::Sanskrit,
        Language::Assamese,
        Language::Maithili,
        Language::Santali,
        Language::Kashmiri,
        Language::Nepali,
        Language::Sindhi,
        Language::Dogri,
        Language::Konkani,
        Language::Manipuri,
        Language::Bodo,
    ];

    pub const RESERVED_START: u8 = 23;
    pub const RESERVED_END: u8 = 31;

    /// Decode the low five bits of `bits`. Never fails.
    pub fn from_bits(bits: u8) -> Self {
        let code = bits & 0x1F;
        Self::NAMED
            .get(usize::from(code))
            .copied()
            .unwrap_or(Language::Reserved(code))
    }

    pub fn code(self) -> u8 {
        match self {
            Language::Reserved(code) => code,
            named => Self::NAMED.iter().position(|l| *l == named).unwrap_or_default() as u8,
        }
    }

    /// Check that a `Reserved` code really lies in the reserved range.
    pub(crate) fn validated(self) -> Result<Self, RangeError> {
        match self {
            Language::Reserved(code) if !(Self::RESERVED_START..=Self::RESERVED_END).contains(&code) => {
                Err(RangeError::OutOfBounds {
                    field: "reserved language code",
                    value: u64::from(code),
                    min: u64::from(Self::RESERVED_START),
                    max: u64::from(Self::RESERVED_END),
                })
            }
            other => Ok(other),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Bengali => "Bengali",
            Language::Marathi => "Marathi",
            Language::Telugu => "Telugu",
            Language::Tamil => "Tamil",
            Language::Gujarati => "Gujarati",
            Language::Urdu => "Urdu",
            Language::Kannada => "Kannada",
            Language::Odia => "Odia",
            Language::Malayalam => "Malayalam",
            Language::Punjabi => "Punjabi",
            Language::Sanskrit => "Sanskrit",
            Language::Assamese => "Assamese",
            Language::Maithili => "Maithili",
            Language::Santali => "Santali",
            Language::Kashmiri => "Kashmiri",
            Language::Nepali => "Nepali",
            Language::Sindhi => "Sindhi",
            Language::Dogri => "Dogri",
            Language::Konkani => "Konkani",
            Language::Manipuri => "Manipuri",
            Language::Bodo => "Bodo",
            Language::Reserved(_) => "Reserved",
        }
    }
}

/// Outcome of a tap, stored in the high nibble of a record's last byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TxnStatus {
    Exit,
    #[default]
    Entry,
    Penalty,
    OneTap,
    /// Any other 4-bit code read from a card.
    Unknown(u8),
}

impl TxnStatus {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x0F {
            0x0 => TxnStatus::Exit,
            0x1 => TxnStatus::Entry,
            0x2 => TxnStatus::Penalty,
            0x3 => TxnStatus::OneTap,
            other => TxnStatus::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            TxnStatus::Exit => 0x0,
            TxnStatus::Entry => 0x1,
            TxnStatus::Penalty => 0x2,
            TxnStatus::OneTap => 0x3,
            TxnStatus::Unknown(code) => code,
        }
    }

    /// Reject codes wider than a nibble and fold small `Unknown` codes into
    /// their named variant.
    pub(crate) fn validated(self) -> Result<Self, RangeError> {
        let code = self.code();
        BitField::<4>::checked("transaction status", u32::from(code))?;
        Ok(Self::from_bits(code))
    }

    pub fn name(self) -> &'static str {
        match self {
            TxnStatus::Exit => "EXIT",
            TxnStatus::Entry => "ENTRY",
            TxnStatus::Penalty => "PENALTY",
            TxnStatus::OneTap => "ONETAP",
            TxnStatus::Unknown(_) => "UNKNOWN",
        }
    }
}

impl fmt::Display for TxnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for Language {
    type Error = RangeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        BitField::<5>::checked("language code", u32::from(code))?;
        Ok(Self::from_bits(code))
    }
}

impl From<Language> for u8 {
    fn from(language: Language) -> Self {
        language.code()
    }
}

impl TryFrom<u8> for TxnStatus {
    type Error = RangeError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        BitField::<4>::checked("transaction status", u32::from(code))?;
        Ok(Self::from_bits(code))
    }
}

impl From<TxnStatus> for u8 {
    fn from(status: TxnStatus) -> Self {
        status.code()
    }
}

/// Whether the operator service on the card is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    #[default]
    Inactive,
    Active,
}

impl ServiceStatus {
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            ServiceStatus::Active
        } else {
            ServiceStatus::Inactive
        }
    }

    pub fn is_active(self) -> bool {
        self == ServiceStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_packing() {
        let v = Version::new(1, 2, 3).unwrap();
        assert_eq!(v.to_byte(), 0b001_010_11);
        assert_eq!(Version::from_byte(0b001_010_11), v);
        assert_eq!(v.to_string(), "1.2.3");
    }

    #[test]
    fn test_version_rejects_wide_components() {
        assert!(Version::new(8, 0, 0).is_err());
        assert!(Version::new(0, 8, 0).is_err());
        assert!(Version::new(0, 0, 4).is_err());
        assert!(Version::new(7, 7, 3).is_ok());
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::from_bits(0).code(), 0);
        assert_eq!(Language::from_bits(3), Language::Marathi);
        assert_eq!(Language::Bodo.code(), 22);
        assert_eq!(Language::from_bits(23), Language::Reserved(23));
        assert_eq!(Language::from_bits(31).code(), 31);
    }

    #[test]
    fn test_language_reserved_validation() {
        assert!(Language::Reserved(5).validated().is_err());
        assert!(Language::Reserved(32).validated().is_err());
        assert_eq!(Language::Reserved(30).validated().unwrap(), Language::Reserved(30));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(TxnStatus::default(), TxnStatus::Entry);
        assert_eq!(TxnStatus::from_bits(0x3), TxnStatus::OneTap);
        assert_eq!(TxnStatus::from_bits(0x9), TxnStatus::Unknown(9));
        assert_eq!(TxnStatus::Unknown(2).validated().unwrap(), TxnStatus::Penalty);
        assert!(TxnStatus::Unknown(16).validated().is_err());
    }

    #[test]
    fn test_codes_serialize_as_numbers() {
        assert_eq!(serde_json::to_string(&Language::Hindi).unwrap(), "1");
        assert_eq!(serde_json::to_string(&TxnStatus::Unknown(9)).unwrap(), "9");
        assert_eq!(serde_json::from_str::<Language>("31").unwrap(), Language::Reserved(31));
        assert_eq!(serde_json::from_str::<TxnStatus>("3").unwrap(), TxnStatus::OneTap);
    }

    #[test]
    fn test_wide_codes_rejected_on_deserialize() {
        assert!(serde_json::from_str::<Language>("32").is_err());
        assert!(serde_json::from_str::<Language>("200").is_err());
        assert!(serde_json::from_str::<TxnStatus>("16").is_err());
        assert!(Language::try_from(200).is_err());
        assert!(TxnStatus::try_from(200).is_err());
    }
}
