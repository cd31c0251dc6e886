//! OSA trip pass: a prepaid bundle of trips between two stations
//!
//! Unlike the transaction records, the expiry and start times here are
//! absolute seconds since the Unix epoch, not offsets from the effective date.
//! Only 24 bits are stored, which limits them to the first ~194 days after
//! 1970.

use serde::{Deserialize, Serialize};

use crate::bit_field::BitField;
use crate::codec::{expect_len, ByteReader, ByteWriter};
use crate::error::{CardError, RangeError};
use crate::layout::osa::TRIP_PASS_SIZE;
use crate::timestamp::MILLISECONDS_IN_SECOND;
use crate::traits::FixedRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TripPass {
    pass_id: u8,
    pass_expiry: BitField<24>,
    priority: u8,
    trips_allotted: u16,
    remaining_trips: u16,
    source_id: u16,
    destination_id: u16,
    flags: u8,
    daily_trip_counter: u8,
    daily_trip_indicator: u16,
    start_time: BitField<24>,
}

fn seconds_field(field: &'static str, ms: u64) -> Result<BitField<24>, RangeError> {
    let seconds = ms / MILLISECONDS_IN_SECOND;
    let value = u32::try_from(seconds).map_err(|_| RangeError::FieldOverflow {
        field,
        value: seconds,
        max: u64::from(BitField::<24>::MAX),
    })?;
    BitField::checked(field, value)
}

impl TripPass {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pass_id(&mut self, id: u8) {
        self.pass_id = id;
    }

    /// Expiry as milliseconds since the epoch, stored as whole seconds.
    pub fn set_pass_expiry(&mut self, ms: u64) -> Result<(), CardError> {
        self.pass_expiry = seconds_field("pass expiry", ms)?;
        Ok(())
    }

    pub fn set_priority(&mut self, priority: u8) {
        self.priority = priority;
    }

    /// Fails if `trips` is below the current remaining count.
    pub fn set_trips_allotted(&mut self, trips: u16) -> Result<(), CardError> {
        if trips < self.remaining_trips {
            return Err(RangeError::OutOfBounds {
                field: "trips allotted",
                value: u64::from(trips),
                min: u64::from(self.remaining_trips),
                max: u64::from(u16::MAX),
            }
            .into());
        }
        self.trips_allotted = trips;
        Ok(())
    }

    /// Fails if `trips` exceeds the allotment, so set the allotment first.
    pub fn set_remaining_trips(&mut self, trips: u16) -> Result<(), CardError> {
        if trips > self.trips_allotted {
            return Err(RangeError::FieldOverflow {
                field: "remaining trips",
                value: u64::from(trips),
                max: u64::from(self.trips_allotted),
            }
            .into());
        }
        self.remaining_trips = trips;
        Ok(())
    }

    pub fn set_source_id(&mut self, id: u16) {
        self.source_id = id;
    }

    pub fn set_destination_id(&mut self, id: u16) {
        self.destination_id = id;
    }

    pub fn set_flags(&mut self, flags: u8) {
        self.flags = flags;
    }

    pub fn set_daily_trip_counter(&mut self, count: u8) {
        self.daily_trip_counter = count;
    }

    pub fn set_daily_trip_indicator(&mut self, indicator: u16) {
        self.daily_trip_indicator = indicator;
    }

    pub fn set_start_date_and_time(&mut self, ms: u64) -> Result<(), CardError> {
        self.start_time = seconds_field("start time", ms)?;
        Ok(())
    }

    pub fn pass_id(&self) -> u8 {
        self.pass_id
    }

    /// Expiry in milliseconds since the epoch.
    pub fn pass_expiry(&self) -> u64 {
        u64::from(self.pass_expiry.get()) * MILLISECONDS_IN_SECOND
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn trips_allotted(&self) -> u16 {
        self.trips_allotted
    }

    pub fn remaining_trips(&self) -> u16 {
        self.remaining_trips
    }

    pub fn source_id(&self) -> u16 {
        self.source_id
    }

    pub fn destination_id(&self) -> u16 {
        self.destination_id
    }

    pub fn flags(&self) -> u8 {
        self.flags
    }

    pub fn daily_trip_counter(&self) -> u8 {
        self.daily_trip_counter
    }

    pub fn daily_trip_indicator(&self) -> u16 {
        self.daily_trip_indicator
    }

    pub fn start_date_and_time(&self) -> u64 {
        u64::from(self.start_time.get()) * MILLISECONDS_IN_SECOND
    }

    /// Decode 20 bytes. The remaining/allotted relation is not checked, so a
    /// block read from a card always decodes.
    pub fn parse(bytes: &[u8]) -> Result<Self, CardError> {
        expect_len("OSA trip pass", bytes, TRIP_PASS_SIZE)?;
        let mut reader = ByteReader::new(bytes);
        Ok(Self {
            pass_id: reader.read_u8()?,
            pass_expiry: reader.read_u24()?,
            priority: reader.read_u8()?,
            trips_allotted: reader.read_u16()?,
            remaining_trips: reader.read_u16()?,
            source_id: reader.read_u16()?,
            destination_id: reader.read_u16()?,
            flags: reader.read_u8()?,
            daily_trip_counter: reader.read_u8()?,
            daily_trip_indicator: reader.read_u16()?,
            start_time: reader.read_u24()?,
        })
    }
}

impl FixedRecord for TripPass {
    const SIZE: usize = TRIP_PASS_SIZE;

    fn encode(&self, writer: &mut ByteWriter) {
        writer.write_u8(self.pass_id);
        writer.write_u24(self.pass_expiry);
        writer.write_u8(self.priority);
        writer.write_u16(self.trips_allotted);
        writer.write_u16(self.remaining_trips);
        writer.write_u16(self.source_id);
        writer.write_u16(self.destination_id);
        writer.write_u8(self.flags);
        writer.write_u8(self.daily_trip_counter);
        writer.write_u16(self.daily_trip_indicator);
        writer.write_u24(self.start_time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_stored_as_seconds() {
        let mut pass = TripPass::new();
        pass.set_pass_expiry(1_000_000_000).unwrap();
        let bytes = pass.to_bytes();
        assert_eq!(&bytes[1..4], &[0x0F, 0x42, 0x40]);
        assert_eq!(TripPass::parse(&bytes).unwrap().pass_expiry(), 1_000_000_000);
    }

    #[test]
    fn test_time_truncated_and_bounded() {
        let mut pass = TripPass::new();
        pass.set_start_date_and_time(1_999).unwrap();
        assert_eq!(pass.start_date_and_time(), 1_000);
        assert!(pass.set_start_date_and_time(0xFFFFFF * 1_000 + 999).is_ok());
        assert!(matches!(
            pass.set_pass_expiry(0x1000000 * 1_000),
            Err(CardError::Range(RangeError::FieldOverflow { .. }))
        ));
        // Present-day timestamps do not fit.
        assert!(pass.set_pass_expiry(1_735_689_600_000).is_err());
        // Wider than u32 seconds.
        assert!(matches!(
            pass.set_start_date_and_time(u64::MAX),
            Err(CardError::Range(RangeError::FieldOverflow { max: 0xFFFFFF, .. }))
        ));
        assert_eq!(pass.start_date_and_time(), 0xFFFFFF * 1_000);
    }

    #[test]
    fn test_remaining_bounded_by_allotted() {
        let mut pass = TripPass::new();
        assert!(pass.set_remaining_trips(1).is_err());
        pass.set_trips_allotted(50).unwrap();
        assert!(pass.set_remaining_trips(51).is_err());
        pass.set_remaining_trips(50).unwrap();
        assert!(pass.set_trips_allotted(49).is_err());
        assert_eq!(pass.trips_allotted(), 50);
        assert_eq!(pass.remaining_trips(), 50);
    }

    #[test]
    fn test_parse_does_not_validate_trips() {
        let mut bytes = TripPass::new().to_bytes();
        bytes[8] = 9;
        let pass = TripPass::parse(&bytes).unwrap();
        assert_eq!(pass.remaining_trips(), 9);
        assert_eq!(pass.trips_allotted(), 0);
    }

    #[test]
    fn test_full_layout() {
        let mut pass = TripPass::new();
        pass.set_pass_id(101);
        pass.set_priority(2);
        pass.set_trips_allotted(40).unwrap();
        pass.set_remaining_trips(35).unwrap();
        pass.set_source_id(0x0102);
        pass.set_destination_id(0x0304);
        pass.set_flags(0x80);
        pass.set_daily_trip_counter(3);
        pass.set_daily_trip_indicator(0xBEEF);
        pass.set_start_date_and_time(0x000100 * 1_000).unwrap();
        assert_eq!(
            pass.to_bytes(),
            vec![
                0x65, 0x00, 0x00, 0x00, 0x02, 0x00, 0x28, 0x00, 0x23, 0x01, 0x02, 0x03, 0x04,
                0x80, 0x03, 0xBE, 0xEF, 0x00, 0x01, 0x00
            ]
        );
    }
}
