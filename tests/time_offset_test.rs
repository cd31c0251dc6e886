use openloop::*;
use proptest::prelude::*;

const ANCHOR_MINUTES: u64 = 28_399_680;
const ANCHOR: EffectiveDate = EffectiveDate::from_minutes(ANCHOR_MINUTES);
const MINUTE: u64 = 60_000;

fn validation() -> Validation {
    Validation::anchored(ANCHOR)
}

#[test]
fn test_exactly_at_anchor() {
    let mut v = validation();
    v.set_date_and_time(ANCHOR.as_millis()).unwrap();
    assert_eq!(v.time_offset().minutes(), 0);
    assert_eq!(v.date_and_time().unwrap(), ANCHOR.as_millis());
}

#[test]
fn test_one_minute_before_anchor() {
    let mut v = validation();
    assert!(matches!(
        v.set_date_and_time(ANCHOR.as_millis() - MINUTE),
        Err(CardError::Range(RangeError::BeforeEffectiveDate { .. }))
    ));
}

#[test]
fn test_maximum_offset() {
    let mut v = validation();
    let max = u64::from(TimeOffset::MAX_MINUTES);
    v.set_date_and_time(ANCHOR.as_millis() + max * MINUTE).unwrap();
    assert_eq!(v.time_offset().minutes(), 0xFF_FFFF);
    assert!(matches!(
        v.set_date_and_time(ANCHOR.as_millis() + (max + 1) * MINUTE),
        Err(CardError::Range(RangeError::OffsetOverflow { .. }))
    ));
    assert_eq!(v.time_offset().minutes(), 0xFF_FFFF);
}

#[test]
fn test_sub_minute_precision_truncated() {
    let mut entry = LogEntry::anchored(ANCHOR);
    entry.set_date_and_time(ANCHOR.as_millis() + 5 * MINUTE + 59_999).unwrap();
    assert_eq!(entry.time_offset().minutes(), 5);
    assert_eq!(entry.date_and_time().unwrap(), ANCHOR.as_millis() + 5 * MINUTE);
}

#[test]
fn test_time_requires_anchor() {
    let mut record = TransactionRecord::new();
    assert!(matches!(
        record.set_date_and_time(ANCHOR.as_millis()),
        Err(CardError::Precondition(PreconditionError::Unanchored { .. }))
    ));
    assert!(matches!(record.date_and_time(), Err(CardError::Precondition(_))));
}

#[test]
fn test_parsed_record_with_far_future_anchor() {
    let far = EffectiveDate::from_minutes(u64::MAX / 1000);
    let validation = Validation::parse(&[0; 19], far).unwrap();
    assert!(matches!(
        validation.date_and_time(),
        Err(CardError::Range(RangeError::TimestampOverflow { .. }))
    ));
    let entry = LogEntry::parse(&[0xFF; 17], far).unwrap();
    assert!(matches!(entry.date_and_time(), Err(CardError::Range(_))));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Any minute-aligned time within the 24-bit window reads back exactly.
    #[test]
    fn property_offset_round_trip(offset in 0u64..=0xFF_FFFF, extra_ms in 0u64..MINUTE) {
        let mut v = validation();
        let absolute = ANCHOR.as_millis() + offset * MINUTE;
        v.set_date_and_time(absolute + extra_ms).unwrap();
        prop_assert_eq!(u64::from(v.time_offset().minutes()), offset);
        prop_assert_eq!(v.date_and_time().unwrap(), absolute);
    }
}
