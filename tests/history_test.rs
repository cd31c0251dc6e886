use openloop::*;
use proptest::prelude::*;

const EFFECTIVE_DATE: EffectiveDate = EffectiveDate::from_minutes(1000);

fn entry_with_sequence(seq: u16) -> LogEntry {
    let mut entry = LogEntry::anchored(EFFECTIVE_DATE);
    entry.set_txn_sequence(seq);
    entry
}

#[test]
fn test_cyclical_buffer() {
    let mut history = CsaHistory::anchored(EFFECTIVE_DATE);
    for seq in 1..=5 {
        history.add(entry_with_sequence(seq)).unwrap();
    }
    assert_eq!(history.get(3).unwrap().txn_sequence(), 2);
    history.add(entry_with_sequence(6)).unwrap();
    assert_eq!(history.get(0).unwrap().txn_sequence(), 6);
    assert_eq!(history.get(3).unwrap().txn_sequence(), 3);
    assert!(matches!(history.get(4), Err(IndexError::OutOfBounds { index: 4, len: 4, .. })));
}

#[test]
fn test_parse_stops_at_first_empty_slot() {
    let mut history = CsaHistory::anchored(EFFECTIVE_DATE);
    for seq in 1..=4 {
        history.add(entry_with_sequence(seq)).unwrap();
    }
    let mut bytes = history.to_bytes();
    assert_eq!(bytes.len(), CsaHistory::SIZE);
    // Blank slot 2, leave slot 3 populated.
    bytes[34..51].fill(0);
    assert!(bytes[51..].iter().any(|b| *b != 0));

    let parsed = CsaHistory::parse(&bytes, EFFECTIVE_DATE).unwrap();
    assert_eq!(parsed.len(), 2);
    let seqs: Vec<u16> = parsed.entries().iter().map(|e| e.txn_sequence()).collect();
    assert_eq!(seqs, vec![4, 3]);
}

#[test]
fn test_osa_history_capacity() {
    let mut history = OsaHistory::anchored(EFFECTIVE_DATE);
    for fare in [10u16, 20, 30] {
        let mut record = TransactionRecord::anchored(EFFECTIVE_DATE);
        record.set_fare(fare);
        history.add(record).unwrap();
    }
    assert_eq!(OsaHistory::CAPACITY, 2);
    let fares: Vec<u16> = history.entries().iter().map(|r| r.fare()).collect();
    assert_eq!(fares, vec![30, 20]);
}

#[test]
fn test_unanchored_history() {
    let mut history = CsaHistory::new();
    assert!(history.effective_date().is_none());
    assert!(matches!(
        history.add(entry_with_sequence(1)),
        Err(CardError::Consistency(ConsistencyError::UnanchoredOwner { .. }))
    ));
    history.set_effective_date(EFFECTIVE_DATE).unwrap();
    history.add(entry_with_sequence(1)).unwrap();
    assert!(matches!(
        history.add(LogEntry::new()),
        Err(CardError::Consistency(ConsistencyError::UnanchoredChild { .. }))
    ));
    assert_eq!(history.len(), 1);
}

#[test]
fn test_clear_keeps_anchor() {
    let mut history = CsaHistory::anchored(EFFECTIVE_DATE);
    history.add(entry_with_sequence(1)).unwrap();
    history.clear();
    assert!(history.is_empty());
    assert_eq!(history.effective_date(), Some(EFFECTIVE_DATE));
    assert!(history.to_bytes().iter().all(|b| *b == 0));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// After any sequence of insertions the history holds the most recent
    /// `CAPACITY` entries, newest first.
    #[test]
    fn property_history_keeps_newest(seqs in prop::collection::vec(any::<u16>(), 0..20)) {
        let mut history = CsaHistory::anchored(EFFECTIVE_DATE);
        for seq in &seqs {
            history.add(entry_with_sequence(*seq)).unwrap();
        }
        let expected: Vec<u16> = seqs.iter().rev().take(CsaHistory::CAPACITY).copied().collect();
        let actual: Vec<u16> = history.entries().iter().map(|e| e.txn_sequence()).collect();
        prop_assert_eq!(actual, expected);
        prop_assert!(history.len() <= CsaHistory::CAPACITY);
    }
}
