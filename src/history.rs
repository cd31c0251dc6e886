//! Fixed-capacity, newest-first transaction history

use serde::Serialize;

use crate::anchor::{Anchor, EffectiveDate};
use crate::codec::{expect_len, ByteWriter};
use crate::error::{CardError, ConsistencyError, IndexError};
use crate::traits::{AnchoredRecord, FixedRecord};

/// Up to `K` records sharing one effective date, newest at index 0.
///
/// Adding to a full history evicts the oldest record. On the card, unused
/// slots are zero bytes, and parsing stops at the first all-zero slot. A
/// record that genuinely encodes to all zeros is therefore read back as an
/// empty slot.
#[derive(Debug, Clone, Serialize)]
pub struct History<R, const K: usize> {
    entries: Vec<R>,
    anchor: Anchor,
}

impl<R: AnchoredRecord, const K: usize> History<R, K> {
    pub const CAPACITY: usize = K;

    /// Serialized size: every slot, populated or not.
    pub const SIZE: usize = K * R::SIZE;

    pub fn new() -> Self {
        Self { entries: Vec::with_capacity(K), anchor: Anchor::Unanchored }
    }

    pub fn anchored(date: EffectiveDate) -> Self {
        Self { entries: Vec::with_capacity(K), anchor: Anchor::Anchored(date) }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn effective_date(&self) -> Option<EffectiveDate> {
        self.anchor.effective_date()
    }

    /// Bind the history to `date`. Fails if already bound to another date.
    pub fn set_effective_date(&mut self, date: EffectiveDate) -> Result<(), CardError> {
        self.anchor.bind("history", date)?;
        Ok(())
    }

    /// Push `record` to the front, evicting the oldest entry when full.
    pub fn add(&mut self, record: R) -> Result<(), CardError> {
        let date = self
            .anchor
            .effective_date()
            .ok_or(ConsistencyError::UnanchoredOwner { what: "history" })?;
        record.anchor().ensure_matches(R::NAME, date)?;
        if self.entries.len() == K {
            self.entries.pop();
        }
        self.entries.insert(0, record);
        Ok(())
    }

    /// Drop every entry; the effective date is kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[R] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Result<&R, IndexError> {
        self.entries.get(index).ok_or(IndexError::OutOfBounds {
            what: "history entry",
            index,
            len: self.entries.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() == K
    }

    pub fn encode(&self, writer: &mut ByteWriter) {
        for entry in &self.entries {
            entry.encode(writer);
        }
        writer.write_zeros((K - self.entries.len()) * R::SIZE);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(Self::SIZE);
        self.encode(&mut writer);
        writer.into_vec()
    }

    /// Decode `K` slots, stopping at the first slot that is all zero bytes.
    pub fn parse(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
        expect_len("history", bytes, Self::SIZE)?;
        let mut history = Self::anchored(effective_date);
        for (slot, chunk) in bytes.chunks_exact(R::SIZE).enumerate() {
            if chunk.iter().all(|b| *b == 0) {
                tracing::trace!(slot, record = R::NAME, "empty history slot, stopping");
                break;
            }
            history.entries.push(R::parse_anchored(chunk, effective_date)?);
        }
        tracing::debug!(
            record = R::NAME,
            effective_date = effective_date.minutes(),
            entries = history.entries.len(),
            "parsed history"
        );
        Ok(history)
    }
}

impl<R: AnchoredRecord, const K: usize> Default for History<R, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: AnchoredRecord, const K: usize> PartialEq for History<R, K> {
    fn eq(&self, other: &Self) -> bool {
        self.anchor == other.anchor && self.entries == other.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::TransactionTime;
    use crate::codec::ByteReader;
    use crate::error::ConsistencyError;

    /// Two-byte record: a sequence number and a marker, for exercising the buffer.
    #[derive(Debug, Clone, PartialEq)]
    struct Tick {
        time: TransactionTime,
        seq: u8,
    }

    impl Tick {
        fn new(date: EffectiveDate, seq: u8) -> Self {
            Self { time: TransactionTime::anchored(date), seq }
        }
    }

    impl FixedRecord for Tick {
        const SIZE: usize = 2;

        fn encode(&self, writer: &mut ByteWriter) {
            writer.write_u8(self.seq);
            writer.write_u8(0xEE);
        }
    }

    impl AnchoredRecord for Tick {
        const NAME: &'static str = "tick";

        fn anchor(&self) -> Anchor {
            self.time.anchor()
        }

        fn parse_anchored(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError> {
            let mut reader = ByteReader::new(bytes);
            let seq = reader.read_u8()?;
            Ok(Self::new(effective_date, seq))
        }
    }

    const DATE: EffectiveDate = EffectiveDate::from_minutes(1000);

    #[test]
    fn test_push_front_evicts_oldest() {
        let mut history: History<Tick, 3> = History::anchored(DATE);
        for seq in 1..=5 {
            history.add(Tick::new(DATE, seq)).unwrap();
        }
        let seqs: Vec<u8> = history.entries().iter().map(|t| t.seq).collect();
        assert_eq!(seqs, vec![5, 4, 3]);
        assert!(history.is_full());
    }

    #[test]
    fn test_add_requires_anchor() {
        let mut history: History<Tick, 3> = History::new();
        let err = history.add(Tick::new(DATE, 1)).unwrap_err();
        assert!(matches!(
            err,
            CardError::Consistency(ConsistencyError::UnanchoredOwner { what: "history" })
        ));
        assert!(history.is_empty());
    }

    #[test]
    fn test_add_rejects_foreign_anchor() {
        let mut history: History<Tick, 3> = History::anchored(DATE);
        history.add(Tick::new(DATE, 1)).unwrap();
        let err = history.add(Tick::new(EffectiveDate::from_minutes(7), 2)).unwrap_err();
        assert!(matches!(err, CardError::Consistency(ConsistencyError::AnchorMismatch { .. })));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_clear_keeps_anchor() {
        let mut history: History<Tick, 3> = History::anchored(DATE);
        history.add(Tick::new(DATE, 1)).unwrap();
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.effective_date(), Some(DATE));
    }

    #[test]
    fn test_bytes_are_zero_padded() {
        let mut history: History<Tick, 3> = History::anchored(DATE);
        history.add(Tick::new(DATE, 9)).unwrap();
        assert_eq!(history.to_bytes(), vec![9, 0xEE, 0, 0, 0, 0]);
    }

    #[test]
    fn test_parse_stops_at_first_empty_slot() {
        let bytes = [1, 0xEE, 0, 0, 3, 0xEE];
        let history: History<Tick, 3> = History::parse(&bytes, DATE).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history.get(0).unwrap().seq, 1);
        assert!(history.get(1).is_err());
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(History::<Tick, 3>::parse(&[0; 5], DATE).is_err());
    }
}
