//! Core traits implemented by the fixed-layout records

use crate::anchor::{Anchor, EffectiveDate};
use crate::codec::ByteWriter;
use crate::error::CardError;

/// A record with a fixed serialized size.
pub trait FixedRecord {
    /// Exact number of bytes produced by [`FixedRecord::to_bytes`].
    const SIZE: usize;

    /// Append this record's bytes to `writer`.
    fn encode(&self, writer: &mut ByteWriter);

    fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(Self::SIZE);
        self.encode(&mut writer);
        debug_assert_eq!(writer.len(), Self::SIZE);
        writer.into_vec()
    }
}

/// A record whose timestamp is stored relative to a card effective date.
///
/// Histories are generic over this trait so the same push-front buffer backs
/// both the CSA log and the OSA transaction history.
pub trait AnchoredRecord: FixedRecord + Clone + PartialEq + Sized {
    /// Name used in error messages.
    const NAME: &'static str;

    fn anchor(&self) -> Anchor;

    /// Decode exactly [`FixedRecord::SIZE`] bytes, binding the result to `effective_date`.
    fn parse_anchored(bytes: &[u8], effective_date: EffectiveDate) -> Result<Self, CardError>;
}
