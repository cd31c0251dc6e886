//! Big-endian byte writer and reader shared by every record codec

use crate::bit_field::BitField;
use crate::error::FormatError;

/// Reject a buffer whose length is not exactly `expected`.
pub(crate) fn expect_len(what: &'static str, bytes: &[u8], expected: usize) -> Result<(), FormatError> {
    if bytes.len() != expected {
        return Err(FormatError::Length { what, expected, actual: bytes.len() });
    }
    Ok(())
}

/// Append-only writer producing a fixed-layout record.
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    /// Write the low 24 bits of a field, most significant byte first.
    pub fn write_u24(&mut self, value: BitField<24>) {
        self.buf.extend_from_slice(&value.get().to_be_bytes()[1..]);
    }

    /// Write a status/rfu style byte: `high` in bits 7..4, `low` in bits 3..0.
    pub fn write_nibbles(&mut self, high: u8, low: BitField<4>) {
        self.buf.push(((high & 0x0F) << 4) | low.get() as u8);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_zeros(&mut self, count: usize) {
        self.buf.resize(self.buf.len() + count, 0x00);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a record that has already passed its length check.
#[derive(Debug)]
pub struct ByteReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    pub fn take(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        let remaining = self.bytes.len() - self.offset;
        if len > remaining {
            return Err(FormatError::OutOfBounds { offset: self.offset, wanted: len, remaining });
        }
        let out = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        let chunk = self.take(2)?;
        Ok(u16::from_be_bytes([chunk[0], chunk[1]]))
    }

    pub fn read_u24(&mut self) -> Result<BitField<24>, FormatError> {
        let chunk = self.take(3)?;
        Ok(BitField::from_masked(u32::from_be_bytes([0, chunk[0], chunk[1], chunk[2]])))
    }

    /// Split one byte into its high and low nibbles.
    pub fn read_nibbles(&mut self) -> Result<(u8, BitField<4>), FormatError> {
        let byte = self.read_u8()?;
        Ok((byte >> 4, BitField::from_masked(u32::from(byte))))
    }

    pub fn read_array<const LEN: usize>(&mut self) -> Result<[u8; LEN], FormatError> {
        let mut out = [0u8; LEN];
        out.copy_from_slice(self.take(LEN)?);
        Ok(out)
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }
}
