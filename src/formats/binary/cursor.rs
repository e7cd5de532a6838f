//! Bounds-checked reads over an in-memory catalog.

use super::vlq::read_vlq;
use crate::formats::CatalogError;

/// Forward-only reader; every read checks the remaining length first.
#[derive(Debug)]
pub(crate) struct ByteCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub(crate) const fn new(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    pub(crate) const fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) const fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub(crate) fn u8(&mut self, field: &'static str) -> Result<u8, CatalogError> {
        let [byte] = self.array::<1>(field)?;
        Ok(byte)
    }

    pub(crate) fn u16_le(&mut self, field: &'static str) -> Result<u16, CatalogError> {
        Ok(u16::from_le_bytes(self.array(field)?))
    }

    pub(crate) fn u32_le(&mut self, field: &'static str) -> Result<u32, CatalogError> {
        Ok(u32::from_le_bytes(self.array(field)?))
    }

    pub(crate) fn vlq(&mut self, field: &'static str) -> Result<u32, CatalogError> {
        read_vlq(self.bytes, &mut self.offset, field)
    }

    /// Takes `length` bytes, refusing lengths beyond the end of the buffer.
    pub(crate) fn take(
        &mut self,
        length: usize,
        field: &'static str,
    ) -> Result<&'a [u8], CatalogError> {
        if length > self.remaining() {
            return Err(CatalogError::Truncated { field, offset: self.offset });
        }
        let end = self.offset + length;
        let slice = self
            .bytes
            .get(self.offset..end)
            .ok_or(CatalogError::Truncated { field, offset: self.offset })?;
        self.offset = end;
        Ok(slice)
    }

    /// Takes `length` bytes of UTF-8.
    pub(crate) fn string(
        &mut self,
        length: usize,
        field: &'static str,
    ) -> Result<String, CatalogError> {
        let start = self.offset;
        let bytes = self.take(length, field)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| CatalogError::InvalidUtf8 { field, offset: start })
    }

    fn array<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CatalogError> {
        let start = self.offset;
        let slice = self.take(N, field)?;
        slice.try_into().map_err(|_| CatalogError::Truncated { field, offset: start })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reads_fixed_width_little_endian() {
        let bytes = [0x01, 0x02, 0x00, 0x03, 0x00, 0x00, 0x00];
        let mut cursor = ByteCursor::new(&bytes, 0);

        assert_eq!(cursor.u8("a").unwrap(), 1);
        assert_eq!(cursor.u16_le("b").unwrap(), 2);
        assert_eq!(cursor.u32_le("c").unwrap(), 3);
        assert_eq!(cursor.remaining(), 0);
    }

    #[test]
    fn refuses_lengths_past_end() {
        let bytes = b"abc";
        let mut cursor = ByteCursor::new(bytes, 1);

        assert!(matches!(
            cursor.take(3, "hash"),
            Err(CatalogError::Truncated { field: "hash", offset: 1 })
        ));
        // A failed read does not move the cursor.
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.take(2, "hash").unwrap(), b"bc");
    }

    #[test]
    fn rejects_invalid_utf8() {
        let bytes = [0xFF, 0xFE];
        let mut cursor = ByteCursor::new(&bytes, 0);

        assert!(matches!(
            cursor.string(2, "translation"),
            Err(CatalogError::InvalidUtf8 { field: "translation", offset: 0 })
        ));
    }
}
