//! Unsigned LEB128 ("VLQ") integers.
//!
//! Seven payload bits per byte, least significant group first; bit 7 set
//! means another byte follows.

use crate::formats::CatalogError;

/// Payload bits carried by one byte.
const PAYLOAD_MASK: u8 = 0x7F;
/// Set on every byte except the last.
const CONTINUATION_BIT: u8 = 0x80;
/// Shift of the last payload group that still fits in 32 bits.
const MAX_SHIFT: u32 = 28;

/// Appends `value` to `out`.
pub(crate) fn write_vlq(out: &mut Vec<u8>, mut value: u32) {
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let byte = (value as u8) & PAYLOAD_MASK;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | CONTINUATION_BIT);
    }
}

/// Reads a VLQ starting at `*offset`, advancing it past the encoding.
///
/// Fails on a missing byte or once more than 32 bits would be accumulated,
/// so malformed input can neither loop nor overflow.
pub(crate) fn read_vlq(
    bytes: &[u8],
    offset: &mut usize,
    field: &'static str,
) -> Result<u32, CatalogError> {
    let start = *offset;
    let mut result: u64 = 0;
    let mut shift: u32 = 0;

    loop {
        if shift > MAX_SHIFT {
            return Err(CatalogError::VlqOverflow { offset: start });
        }
        let Some(&byte) = bytes.get(*offset) else {
            return Err(CatalogError::Truncated { field, offset: *offset });
        };
        *offset += 1;

        result |= u64::from(byte & PAYLOAD_MASK) << shift;
        if byte & CONTINUATION_BIT == 0 {
            break;
        }
        shift += 7;
    }

    u32::try_from(result).map_err(|_| CatalogError::VlqOverflow { offset: start })
}
