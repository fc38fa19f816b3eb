//! Helpers for the device's little-endian wire integers.
//!
//! Every multi-byte integer the device emits (command codes, payload lengths,
//! credential field markers) is little-endian. These helpers keep the
//! conversions and their bounds checks in one place so protocol code never
//! indexes a buffer directly.

/// Serialise a `u16` in the device's byte order.
///
/// # Examples
///
/// ```
/// use mooltilink::byte_order::write_le_u16;
///
/// assert_eq!(write_le_u16(0x1234), [0x34, 0x12]);
/// ```
#[must_use]
pub fn write_le_u16(value: u16) -> [u8; 2] { value.to_le_bytes() }

/// Read a little-endian `u16` starting at `offset` within `bytes`.
///
/// Returns `None` when fewer than two bytes remain at `offset`.
///
/// # Examples
///
/// ```
/// use mooltilink::byte_order::read_le_u16;
///
/// assert_eq!(read_le_u16(&[0x00, 0x34, 0x12], 1), Some(0x1234));
/// assert_eq!(read_le_u16(&[0x34], 0), None);
/// ```
#[must_use]
pub fn read_le_u16(bytes: &[u8], offset: usize) -> Option<u16> {
    let end = offset.checked_add(2)?;
    let pair: [u8; 2] = bytes.get(offset..end)?.try_into().ok()?;
    Some(u16::from_le_bytes(pair))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0x0000)]
    #[case(0x00FF)]
    #[case(0xFF00)]
    #[case(0xFFFF)]
    fn write_then_read_preserves_value(#[case] value: u16) {
        assert_eq!(read_le_u16(&write_le_u16(value), 0), Some(value));
    }

    #[test]
    fn read_rejects_offsets_past_the_end() {
        assert_eq!(read_le_u16(&[1, 2, 3], 2), None);
        assert_eq!(read_le_u16(&[1, 2, 3], usize::MAX), None);
    }
}
