//! Extraction of UTF-16 string fields from credential payloads.
//!
//! A credential payload opens with a table of 16-bit little-endian markers,
//! one per field, followed by NUL-terminated UTF-16LE strings. Each marker
//! counts UTF-16 code units from the start of the string area, which begins
//! after the fixed eight-byte marker table.

use crate::byte_order::read_le_u16;

/// Size of the marker table that precedes the string area.
pub const FIELD_TABLE_LEN: usize = 8;

/// Byte offset of the login marker within the table.
pub const USERNAME_FIELD: usize = 0;

/// Byte offset of the password marker within the table.
///
/// The device record places two further fields (description and a third,
/// free-form field) between login and password, hence six rather than two.
pub const PASSWORD_FIELD: usize = 6;

/// A username/password pair decoded from a credential payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login stored on the device.
    pub username: String,
    /// Password stored on the device.
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Decode the login and password fields from `payload`.
    ///
    /// Returns `None` unless both fields decode.
    #[must_use]
    pub fn parse(payload: &[u8]) -> Option<Self> {
        Some(Self {
            username: parse_field(payload, USERNAME_FIELD)?,
            password: parse_field(payload, PASSWORD_FIELD)?,
        })
    }
}

/// Decode the string whose marker sits at byte `field_index` of `payload`.
///
/// Offsets are relative to the start of `payload`, so a payload sliced out of
/// a larger message decodes the same as a standalone buffer. Every failure
/// (marker out of range, data offset past the end, missing terminator,
/// invalid UTF-16) yields `None`.
///
/// # Examples
///
/// ```
/// use mooltilink::credential::parse_field;
///
/// let mut payload = vec![0x02, 0x00, 0, 0, 0, 0, 0, 0];
/// payload.extend_from_slice(&[b'x', 0, 0, 0]);
/// payload.extend_from_slice(&[b'a', 0, b'b', 0, 0, 0]);
/// assert_eq!(parse_field(&payload, 0).as_deref(), Some("ab"));
/// assert_eq!(parse_field(&payload, 64), None);
/// ```
#[must_use]
pub fn parse_field(payload: &[u8], field_index: usize) -> Option<String> {
    let marker = usize::from(read_le_u16(payload, field_index)?);
    let data_offset = marker.checked_mul(2)?.checked_add(FIELD_TABLE_LEN)?;
    let data = payload.get(data_offset..)?;
    let units = utf16_units_until_nul(data)?;
    String::from_utf16(&units).ok()
}

/// Collect UTF-16LE code units up to, but excluding, the first NUL unit.
///
/// Returns `None` when the data ends before a terminator is found.
fn utf16_units_until_nul(data: &[u8]) -> Option<Vec<u16>> {
    let mut units = Vec::new();
    for pair in data.chunks_exact(2) {
        let unit = u16::from_le_bytes([pair[0], pair[1]]);
        if unit == 0 {
            return Some(units);
        }
        units.push(unit);
    }
    None
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    fn utf16z(text: &str) -> Vec<u8> {
        text.encode_utf16()
            .chain(std::iter::once(0))
            .flat_map(u16::to_le_bytes)
            .collect()
    }

    /// Builds a payload with four markers and the strings laid out in order.
    fn record(fields: [&str; 4]) -> Vec<u8> {
        let mut table = Vec::with_capacity(FIELD_TABLE_LEN);
        let mut strings = Vec::new();
        for field in fields {
            let marker = u16::try_from(strings.len() / 2).expect("test strings are short");
            table.extend_from_slice(&marker.to_le_bytes());
            strings.extend(utf16z(field));
        }
        table.extend(strings);
        table
    }

    #[allow(
        unused_braces,
        reason = "rustc false positive for single line rstest fixtures"
    )]
    #[fixture]
    fn credential_record() -> Vec<u8> { record(["alice", "mail", "", "s3cret"]) }

    #[test]
    fn marker_two_points_at_offset_twelve() {
        let mut payload = vec![0x02, 0x00, 0, 0, 0, 0, 0, 0, 0xAA, 0xAA, 0xAA, 0xAA];
        payload.extend(utf16z("ab"));

        assert_eq!(parse_field(&payload, 0).as_deref(), Some("ab"));
    }

    #[rstest]
    #[case::username(USERNAME_FIELD, "alice")]
    #[case::description(2, "mail")]
    #[case::third(4, "")]
    #[case::password(PASSWORD_FIELD, "s3cret")]
    fn reads_each_field_of_a_record(
        credential_record: Vec<u8>,
        #[case] index: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(parse_field(&credential_record, index).as_deref(), Some(expected));
    }

    #[rstest]
    fn credentials_parse_login_and_password(credential_record: Vec<u8>) {
        let credentials = Credentials::parse(&credential_record).expect("complete record");

        assert_eq!(credentials.username, "alice");
        assert_eq!(credentials.password, "s3cret");
        assert!(!format!("{credentials:?}").contains("s3cret"));
    }

    #[rstest]
    fn offsets_are_relative_to_the_payload_slice(credential_record: Vec<u8>) {
        let mut framed = vec![0xDE, 0xAD, 0xBE, 0xEF];
        framed.extend_from_slice(&credential_record);

        assert_eq!(parse_field(&framed[4..], USERNAME_FIELD).as_deref(), Some("alice"));
    }

    #[rstest]
    #[case::index_past_end(64)]
    #[case::index_on_last_byte(7)]
    fn out_of_range_index_is_absent(#[case] index: usize) {
        assert_eq!(parse_field(&[0x00; 8], index), None);
    }

    #[test]
    fn marker_past_the_end_is_absent() {
        let payload = [0xFF, 0xFF, 0, 0, 0, 0, 0, 0, b'a', 0, 0, 0];
        assert_eq!(parse_field(&payload, 0), None);
    }

    #[test]
    fn missing_terminator_is_absent() {
        let payload = [0x00, 0x00, 0, 0, 0, 0, 0, 0, b'a', 0, b'b', 0];
        assert_eq!(parse_field(&payload, 0), None);
    }

    #[test]
    fn unpaired_surrogate_is_absent() {
        let payload = [0x00, 0x00, 0, 0, 0, 0, 0, 0, 0x00, 0xD8, 0, 0];
        assert_eq!(parse_field(&payload, 0), None);
    }

    #[test]
    fn truncated_record_fails_credential_parse() {
        let mut payload = record(["alice", "", "", "pw"]);
        payload.truncate(payload.len() - 2);

        assert_eq!(Credentials::parse(&payload), None);
    }
}
