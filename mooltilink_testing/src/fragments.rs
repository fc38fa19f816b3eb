//! Builders for device-side notifications.

use bytes::Bytes;
use mooltilink::{
    Fragmenter,
    Message,
    credential::{FIELD_TABLE_LEN, PASSWORD_FIELD, USERNAME_FIELD},
    message::{Command, encode_message},
};

/// Two empty reads: the shortest script that lets a flush converge.
#[must_use]
pub fn flush_reads() -> Vec<Bytes> { vec![Bytes::new(), Bytes::new()] }

/// Fragment a device response with the default fragment size.
///
/// # Panics
///
/// Panics if the message does not fit in sixteen fragments.
#[must_use]
pub fn response(command: Command, payload: &[u8]) -> Vec<Bytes> {
    response_with(&Fragmenter::default(), command, payload)
}

/// Fragment a device response with `fragmenter`.
///
/// # Panics
///
/// Panics if the message cannot be encoded or fragmented.
#[must_use]
pub fn response_with(fragmenter: &Fragmenter, command: Command, payload: &[u8]) -> Vec<Bytes> {
    let message = Message::new(command, Bytes::copy_from_slice(payload));
    let body = encode_message(&message).expect("response encodes");
    fragmenter
        .fragment(body)
        .expect("response fits")
        .into_iter()
        .collect()
}

/// A `PLEASE_RETRY` response.
#[must_use]
pub fn retry_signal() -> Vec<Bytes> { response(Command::PleaseRetry, &[]) }

/// Encode `text` as NUL-terminated UTF-16LE.
#[must_use]
pub fn utf16z(text: &str) -> Vec<u8> {
    text.encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

/// Build a credential payload whose field table points at `username` and
/// `password`.
///
/// # Panics
///
/// Panics if the username is too long for a 16-bit marker.
#[must_use]
pub fn credential_payload(username: &str, password: &str) -> Vec<u8> {
    let login = utf16z(username);
    let password_marker = u16::try_from(login.len() / 2).expect("username fits a marker");
    let mut payload = vec![0; FIELD_TABLE_LEN];
    payload[USERNAME_FIELD..USERNAME_FIELD + 2].copy_from_slice(&0u16.to_le_bytes());
    payload[PASSWORD_FIELD..PASSWORD_FIELD + 2].copy_from_slice(&password_marker.to_le_bytes());
    payload.extend(login);
    payload.extend(utf16z(password));
    payload
}
