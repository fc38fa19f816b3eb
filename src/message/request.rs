//! Outbound requests the engine can issue.

use bytes::{BufMut, BytesMut};

use super::{Command, EncodeError, Message};
use crate::byte_order::write_le_u16;

/// Marker used in a credential request when no login is specified.
pub const NO_LOGIN: u16 = 0xFFFF;

/// A top-level operation sent to the device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Request {
    /// Liveness check.
    Ping,
    /// Ask for the device status, including its lock state.
    Status,
    /// Look up the credential stored for `service`, optionally for `login`.
    GetCredential {
        service: String,
        login: Option<String>,
    },
}

impl Request {
    /// Command code the request is sent with.
    #[must_use]
    pub const fn command(&self) -> Command {
        match self {
            Self::Ping => Command::Ping,
            Self::Status => Command::Status,
            Self::GetCredential { .. } => Command::GetCredential,
        }
    }

    /// Build the message for this request.
    ///
    /// A credential request carries a table of two 16-bit markers (service,
    /// login) followed by NUL-terminated UTF-16LE strings. Markers count
    /// UTF-16 code units from the start of the string area.
    ///
    /// # Examples
    ///
    /// ```
    /// use mooltilink::message::{Command, Request};
    ///
    /// let request = Request::GetCredential {
    ///     service: "a".into(),
    ///     login: Some("b".into()),
    /// };
    /// let message = request.to_message().expect("short strings");
    /// assert_eq!(message.command(), Command::GetCredential);
    /// assert_eq!(
    ///     message.payload().as_ref(),
    ///     &[0x00, 0x00, 0x02, 0x00, b'a', 0x00, 0x00, 0x00, b'b', 0x00, 0x00, 0x00],
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::FieldTooLong`] if a marker would not fit in
    /// 16 bits.
    pub fn to_message(&self) -> Result<Message, EncodeError> {
        match self {
            Self::Ping | Self::Status => Ok(Message::empty(self.command())),
            Self::GetCredential { service, login } => {
                let payload = encode_credential_request(service, login.as_deref())?;
                Ok(Message::new(self.command(), payload))
            }
        }
    }
}

fn encode_credential_request(service: &str, login: Option<&str>) -> Result<BytesMut, EncodeError> {
    let service_units: Vec<u16> = service.encode_utf16().collect();
    let login_units: Option<Vec<u16>> = login.map(|login| login.encode_utf16().collect());

    let login_marker = match login_units {
        Some(_) => {
            let units = service_units.len() + 1;
            u16::try_from(units)
                .ok()
                .filter(|marker| *marker != NO_LOGIN)
                .ok_or(EncodeError::FieldTooLong { units })?
        }
        None => NO_LOGIN,
    };

    let strings_len =
        service_units.len() + 1 + login_units.as_ref().map_or(0, |units| units.len() + 1);
    let mut payload = BytesMut::with_capacity(4 + strings_len * 2);
    payload.put_slice(&write_le_u16(0));
    payload.put_slice(&write_le_u16(login_marker));
    put_utf16_terminated(&mut payload, &service_units);
    if let Some(units) = login_units {
        put_utf16_terminated(&mut payload, &units);
    }
    Ok(payload)
}

fn put_utf16_terminated(buf: &mut BytesMut, units: &[u16]) {
    for unit in units {
        buf.put_u16_le(*unit);
    }
    buf.put_u16_le(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_ping_carry_no_payload() {
        for request in [Request::Status, Request::Ping] {
            let message = request.to_message().expect("empty payload");
            assert_eq!(message.command(), request.command());
            assert!(!message.has_payload());
        }
    }

    #[test]
    fn credential_request_without_login_marks_absence() {
        let request = Request::GetCredential {
            service: "ab".into(),
            login: None,
        };

        let message = request.to_message().expect("short service");

        assert_eq!(
            message.payload().as_ref(),
            &[0x00, 0x00, 0xFF, 0xFF, b'a', 0x00, b'b', 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn credential_request_encodes_non_ascii_as_utf16() {
        let request = Request::GetCredential {
            service: "é".into(),
            login: None,
        };

        let message = request.to_message().expect("short service");

        assert_eq!(&message.payload()[4..6], &[0xE9, 0x00]);
    }

    #[test]
    fn credential_request_rejects_unaddressable_login() {
        let request = Request::GetCredential {
            service: "x".repeat(usize::from(u16::MAX)),
            login: Some("user".into()),
        };

        assert!(matches!(
            request.to_message(),
            Err(EncodeError::FieldTooLong { .. })
        ));
    }
}
