//! Wire codec for logical messages.
//!
//! Once the fragment headers are stripped, a message body is laid out as
//! `command: u16 LE | length: u16 LE | payload[length]`. Anything after the
//! declared payload is link padding and is ignored.

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

use super::{Command, Message};
use crate::{
    byte_order::{read_le_u16, write_le_u16},
    fragment::ReassembledMessage,
};

/// Bytes occupied by the command code and payload length.
pub const MESSAGE_HEADER_LEN: usize = 4;

/// Turns a completed reassembly into a typed [`Message`].
///
/// Implementations must never panic: malformed or truncated input yields
/// `None`, which the engine treats like transport noise.
pub trait MessageDecoder: Send + Sync {
    /// Decode the reassembled fragments into a message.
    fn decode(&self, message: &ReassembledMessage) -> Option<Message>;
}

/// Decoder for the device's native message layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeviceCodec;

impl DeviceCodec {
    /// Decode a header-stripped message body.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use mooltilink::message::{Command, DeviceCodec};
    ///
    /// let body = Bytes::from_static(&[0x10, 0x00, 0x01, 0x00, 0x04, 0xFF]);
    /// let message = DeviceCodec::decode_body(&body).expect("well formed");
    /// assert_eq!(message.command(), Command::Status);
    /// assert_eq!(message.payload().as_ref(), &[0x04]);
    ///
    /// assert!(DeviceCodec::decode_body(&Bytes::from_static(&[0x10, 0x00, 0x05])).is_none());
    /// ```
    #[must_use]
    pub fn decode_body(body: &Bytes) -> Option<Message> {
        let code = read_le_u16(body, 0)?;
        let len = usize::from(read_le_u16(body, 2)?);
        let end = MESSAGE_HEADER_LEN.checked_add(len)?;
        if end > body.len() {
            return None;
        }
        Some(Message::new(
            Command::from_code(code),
            body.slice(MESSAGE_HEADER_LEN..end),
        ))
    }
}

impl MessageDecoder for DeviceCodec {
    fn decode(&self, message: &ReassembledMessage) -> Option<Message> {
        Self::decode_body(&message.body())
    }
}

/// Errors produced while serialising outbound messages.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The payload length does not fit the 16-bit length field.
    #[error("payload of {len} bytes exceeds the {limit}-byte length field")]
    PayloadTooLarge { len: usize, limit: usize },
    /// A string field is too long to be addressed by a 16-bit marker.
    #[error("string field of {units} UTF-16 code units cannot be addressed")]
    FieldTooLong { units: usize },
}

/// Serialise `message` into its header-stripped wire body.
///
/// # Errors
///
/// Returns [`EncodeError::PayloadTooLarge`] if the payload length does not
/// fit in a `u16`.
pub fn encode_message(message: &Message) -> Result<Bytes, EncodeError> {
    let payload = message.payload();
    let len = u16::try_from(payload.len()).map_err(|_| EncodeError::PayloadTooLarge {
        len: payload.len(),
        limit: usize::from(u16::MAX),
    })?;
    let mut body = BytesMut::with_capacity(MESSAGE_HEADER_LEN + payload.len());
    body.put_slice(&write_le_u16(message.command().code()));
    body.put_slice(&write_le_u16(len));
    body.put_slice(payload);
    Ok(body.freeze())
}
