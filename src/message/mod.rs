//! Logical messages exchanged with the device.
//!
//! A [`Message`] pairs a [`Command`] with an optional payload. Inbound
//! messages are produced by a [`MessageDecoder`] once reassembly completes;
//! outbound ones are built from a [`Request`] and serialised with
//! [`encode_message`] before fragmentation.

pub mod codec;
pub mod request;

use bytes::Bytes;

pub use codec::{DeviceCodec, EncodeError, MESSAGE_HEADER_LEN, MessageDecoder, encode_message};
pub use request::Request;

/// Command codes understood by the protocol engine.
///
/// Codes the engine does not act on are preserved in [`Command::Other`] so
/// they can still be logged and reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Liveness check; echoed by the device.
    Ping,
    /// The device could not service the request yet and asks for a retry.
    PleaseRetry,
    /// Credential lookup request and its response.
    GetCredential,
    /// Device status, including the lock state.
    Status,
    /// Any command code the engine treats as a no-op.
    Other(u16),
}

impl Command {
    /// Wire code for [`Command::Ping`].
    pub const PING: u16 = 0x0001;
    /// Wire code for [`Command::PleaseRetry`].
    pub const PLEASE_RETRY: u16 = 0x0002;
    /// Wire code for [`Command::GetCredential`].
    pub const GET_CREDENTIAL: u16 = 0x0007;
    /// Wire code for [`Command::Status`].
    pub const STATUS: u16 = 0x0010;

    /// Map a wire code onto a command.
    ///
    /// # Examples
    ///
    /// ```
    /// use mooltilink::message::Command;
    ///
    /// assert_eq!(Command::from_code(0x0002), Command::PleaseRetry);
    /// assert_eq!(Command::from_code(0x0042), Command::Other(0x0042));
    /// ```
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            Self::PING => Self::Ping,
            Self::PLEASE_RETRY => Self::PleaseRetry,
            Self::GET_CREDENTIAL => Self::GetCredential,
            Self::STATUS => Self::Status,
            other => Self::Other(other),
        }
    }

    /// Return the wire code for this command.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::Ping => Self::PING,
            Self::PleaseRetry => Self::PLEASE_RETRY,
            Self::GetCredential => Self::GET_CREDENTIAL,
            Self::Status => Self::STATUS,
            Self::Other(code) => code,
        }
    }

    /// Returns the command name as a static string for metrics and logging.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ping => "ping",
            Self::PleaseRetry => "please_retry",
            Self::GetCredential => "get_credential",
            Self::Status => "status",
            Self::Other(_) => "other",
        }
    }
}

impl From<u16> for Command {
    fn from(code: u16) -> Self { Self::from_code(code) }
}

impl From<Command> for u16 {
    fn from(command: Command) -> Self { command.code() }
}

/// A decoded command with its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    command: Command,
    payload: Bytes,
}

impl Message {
    /// Construct a message from its parts.
    #[must_use]
    pub fn new(command: Command, payload: impl Into<Bytes>) -> Self {
        Self {
            command,
            payload: payload.into(),
        }
    }

    /// Construct a message that carries no payload.
    #[must_use]
    pub fn empty(command: Command) -> Self { Self::new(command, Bytes::new()) }

    /// Return the command code.
    #[must_use]
    pub const fn command(&self) -> Command { self.command }

    /// Borrow the payload bytes; empty when the message carries none.
    #[must_use]
    pub fn payload(&self) -> &Bytes { &self.payload }

    /// Whether the message carries any payload bytes.
    #[must_use]
    pub fn has_payload(&self) -> bool { !self.payload.is_empty() }
}
