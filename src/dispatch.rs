//! Response dispatch for decoded device messages.
//!
//! [`ResponseDispatcher`] decides what a completed response means for the
//! current operation: report it to the listener, ask for the operation to be
//! restarted after a retry signal, or give up once the retry budget is spent.

use tracing::{debug, error, warn};

use crate::{
    credential::Credentials,
    listener::ListenerHandle,
    message::{Command, Message},
    session::ProtocolSession,
};

/// Bit of the status byte that is set while the device is unlocked.
pub const STATUS_UNLOCKED_BIT: u8 = 0x04;

/// Message surfaced when a credential payload cannot be decoded.
pub const CREDENTIAL_DECODE_ERROR: &str = "Error decoding credentials";

/// Message surfaced when the device keeps asking for retries.
pub const DEVICE_UNREADABLE_ERROR: &str = "Could not read from device";

/// What the engine must do after a response was dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The response was handled and the operation is finished.
    Handled(Command),
    /// The device asked for a retry; restart the flush and resend.
    Retry {
        /// Retry number just consumed, starting at one.
        attempt: u8,
    },
    /// The device asked for a retry once too often.
    RetryExhausted,
}

/// Interpret the device status byte.
///
/// Returns `None` for an empty payload.
#[must_use]
pub fn parse_locked(payload: &[u8]) -> Option<bool> {
    payload
        .first()
        .map(|status| status & STATUS_UNLOCKED_BIT == 0)
}

/// Routes decoded messages to the listener and the retry policy.
#[derive(Debug)]
pub struct ResponseDispatcher<'a> {
    listener: &'a ListenerHandle,
}

impl<'a> ResponseDispatcher<'a> {
    /// Create a dispatcher reporting to `listener`.
    #[must_use]
    pub const fn new(listener: &'a ListenerHandle) -> Self { Self { listener } }

    /// Act on `message`, updating `session` as the command requires.
    pub fn dispatch(&self, session: &mut ProtocolSession, message: &Message) -> DispatchOutcome {
        let command = message.command();
        match command {
            Command::Status => {
                let locked = parse_locked(message.payload()).unwrap_or_else(|| {
                    debug!("status response carried no payload; reporting unlocked");
                    false
                });
                debug!(locked, "device status received");
                self.listener.locked_status_changed(locked);
                session.soft_reset();
                DispatchOutcome::Handled(command)
            }
            Command::GetCredential => {
                if message.has_payload() {
                    self.report_credentials(message.payload());
                } else {
                    debug!("credential response carried no payload");
                }
                session.reset();
                DispatchOutcome::Handled(command)
            }
            Command::PleaseRetry => {
                if session.retry_mut().try_retry() {
                    let attempt = session.retry().attempts();
                    debug!(attempt, "device asked for a retry");
                    DispatchOutcome::Retry { attempt }
                } else {
                    session.reset();
                    error!("retry budget exhausted");
                    self.listener.on_error(DEVICE_UNREADABLE_ERROR);
                    DispatchOutcome::RetryExhausted
                }
            }
            Command::Ping | Command::Other(_) => {
                debug!(code = command.code(), "ignoring response");
                session.reset();
                DispatchOutcome::Handled(command)
            }
        }
    }

    fn report_credentials(&self, payload: &[u8]) {
        match Credentials::parse(payload) {
            Some(credentials) => {
                self.listener
                    .credentials_received(&credentials.username, &credentials.password);
            }
            None => {
                warn!(len = payload.len(), "credential payload could not be decoded");
                self.listener.on_error(CREDENTIAL_DECODE_ERROR);
            }
        }
    }
}
