//! Boundary towards the physical link.
//!
//! Connection establishment, service discovery and subscription plumbing live
//! outside this crate. The engine only needs a way to submit writes and read
//! requests ([`Link`]) and an ordered stream of [`LinkEvent`]s reporting what
//! the link observed.

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

/// Outbound half of the link.
///
/// Both methods only submit work; outcomes arrive later as [`LinkEvent`]s.
/// Every [`Link::request_read`] must eventually produce exactly one
/// [`LinkEvent::Notification`]. A notification that arrives while the engine
/// waits for a write ack is kept and consumed in place of the next read.
#[async_trait]
pub trait Link: Send {
    /// Submit one fragment to the write endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the fragment could not be submitted at all.
    async fn write(&mut self, fragment: Bytes) -> io::Result<()>;

    /// Ask the read endpoint for its next value.
    ///
    /// # Errors
    ///
    /// Returns an error if the read could not be submitted.
    async fn request_read(&mut self) -> io::Result<()>;
}

/// Something the link observed, delivered in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkEvent {
    /// Both endpoints are ready.
    Connected,
    /// The link went away.
    Disconnected,
    /// A value arrived on the read endpoint; empty means "no data".
    Notification(Bytes),
    /// The device acknowledged, or rejected, the last write.
    WriteAck(Result<(), String>),
}

/// Sender used by link implementations to report [`LinkEvent`]s.
pub type LinkEventSender = mpsc::Sender<LinkEvent>;

/// Receiver the engine consumes [`LinkEvent`]s from.
pub type LinkEventReceiver = mpsc::Receiver<LinkEvent>;

/// Create a bounded event channel between a link and the engine.
#[must_use]
pub fn event_channel(capacity: usize) -> (LinkEventSender, LinkEventReceiver) {
    mpsc::channel(capacity.max(1))
}
