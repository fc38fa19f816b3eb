//! In-memory [`Link`] answering reads from a script.

use std::{
    collections::VecDeque,
    io,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use bytes::Bytes;
use mooltilink::link::{Link, LinkEvent, LinkEventReceiver, LinkEventSender, event_channel};

const EVENT_CAPACITY: usize = 16;

/// What the link does once its scripted reads run out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum Exhausted {
    /// Answer with an empty notification.
    #[default]
    Empty,
    /// Report a disconnect.
    Disconnect,
    /// Never answer.
    Silent,
}

/// Shared view of what a [`ScriptedLink`] was asked to do.
#[derive(Clone, Debug, Default)]
pub struct LinkTap {
    writes: Arc<Mutex<Vec<Bytes>>>,
    read_requests: Arc<AtomicUsize>,
}

impl LinkTap {
    /// Fragments written so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the write log mutex is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<Bytes> { self.writes.lock().expect("write log poisoned").clone() }

    /// Number of read requests received.
    #[must_use]
    pub fn read_requests(&self) -> usize { self.read_requests.load(Ordering::SeqCst) }
}

/// A [`Link`] whose reads return queued notifications.
///
/// Every write is recorded and acknowledged with the next scripted ack
/// (success by default). Every read request pops the next scripted
/// notification and delivers it on the event channel.
#[derive(Debug)]
pub struct ScriptedLink {
    events: LinkEventSender,
    reads: VecDeque<Bytes>,
    acks: VecDeque<Result<(), String>>,
    write_failure: Option<io::ErrorKind>,
    exhausted: Exhausted,
    tap: LinkTap,
}

impl ScriptedLink {
    /// Create a link and the event receiver an engine should consume.
    #[must_use]
    pub fn new() -> (Self, LinkEventReceiver) {
        let (events, rx) = event_channel(EVENT_CAPACITY);
        let link = Self {
            events,
            reads: VecDeque::new(),
            acks: VecDeque::new(),
            write_failure: None,
            exhausted: Exhausted::default(),
            tap: LinkTap::default(),
        };
        (link, rx)
    }

    /// Queue notifications answered to successive read requests.
    #[must_use]
    pub fn with_reads<I, B>(mut self, reads: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        self.reads.extend(reads.into_iter().map(Into::into));
        self
    }

    /// Queue the acknowledgement for the next unacknowledged write.
    #[must_use]
    pub fn with_write_ack(mut self, ack: Result<(), String>) -> Self {
        self.acks.push_back(ack);
        self
    }

    /// Fail every write submission with `kind`.
    #[must_use]
    pub fn with_failing_writes(mut self, kind: io::ErrorKind) -> Self {
        self.write_failure = Some(kind);
        self
    }

    /// Report a disconnect once the scripted reads are used up.
    #[must_use]
    pub fn disconnect_when_exhausted(mut self) -> Self {
        self.exhausted = Exhausted::Disconnect;
        self
    }

    /// Stop answering once the scripted reads are used up.
    #[must_use]
    pub fn silent_when_exhausted(mut self) -> Self {
        self.exhausted = Exhausted::Silent;
        self
    }

    /// Handle for inspecting the link after it moved into an engine.
    #[must_use]
    pub fn tap(&self) -> LinkTap { self.tap.clone() }

    /// Deliver an unsolicited event.
    ///
    /// # Panics
    ///
    /// Panics if the event receiver was dropped.
    pub async fn announce(&self, event: LinkEvent) {
        self.events.send(event).await.expect("event receiver dropped");
    }

    async fn emit(&self, event: LinkEvent) -> io::Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

#[async_trait]
impl Link for ScriptedLink {
    async fn write(&mut self, fragment: Bytes) -> io::Result<()> {
        if let Some(kind) = self.write_failure {
            return Err(io::Error::from(kind));
        }
        self.tap
            .writes
            .lock()
            .expect("write log poisoned")
            .push(fragment);
        let ack = self.acks.pop_front().unwrap_or(Ok(()));
        self.emit(LinkEvent::WriteAck(ack)).await
    }

    async fn request_read(&mut self) -> io::Result<()> {
        self.tap.read_requests.fetch_add(1, Ordering::SeqCst);
        match (self.reads.pop_front(), self.exhausted) {
            (Some(bytes), _) => self.emit(LinkEvent::Notification(bytes)).await,
            (None, Exhausted::Empty) => self.emit(LinkEvent::Notification(Bytes::new())).await,
            (None, Exhausted::Disconnect) => self.emit(LinkEvent::Disconnected).await,
            (None, Exhausted::Silent) => Ok(()),
        }
    }
}
