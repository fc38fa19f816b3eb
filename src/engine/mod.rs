//! Async driver for the device protocol.
//!
//! The [`Engine`] owns the [`ProtocolSession`] and a [`Link`], and runs every
//! operation as the same sequence: flush stale notifications, write the
//! request fragments, read fragments until a response completes, then
//! dispatch it. A retry signal from the device restarts the sequence with the
//! same [`Continuation`], carrying the gate permit into the restarted flush.
//!
//! Every read and write is serialised through the [`TransportGate`]. Permits
//! are released by value or on drop, so error paths cannot leak the gate.

mod config;
mod continuation;
mod error;

use std::{collections::VecDeque, sync::Arc, time::Duration};

use bytes::Bytes;
pub use config::{ConfigError, DEFAULT_MAX_FLUSH_READS, DEFAULT_RESPONSE_TIMEOUT, EngineConfig};
pub use continuation::Continuation;
pub use error::EngineError;
use tracing::{debug, error, trace, warn};

use crate::{
    dispatch::{DispatchOutcome, ResponseDispatcher},
    flush::FlushOutcome,
    fragment::{FragmentOutcome, Fragmenter},
    gate::{GatePermit, TransportGate},
    link::{Link, LinkEvent, LinkEventReceiver},
    listener::ListenerHandle,
    message::{Command, DeviceCodec, Message, MessageDecoder, Request},
    metrics::{self, Direction},
    session::ProtocolSession,
};

/// How an operation ended when no [`EngineError`] occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A response was handed to the dispatcher.
    Dispatched(Command),
    /// Fragments arrived out of order; the message was abandoned.
    Desync,
    /// A message completed but could not be decoded.
    Malformed,
    /// The device had nothing to say.
    NoData,
    /// The device kept asking for retries; the listener was told.
    RetryExhausted,
}

/// Result of reading one response.
enum Response {
    Complete(Message, GatePermit),
    Aborted(CycleOutcome),
}

/// Drives a [`Link`] through the device protocol.
pub struct Engine<K> {
    link: K,
    events: LinkEventReceiver,
    /// Notifications that arrived while a write ack was awaited.
    pending: VecDeque<Bytes>,
    gate: TransportGate,
    session: ProtocolSession,
    fragmenter: Fragmenter,
    decoder: Arc<dyn MessageDecoder>,
    listener: ListenerHandle,
    config: EngineConfig,
}

impl<K> std::fmt::Debug for Engine<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("session", &self.session)
            .field("listener", &self.listener)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<K: Link> Engine<K> {
    /// Create an engine over `link`, consuming its `events`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Config`] if `config` fails validation.
    pub fn new(
        link: K,
        events: LinkEventReceiver,
        listener: ListenerHandle,
        config: EngineConfig,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let fragmenter = Fragmenter::new(config.fragment_size)?;
        Ok(Self {
            link,
            events,
            pending: VecDeque::new(),
            gate: TransportGate::new(),
            session: ProtocolSession::new(config.max_retries),
            fragmenter,
            decoder: Arc::new(DeviceCodec),
            listener,
            config,
        })
    }

    /// Replace the response decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: impl MessageDecoder + 'static) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Share an existing gate with other writers on the same link.
    #[must_use]
    pub fn with_gate(mut self, gate: TransportGate) -> Self {
        self.gate = gate;
        self
    }

    /// Gate serialising access to the link.
    #[must_use]
    pub fn gate(&self) -> &TransportGate { &self.gate }

    /// Current protocol state.
    #[must_use]
    pub fn session(&self) -> &ProtocolSession { &self.session }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig { &self.config }

    /// Borrow the link.
    #[must_use]
    pub fn link(&self) -> &K { &self.link }

    /// Wait until the link reports it is connected, then notify the listener.
    ///
    /// Other events seen while waiting are discarded. No timeout applies.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LinkClosed`] if the link disconnects or the
    /// event stream ends first.
    pub async fn wait_connected(&mut self) -> Result<(), EngineError> {
        loop {
            match self.events.recv().await {
                Some(LinkEvent::Connected) => {
                    debug!("link connected");
                    self.listener.connected();
                    return Ok(());
                }
                Some(LinkEvent::Disconnected) | None => return Err(EngineError::LinkClosed),
                Some(other) => debug!(event = ?other, "discarding event before connection"),
            }
        }
    }

    /// Ask the device for its lock state.
    ///
    /// # Errors
    ///
    /// See [`Engine::execute`].
    pub async fn request_status(&mut self) -> Result<CycleOutcome, EngineError> {
        self.execute(Request::Status).await
    }

    /// Ask the device for the credentials stored for `service`.
    ///
    /// # Errors
    ///
    /// See [`Engine::execute`].
    pub async fn get_credential(
        &mut self,
        service: impl Into<String>,
        login: Option<String>,
    ) -> Result<CycleOutcome, EngineError> {
        self.execute(Request::GetCredential {
            service: service.into(),
            login,
        })
        .await
    }

    /// Check that the device answers.
    ///
    /// # Errors
    ///
    /// See [`Engine::execute`].
    pub async fn ping(&mut self) -> Result<CycleOutcome, EngineError> {
        self.execute(Request::Ping).await
    }

    /// Run `request` through flush, write, read and dispatch.
    ///
    /// The session is fully reset before the request starts and after any
    /// failure, so the retry budget applies per operation.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the request cannot be encoded or the
    /// link fails, times out or closes. Errors are also reported to the
    /// listener through `on_error`.
    pub async fn execute(&mut self, request: Request) -> Result<CycleOutcome, EngineError> {
        self.session.reset();
        self.pending.clear();
        let result = match Continuation::for_request(&request, &self.fragmenter) {
            Ok(continuation) => self.run(&continuation).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            self.session.reset();
            self.pending.clear();
            error!(error = %e, command = request.command().as_str(), "operation failed");
            metrics::inc_errors(e.kind());
            self.listener.on_error(&e.to_string());
        }
        result
    }

    async fn run(&mut self, continuation: &Continuation) -> Result<CycleOutcome, EngineError> {
        let mut carried = None;
        loop {
            self.flush(carried.take()).await?;
            self.send(continuation).await?;
            let (message, permit) = match self.read_response().await? {
                Response::Complete(message, permit) => (message, permit),
                Response::Aborted(outcome) => return Ok(outcome),
            };
            metrics::inc_responses(message.command());
            match ResponseDispatcher::new(&self.listener).dispatch(&mut self.session, &message) {
                DispatchOutcome::Handled(command) => {
                    permit.release();
                    return Ok(CycleOutcome::Dispatched(command));
                }
                DispatchOutcome::Retry { attempt } => {
                    debug!(
                        attempt,
                        command = continuation.command().as_str(),
                        "restarting flush before resending"
                    );
                    metrics::inc_retries();
                    carried = Some(permit);
                }
                DispatchOutcome::RetryExhausted => {
                    permit.release();
                    return Ok(CycleOutcome::RetryExhausted);
                }
            }
        }
    }

    /// Drain stale notifications until two consecutive reads match.
    ///
    /// `carried` is the permit held over from a retry signal; it covers the
    /// first read of the restarted flush.
    async fn flush(&mut self, mut carried: Option<GatePermit>) -> Result<(), EngineError> {
        self.session.begin_flush();
        loop {
            let reads = self.session.flush().reads();
            if reads >= self.config.max_flush_reads {
                return Err(EngineError::FlushExhausted { reads });
            }
            let permit = match carried.take() {
                Some(permit) => permit,
                None => self.gate.acquire().await,
            };
            let bytes = self.read_notification().await?;
            let outcome = self.session.on_flush_fragment(bytes);
            permit.release();
            if outcome == FlushOutcome::FlushComplete {
                debug!(reads = reads + 1, "flush complete");
                metrics::inc_flushes();
                return Ok(());
            }
        }
    }

    async fn send(&mut self, continuation: &Continuation) -> Result<(), EngineError> {
        for fragment in continuation.fragments().fragments() {
            let permit = self.gate.acquire().await;
            trace!(fragment = ?fragment, "writing fragment");
            self.link
                .write(fragment.clone())
                .await
                .map_err(EngineError::Write)?;
            self.await_write_ack().await?;
            metrics::inc_fragments(Direction::Outbound);
            permit.release();
        }
        Ok(())
    }

    async fn read_response(&mut self) -> Result<Response, EngineError> {
        loop {
            let permit = self.gate.acquire().await;
            let bytes = self.read_notification().await?;
            match self.session.on_fragment(bytes) {
                FragmentOutcome::NoData => {
                    debug!("device returned no data");
                    permit.release();
                    return Ok(Response::Aborted(CycleOutcome::NoData));
                }
                FragmentOutcome::Incomplete {
                    received,
                    expected_count,
                } => {
                    trace!(%received, expected_count, "awaiting further fragments");
                    permit.release();
                }
                FragmentOutcome::Desync(reason) => {
                    warn!(%reason, "fragment sequence broken; abandoning message");
                    metrics::inc_desyncs();
                    permit.release();
                    return Ok(Response::Aborted(CycleOutcome::Desync));
                }
                FragmentOutcome::Complete(reassembled) => {
                    let Some(message) = self.decoder.decode(&reassembled) else {
                        warn!(
                            fragments = reassembled.fragment_count(),
                            "completed message could not be decoded"
                        );
                        self.session.reset();
                        permit.release();
                        return Ok(Response::Aborted(CycleOutcome::Malformed));
                    };
                    debug!(
                        command = message.command().as_str(),
                        len = message.payload().len(),
                        "response received"
                    );
                    return Ok(Response::Complete(message, permit));
                }
            }
        }
    }

    /// Take the next notification, requesting a read only when none was
    /// pushed ahead of it.
    async fn read_notification(&mut self) -> Result<Bytes, EngineError> {
        if let Some(bytes) = self.pending.pop_front() {
            trace!(fragment = ?bytes, "taking notification pushed before write ack");
            return Ok(bytes);
        }
        self.link.request_read().await.map_err(EngineError::Read)?;
        loop {
            match self.next_event().await? {
                LinkEvent::Notification(bytes) => {
                    trace!(fragment = ?bytes, "notification received");
                    metrics::inc_fragments(Direction::Inbound);
                    return Ok(bytes);
                }
                other => debug!(event = ?other, "ignoring event while awaiting notification"),
            }
        }
    }

    async fn await_write_ack(&mut self) -> Result<(), EngineError> {
        loop {
            match self.next_event().await? {
                LinkEvent::WriteAck(Ok(())) => return Ok(()),
                LinkEvent::WriteAck(Err(reason)) => {
                    warn!(%reason, "device rejected write");
                    return Err(EngineError::WriteRejected(reason));
                }
                LinkEvent::Notification(bytes) => {
                    debug!(len = bytes.len(), "buffering notification received before write ack");
                    metrics::inc_fragments(Direction::Inbound);
                    self.pending.push_back(bytes);
                }
                other => debug!(event = ?other, "ignoring event while awaiting write ack"),
            }
        }
    }

    async fn next_event(&mut self) -> Result<LinkEvent, EngineError> {
        let event = match self.config.response_timeout {
            Some(limit) => recv_within(&mut self.events, limit).await?,
            None => self.events.recv().await,
        };
        match event {
            Some(LinkEvent::Disconnected) | None => Err(EngineError::LinkClosed),
            Some(event) => Ok(event),
        }
    }
}

async fn recv_within(
    events: &mut LinkEventReceiver,
    limit: Duration,
) -> Result<Option<LinkEvent>, EngineError> {
    tokio::time::timeout(limit, events.recv())
        .await
        .map_err(|_| EngineError::Timeout(limit))
}
