//! Inbound helper that stitches notification fragments back into messages.
//!
//! [`PacketReassembler`] mirrors the outbound
//! [`Fragmenter`](crate::fragment::Fragmenter). Only one message can be in
//! flight on the link, so the reassembler tracks a single
//! [`ReassemblySession`]. Fragments must arrive with contiguous sequence ids
//! starting at zero; any gap abandons the session and reports a desync so the
//! caller can return the link to idle.

use bytes::{Bytes, BytesMut};

use super::{DesyncError, FragmentHeader, HEADER_LEN, SequenceId};

/// Container for the ordered fragments of a fully re-assembled message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReassembledMessage {
    fragments: Vec<Bytes>,
}

impl ReassembledMessage {
    /// Construct a new [`ReassembledMessage`] from ordered fragments.
    #[must_use]
    pub fn new(fragments: Vec<Bytes>) -> Self { Self { fragments } }

    /// Borrow the raw fragments, headers included, in sequence order.
    #[must_use]
    pub fn fragments(&self) -> &[Bytes] { self.fragments.as_slice() }

    /// Number of fragments that formed the message.
    #[must_use]
    pub fn fragment_count(&self) -> usize { self.fragments.len() }

    /// Concatenate the fragment bodies, dropping each two-byte header.
    #[must_use]
    pub fn body(&self) -> Bytes {
        let capacity = self
            .fragments
            .iter()
            .map(|fragment| fragment.len().saturating_sub(HEADER_LEN))
            .sum();
        let mut body = BytesMut::with_capacity(capacity);
        for fragment in &self.fragments {
            if let Some(tail) = fragment.get(HEADER_LEN..) {
                body.extend_from_slice(tail);
            }
        }
        body.freeze()
    }
}

/// Result of feeding one notification into a [`PacketReassembler`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// The notification was too short to carry a header. No state changed.
    NoData,
    /// The fragment was accepted and more fragments are expected.
    Incomplete {
        /// Sequence id of the fragment just stored.
        received: SequenceId,
        /// Total fragments announced by the first fragment.
        expected_count: usize,
    },
    /// The fragment completed the logical message.
    Complete(ReassembledMessage),
    /// The fragment did not fit the session, which has been discarded.
    Desync(DesyncError),
}

/// Transient state for the message currently being reassembled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReassemblySession {
    expected_seq_id: SequenceId,
    expected_count: Option<usize>,
    buffer: Option<Vec<Bytes>>,
}

impl ReassemblySession {
    /// Sequence id the next fragment must carry.
    #[must_use]
    pub const fn expected_seq_id(&self) -> SequenceId { self.expected_seq_id }

    /// Total fragment count, known once the first fragment has arrived.
    #[must_use]
    pub const fn expected_count(&self) -> Option<usize> { self.expected_count }

    /// Number of fragments stored so far.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer
            .as_ref()
            .map_or(0, |slots| slots.iter().filter(|slot| !slot.is_empty()).count())
    }

    /// Whether the session holds no partial message.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.expected_count.is_none() && self.expected_seq_id.is_first()
    }
}

/// Single-session fragment re-assembler.
#[derive(Debug, Default)]
pub struct PacketReassembler {
    session: ReassemblySession,
}

impl PacketReassembler {
    /// Create an idle re-assembler.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Borrow the in-flight session state.
    #[must_use]
    pub fn session(&self) -> &ReassemblySession { &self.session }

    /// Discard any partially assembled message.
    pub fn reset(&mut self) { self.session = ReassemblySession::default(); }

    /// Process one inbound notification.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use mooltilink::fragment::{FragmentOutcome, PacketReassembler};
    ///
    /// let mut reassembler = PacketReassembler::new();
    /// let first = reassembler.on_fragment(Bytes::from_static(&[0x00, 0x01, 0xAA]));
    /// assert!(matches!(first, FragmentOutcome::Incomplete { .. }));
    /// let last = reassembler.on_fragment(Bytes::from_static(&[0x00, 0x10, 0xBB]));
    /// let FragmentOutcome::Complete(message) = last else {
    ///     panic!("second fragment completes the message");
    /// };
    /// assert_eq!(message.body().as_ref(), &[0xAA, 0xBB]);
    /// ```
    pub fn on_fragment(&mut self, bytes: Bytes) -> FragmentOutcome {
        let Some(header) = FragmentHeader::parse(&bytes) else {
            return FragmentOutcome::NoData;
        };
        let found = header.sequence();
        let expected = self.session.expected_seq_id;

        if found != expected {
            let error = if self.session.expected_count.is_none() {
                DesyncError::MissingFirstFragment { found }
            } else {
                DesyncError::SequenceMismatch { expected, found }
            };
            self.reset();
            return FragmentOutcome::Desync(error);
        }

        if let (None, Some(count)) = (self.session.expected_count, header.announced_count()) {
            self.session.expected_count = Some(count);
            self.session.buffer = Some(vec![Bytes::new(); count]);
        }

        let (Some(count), Some(slots)) = (self.session.expected_count, self.session.buffer.as_mut())
        else {
            self.reset();
            return FragmentOutcome::Desync(DesyncError::MissingFirstFragment { found });
        };
        let Some(slot) = slots.get_mut(found.as_index()) else {
            self.reset();
            return FragmentOutcome::Desync(DesyncError::SequenceMismatch { expected, found });
        };
        *slot = bytes;

        if found.as_index() + 1 == count {
            let fragments = self.session.buffer.take().unwrap_or_default();
            self.reset();
            return FragmentOutcome::Complete(ReassembledMessage::new(fragments));
        }

        match found.checked_increment() {
            Some(next) => {
                self.session.expected_seq_id = next;
                FragmentOutcome::Incomplete {
                    received: found,
                    expected_count: count,
                }
            }
            None => {
                self.reset();
                FragmentOutcome::Desync(DesyncError::SequenceMismatch { expected, found })
            }
        }
    }
}
