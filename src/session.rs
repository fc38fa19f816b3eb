//! Protocol state owned by the engine for one link session.
//!
//! [`ProtocolSession`] bundles the reassembly session, the flush tracker and
//! the retry counter so they are reset together and passed by reference
//! through the dispatch path instead of living as loose mutable fields.

use bytes::Bytes;

use crate::{
    flush::{FlushCoordinator, FlushOutcome},
    fragment::{FragmentOutcome, PacketReassembler},
    retry::RetryPolicy,
};

/// All mutable protocol state for the current link session.
#[derive(Debug, Default)]
pub struct ProtocolSession {
    reassembler: PacketReassembler,
    flush: FlushCoordinator,
    retry: RetryPolicy,
}

impl ProtocolSession {
    /// Create an idle session allowing `max_retries` retry signals per
    /// operation.
    #[must_use]
    pub fn new(max_retries: u8) -> Self {
        Self {
            reassembler: PacketReassembler::new(),
            flush: FlushCoordinator::new(),
            retry: RetryPolicy::new(max_retries),
        }
    }

    /// Borrow the reassembler.
    #[must_use]
    pub fn reassembler(&self) -> &PacketReassembler { &self.reassembler }

    /// Borrow the flush tracker.
    #[must_use]
    pub fn flush(&self) -> &FlushCoordinator { &self.flush }

    /// Borrow the retry counter.
    #[must_use]
    pub fn retry(&self) -> &RetryPolicy { &self.retry }

    /// Mutably borrow the retry counter.
    pub fn retry_mut(&mut self) -> &mut RetryPolicy { &mut self.retry }

    /// Clear reassembly, flush and retry state.
    pub fn reset(&mut self) {
        self.reassembler.reset();
        self.flush.clear();
        self.retry.reset();
    }

    /// Clear reassembly state only, preserving the retry counter.
    pub fn soft_reset(&mut self) { self.reassembler.reset(); }

    /// Start draining stale notifications.
    pub fn begin_flush(&mut self) { self.flush.begin(); }

    /// Feed a read taken during a flush.
    ///
    /// A converged flush soft-resets the reassembly session so the response
    /// that follows starts from sequence id zero.
    pub fn on_flush_fragment(&mut self, bytes: Bytes) -> FlushOutcome {
        let outcome = self.flush.on_flush_fragment(bytes);
        if outcome == FlushOutcome::FlushComplete {
            self.soft_reset();
        }
        outcome
    }

    /// Feed a response fragment.
    ///
    /// A desync abandons the whole operation, so it also clears the retry
    /// counter.
    pub fn on_fragment(&mut self, bytes: Bytes) -> FragmentOutcome {
        let outcome = self.reassembler.on_fragment(bytes);
        if matches!(outcome, FragmentOutcome::Desync(_)) {
            self.reset();
        }
        outcome
    }
}
