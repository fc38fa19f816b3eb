//! Error types for engine operations.

use std::{io, time::Duration};

use thiserror::Error;

use super::ConfigError;
use crate::{fragment::FragmentationError, message::EncodeError};

/// Errors that abort an engine operation.
///
/// Desyncs, malformed responses and exhausted retries are not errors: they
/// end the operation normally and are reported through
/// [`CycleOutcome`](crate::engine::CycleOutcome).
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configuration cannot drive an engine.
    #[error("invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
    /// The request could not be serialised.
    #[error("failed to encode request: {0}")]
    Encode(#[from] EncodeError),
    /// The request does not fit in one fragmented message.
    #[error("failed to fragment request: {0}")]
    Fragmentation(#[from] FragmentationError),
    /// Submitting a write to the link failed.
    #[error("link write failed: {0}")]
    Write(#[source] io::Error),
    /// The device acknowledged a write with an error.
    #[error("device rejected write: {0}")]
    WriteRejected(String),
    /// Submitting a read request to the link failed.
    #[error("link read request failed: {0}")]
    Read(#[source] io::Error),
    /// No link event arrived in time.
    #[error("no response from device within {0:?}")]
    Timeout(Duration),
    /// The link disconnected or its event stream ended.
    #[error("link closed")]
    LinkClosed,
    /// Stale notifications kept changing beyond the flush budget.
    #[error("flush did not converge after {reads} reads")]
    FlushExhausted { reads: usize },
}

impl EngineError {
    /// Short label for metrics and logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Encode(_) => "encode",
            Self::Fragmentation(_) => "fragmentation",
            Self::Write(_) => "write",
            Self::WriteRejected(_) => "write_rejected",
            Self::Read(_) => "read",
            Self::Timeout(_) => "timeout",
            Self::LinkClosed => "link_closed",
            Self::FlushExhausted { .. } => "flush_exhausted",
        }
    }
}
