//! Error types emitted by the fragmentation layer.
//!
//! Inbound desynchronisation is a recoverable condition and is reported as a
//! value inside [`FragmentOutcome`](crate::fragment::FragmentOutcome); the
//! types here describe why a message was abandoned or could not be split.

use thiserror::Error;

use super::SequenceId;

/// Reasons a reassembly session was discarded.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum DesyncError {
    /// A fragment arrived with an unexpected sequence id.
    #[error("fragment sequence mismatch: expected {expected}, found {found}")]
    SequenceMismatch {
        expected: SequenceId,
        found: SequenceId,
    },
    /// A continuation fragment arrived before the first fragment announced
    /// the message length.
    #[error("fragment {found} arrived before the first fragment")]
    MissingFirstFragment { found: SequenceId },
}

/// Errors produced while fragmenting outbound messages.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FragmentationError {
    /// The message needs more fragments than the header can count.
    #[error("message needs {required} fragments but at most {limit} are addressable")]
    TooManyFragments { required: usize, limit: usize },
    /// The configured fragment size leaves no room for a body.
    #[error("fragment size {size} does not exceed the {header}-byte header")]
    FragmentTooSmall { size: usize, header: usize },
}
