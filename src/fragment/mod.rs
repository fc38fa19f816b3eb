//! Fragment primitives for the notification link.
//!
//! The link carries messages in small fragments. Each fragment starts with a
//! two-byte header: a reserved flags byte, then a packed byte whose high
//! nibble is the fragment's sequence id and whose low nibble, on the first
//! fragment, holds the fragment count minus one. Each sub-module focuses on a
//! single concept while the crate root re-exports a cohesive API.

pub mod error;
pub mod fragmenter;
pub mod header;
pub mod index;
pub mod reassembler;

pub use error::{DesyncError, FragmentationError};
pub use fragmenter::{DEFAULT_FRAGMENT_SIZE, FragmentBatch, Fragmenter};
pub use header::{FragmentHeader, HEADER_LEN, MAX_FRAGMENTS};
pub use index::{MAX_SEQUENCE_ID, SequenceId};
pub use reassembler::{FragmentOutcome, PacketReassembler, ReassembledMessage, ReassemblySession};

#[cfg(test)]
mod tests;
