//! Sequence positioning of fragments within a logical message.
//!
//! Provides [`SequenceId`], a type-safe wrapper around the 4-bit sequence
//! number carried in the high nibble of every fragment header.

use derive_more::{Display, Into};

/// Highest sequence id representable in a fragment header nibble.
pub const MAX_SEQUENCE_ID: u8 = 0x0F;

/// Zero-based ordinal describing a fragment's position within its message.
///
/// # Examples
///
/// ```
/// use mooltilink::fragment::SequenceId;
/// let id = SequenceId::new(3).expect("fits in a nibble");
/// assert_eq!(id.get(), 3);
/// assert!(id.checked_increment().is_some());
/// assert!(SequenceId::new(16).is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Into)]
#[display("{_0}")]
pub struct SequenceId(u8);

impl SequenceId {
    /// Construct a sequence id, returning `None` when `value` exceeds a nibble.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value > MAX_SEQUENCE_ID {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Return the first valid sequence id.
    #[must_use]
    pub const fn zero() -> Self { Self(0) }

    /// Extract the sequence id from the packed header byte.
    #[must_use]
    pub const fn from_header_byte(byte: u8) -> Self { Self(byte >> 4) }

    /// Return the underlying numeric value.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Return the value as a buffer slot index.
    #[must_use]
    pub const fn as_index(self) -> usize { self.0 as usize }

    /// Whether this is the first fragment of a message.
    #[must_use]
    pub const fn is_first(self) -> bool { self.0 == 0 }

    /// Increment the id, returning `None` once the nibble is exhausted.
    #[must_use]
    pub const fn checked_increment(self) -> Option<Self> { Self::new(self.0 + 1) }
}

impl TryFrom<usize> for SequenceId {
    type Error = usize;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or(value)
    }
}
