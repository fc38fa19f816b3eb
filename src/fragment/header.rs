use super::{SequenceId, index::MAX_SEQUENCE_ID};

/// Number of header bytes at the start of every fragment.
pub const HEADER_LEN: usize = 2;

/// Upper bound on the number of fragments that can form one message.
pub const MAX_FRAGMENTS: usize = MAX_SEQUENCE_ID as usize + 1;

/// Header describing a single fragment.
///
/// The first byte is reserved for link-level flags and is carried through
/// unchanged. The second byte packs the [`SequenceId`] into its high nibble;
/// on the first fragment the low nibble holds the fragment count minus one.
///
/// # Examples
///
/// ```
/// use mooltilink::fragment::FragmentHeader;
/// let header = FragmentHeader::parse(&[0x00, 0x02, 0xAA]).expect("two header bytes");
/// assert!(header.sequence().is_first());
/// assert_eq!(header.announced_count(), Some(3));
///
/// let follow_up = FragmentHeader::parse(&[0x00, 0x12]).expect("two header bytes");
/// assert_eq!(follow_up.sequence().get(), 1);
/// assert_eq!(follow_up.announced_count(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FragmentHeader {
    flags: u8,
    sequence: SequenceId,
    count_nibble: u8,
}

impl FragmentHeader {
    /// Build the header for fragment `sequence` of a `total`-fragment message.
    ///
    /// Returns `None` when `total` is zero or exceeds [`MAX_FRAGMENTS`].
    #[must_use]
    pub fn new(sequence: SequenceId, total: usize) -> Option<Self> {
        if total == 0 || total > MAX_FRAGMENTS {
            return None;
        }
        let count_nibble = u8::try_from(total - 1).ok()?;
        Some(Self {
            flags: 0,
            sequence,
            count_nibble,
        })
    }

    /// Parse the header from the leading bytes of a notification.
    ///
    /// Returns `None` when fewer than [`HEADER_LEN`] bytes are present.
    #[must_use]
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let &[flags, packed, ..] = bytes else {
            return None;
        };
        Some(Self {
            flags,
            sequence: SequenceId::from_header_byte(packed),
            count_nibble: packed & 0x0F,
        })
    }

    /// Return the reserved flags byte.
    #[must_use]
    pub const fn flags(&self) -> u8 { self.flags }

    /// Return the fragment's sequence id.
    #[must_use]
    pub const fn sequence(&self) -> SequenceId { self.sequence }

    /// Total fragment count announced by the first fragment.
    ///
    /// The low nibble carries no meaning on later fragments, so this returns
    /// `None` unless the sequence id is zero.
    #[must_use]
    pub const fn announced_count(&self) -> Option<usize> {
        if self.sequence.is_first() {
            Some(self.count_nibble as usize + 1)
        } else {
            None
        }
    }

    /// Serialise the header into its two wire bytes.
    ///
    /// Outbound fragments repeat the count nibble on every fragment; readers
    /// only trust it on the first.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; HEADER_LEN] {
        [self.flags, (self.sequence.get() << 4) | self.count_nibble]
    }
}
