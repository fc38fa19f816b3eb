//! Outbound helper that splits encoded requests into link fragments.
//!
//! [`Fragmenter`] chunks a serialised message into fixed-size fragments,
//! prefixing each with a [`FragmentHeader`]. Fragment size includes the
//! header, matching the link MTU the device negotiates.

use bytes::{BufMut, Bytes, BytesMut};

use super::{FragmentHeader, FragmentationError, HEADER_LEN, MAX_FRAGMENTS, SequenceId};

/// Default fragment size, header included.
pub const DEFAULT_FRAGMENT_SIZE: usize = 64;

/// Splits encoded messages into fragment-sized frames.
#[derive(Clone, Copy, Debug)]
pub struct Fragmenter {
    fragment_size: usize,
}

impl Default for Fragmenter {
    fn default() -> Self {
        Self {
            fragment_size: DEFAULT_FRAGMENT_SIZE,
        }
    }
}

impl Fragmenter {
    /// Create a fragmenter producing fragments of at most `fragment_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::FragmentTooSmall`] when `fragment_size`
    /// leaves no room after the header.
    pub const fn new(fragment_size: usize) -> Result<Self, FragmentationError> {
        if fragment_size <= HEADER_LEN {
            return Err(FragmentationError::FragmentTooSmall {
                size: fragment_size,
                header: HEADER_LEN,
            });
        }
        Ok(Self { fragment_size })
    }

    /// Return the fragment size in bytes, header included.
    #[must_use]
    pub const fn fragment_size(&self) -> usize { self.fragment_size }

    /// Bytes of message body carried by each fragment.
    #[must_use]
    pub const fn body_capacity(&self) -> usize { self.fragment_size - HEADER_LEN }

    /// Largest message body that fits in a single logical message.
    #[must_use]
    pub const fn max_message_len(&self) -> usize { self.body_capacity() * MAX_FRAGMENTS }

    /// Split `payload` into fragments.
    ///
    /// An empty payload still yields one header-only fragment.
    ///
    /// # Examples
    ///
    /// ```
    /// use mooltilink::fragment::Fragmenter;
    ///
    /// let fragmenter = Fragmenter::new(4).expect("room for a body");
    /// let batch = fragmenter.fragment(&[1, 2, 3]).expect("fits");
    /// assert_eq!(batch.len(), 2);
    /// assert_eq!(batch.fragments()[0].as_ref(), &[0x00, 0x01, 1, 2]);
    /// assert_eq!(batch.fragments()[1].as_ref(), &[0x00, 0x11, 3]);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::TooManyFragments`] if the payload needs
    /// more fragments than a header can address.
    pub fn fragment(&self, payload: impl AsRef<[u8]>) -> Result<FragmentBatch, FragmentationError> {
        let payload = payload.as_ref();
        let capacity = self.body_capacity();
        let total = payload.len().div_ceil(capacity).max(1);
        if total > MAX_FRAGMENTS {
            return Err(FragmentationError::TooManyFragments {
                required: total,
                limit: MAX_FRAGMENTS,
            });
        }

        let mut fragments = Vec::with_capacity(total);
        let mut chunks = payload.chunks(capacity);
        let mut sequence = Some(SequenceId::zero());
        while let Some(current) = sequence {
            if current.as_index() >= total {
                break;
            }
            let chunk = chunks.next().unwrap_or_default();
            let header = FragmentHeader::new(current, total).ok_or(
                FragmentationError::TooManyFragments {
                    required: total,
                    limit: MAX_FRAGMENTS,
                },
            )?;
            let mut frame = BytesMut::with_capacity(HEADER_LEN + chunk.len());
            frame.put_slice(&header.to_bytes());
            frame.put_slice(chunk);
            fragments.push(frame.freeze());
            sequence = current.checked_increment();
        }

        Ok(FragmentBatch::new(fragments))
    }
}

/// Collection of fragments produced for a single logical message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentBatch {
    fragments: Vec<Bytes>,
}

impl FragmentBatch {
    fn new(fragments: Vec<Bytes>) -> Self {
        debug_assert!(!fragments.is_empty(), "fragment batches must not be empty");
        Self { fragments }
    }

    /// Return the fragments as a slice.
    #[must_use]
    pub fn fragments(&self) -> &[Bytes] { self.fragments.as_slice() }

    /// Number of fragments in the batch.
    #[expect(
        clippy::len_without_is_empty,
        reason = "batches are guaranteed non-empty"
    )]
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Whether the logical message required more than one fragment.
    #[must_use]
    pub fn is_fragmented(&self) -> bool { self.len() > 1 }
}

impl IntoIterator for FragmentBatch {
    type Item = Bytes;
    type IntoIter = std::vec::IntoIter<Bytes>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.into_iter() }
}
