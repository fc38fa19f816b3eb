//! Tests for outbound fragmentation and fragment batch helpers.

use bytes::Bytes;

use crate::fragment::{
    DEFAULT_FRAGMENT_SIZE,
    FragmentOutcome,
    FragmentationError,
    Fragmenter,
    HEADER_LEN,
    MAX_FRAGMENTS,
    PacketReassembler,
};

#[test]
fn fragmenter_splits_payload_into_multiple_frames() {
    let fragmenter = Fragmenter::new(5).expect("room for a body");
    let payload: Vec<u8> = (0..8).collect();

    let batch = fragmenter.fragment(payload).expect("fragment payload");

    assert_eq!(batch.len(), 3);
    assert!(batch.is_fragmented());
    assert_eq!(batch.fragments()[0].as_ref(), &[0x00, 0x02, 0, 1, 2]);
    assert_eq!(batch.fragments()[1].as_ref(), &[0x00, 0x12, 3, 4, 5]);
    assert_eq!(batch.fragments()[2].as_ref(), &[0x00, 0x22, 6, 7]);
}

#[test]
fn fragmenter_handles_empty_payload() {
    let batch = Fragmenter::default().fragment([]).expect("fragment empty");

    assert_eq!(batch.len(), 1);
    assert!(!batch.is_fragmented());
    assert_eq!(batch.fragments()[0].as_ref(), &[0x00, 0x00]);
}

#[test]
fn fragmenter_rejects_header_sized_fragments() {
    let err = Fragmenter::new(HEADER_LEN).expect_err("no room for a body");
    assert_eq!(
        err,
        FragmentationError::FragmentTooSmall {
            size: HEADER_LEN,
            header: HEADER_LEN,
        }
    );
}

#[test]
fn fragmenter_rejects_messages_beyond_sixteen_fragments() {
    let fragmenter = Fragmenter::new(3).expect("room for a body");
    let payload = vec![0_u8; MAX_FRAGMENTS + 1];

    let err = fragmenter.fragment(payload).expect_err("too many fragments");
    assert_eq!(
        err,
        FragmentationError::TooManyFragments {
            required: MAX_FRAGMENTS + 1,
            limit: MAX_FRAGMENTS,
        }
    );
}

#[test]
fn fragmenter_accepts_exactly_max_message_len() {
    let fragmenter = Fragmenter::default();
    let payload = vec![7_u8; fragmenter.max_message_len()];

    let batch = fragmenter.fragment(&payload).expect("fits in sixteen fragments");

    assert_eq!(batch.len(), MAX_FRAGMENTS);
    assert!(
        batch
            .fragments()
            .iter()
            .all(|fragment| fragment.len() == DEFAULT_FRAGMENT_SIZE)
    );
}

#[test]
fn fragmented_batch_reassembles_to_original_body() {
    let fragmenter = Fragmenter::new(6).expect("room for a body");
    let payload: Vec<u8> = (0..37).collect();
    let mut reassembler = PacketReassembler::new();

    let mut completed = None;
    for fragment in fragmenter.fragment(&payload).expect("fragment payload") {
        if let FragmentOutcome::Complete(message) = reassembler.on_fragment(fragment) {
            completed = Some(message);
        }
    }

    let message = completed.expect("last fragment completes the message");
    assert_eq!(message.body(), Bytes::from(payload));
}
