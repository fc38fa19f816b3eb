//! Property tests for fragmentation and reassembly.

use bytes::Bytes;
use mooltilink::{
    FragmentOutcome,
    Fragmenter,
    PacketReassembler,
    message::{Command, DeviceCodec, Message, MessageDecoder, encode_message},
};
use proptest::{collection::vec, prelude::*};

/// A fragment size with a payload that fits sixteen fragments of that size.
fn sized_payload() -> impl Strategy<Value = (usize, Vec<u8>)> {
    (8usize..=64).prop_flat_map(|size| {
        let limit = (size - 2) * 16 - 4;
        (Just(size), vec(any::<u8>(), 0..=limit))
    })
}

proptest! {
    #[test]
    fn fragmented_messages_reassemble_in_order(
        (fragment_size, payload) in sized_payload(),
        code in any::<u16>(),
    ) {
        let fragmenter = Fragmenter::new(fragment_size).expect("size above header");
        let message = Message::new(Command::from_code(code), Bytes::from(payload));
        let body = encode_message(&message).expect("encodes");
        let fragments: Vec<Bytes> = fragmenter.fragment(body).expect("fits").into_iter().collect();
        let last = fragments.len() - 1;

        let mut reassembler = PacketReassembler::new();
        for (index, fragment) in fragments.into_iter().enumerate() {
            match reassembler.on_fragment(fragment) {
                FragmentOutcome::Incomplete { .. } => prop_assert!(index < last),
                FragmentOutcome::Complete(reassembled) => {
                    prop_assert_eq!(index, last);
                    let decoded = DeviceCodec.decode(&reassembled).expect("decodes");
                    prop_assert_eq!(decoded, message.clone());
                }
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
        }
        prop_assert!(reassembler.session().is_idle());
    }

    #[test]
    fn arbitrary_notifications_never_panic(
        notifications in vec(vec(any::<u8>(), 0..24), 0..40),
    ) {
        let mut reassembler = PacketReassembler::new();
        for notification in notifications {
            if let FragmentOutcome::Complete(reassembled) = reassembler.on_fragment(Bytes::from(notification)) {
                let _ = DeviceCodec.decode(&reassembled);
            }
        }
    }

    #[test]
    fn credential_parsing_never_panics(
        payload in vec(any::<u8>(), 0..64),
        index in 0usize..80,
    ) {
        let _ = mooltilink::parse_field(&payload, index);
    }
}
