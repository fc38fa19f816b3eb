//! The work an operation resumes once the link has been flushed.

use crate::{
    fragment::{FragmentBatch, Fragmenter},
    message::{Command, Request, encode_message},
};

use super::EngineError;

/// Encoded request that is (re)sent after every flush of one operation.
///
/// A retry signal restarts the flush and then resumes the same continuation,
/// so it is built once per operation and passed along by value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Continuation {
    command: Command,
    fragments: FragmentBatch,
}

impl Continuation {
    /// Encode and fragment `request`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Encode`] or [`EngineError::Fragmentation`] when
    /// the request cannot be put on the wire.
    pub fn for_request(request: &Request, fragmenter: &Fragmenter) -> Result<Self, EngineError> {
        let body = encode_message(&request.to_message()?)?;
        let fragments = fragmenter.fragment(body)?;
        Ok(Self {
            command: request.command(),
            fragments,
        })
    }

    /// Command the continuation sends.
    #[must_use]
    pub const fn command(&self) -> Command { self.command }

    /// Fragments written when the continuation runs.
    #[must_use]
    pub fn fragments(&self) -> &FragmentBatch { &self.fragments }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_request_fits_one_fragment() {
        let continuation = Continuation::for_request(&Request::Status, &Fragmenter::default())
            .expect("status encodes");

        assert_eq!(continuation.command(), Command::Status);
        assert_eq!(
            continuation.fragments().fragments()[0].as_ref(),
            &[0x00, 0x00, 0x10, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn long_service_name_spans_fragments() {
        let request = Request::GetCredential {
            service: "example.com".repeat(4),
            login: None,
        };

        let continuation =
            Continuation::for_request(&request, &Fragmenter::default()).expect("fits");

        assert!(continuation.fragments().is_fragmented());
    }

    #[test]
    fn oversized_request_is_rejected() {
        let request = Request::GetCredential {
            service: "x".repeat(2_000),
            login: None,
        };

        let err = Continuation::for_request(&request, &Fragmenter::default())
            .expect_err("exceeds sixteen fragments");
        assert!(matches!(err, EngineError::Fragmentation(_)));
    }
}
