//! Base-62 short code codec.
//!
//! Converts record identifiers to short codes and back using a 62 character
//! alphabet, optionally permuted by a per-deployment secret key.

pub mod alphabet;
pub mod codec;
pub mod error;

pub use alphabet::{Alphabet, BASE, DEFAULT_ALPHABET};
pub use codec::{decode, encode, Codec};
pub use error::CodecError;

use snaplink_core::{RecordId, ShortCode};

/// Trait for deriving candidate short codes for a record.
///
/// Implementations are pure: they never consult storage. The collision
/// resolver calls them with an increasing `attempt` until a free code is
/// found, so different attempts must yield different codes.
pub trait CodeGenerator: Send + Sync + 'static {
    /// Derives the candidate for `record_id` at the given attempt.
    /// Attempt `0` is the canonical code.
    fn candidate(&self, record_id: RecordId, attempt: u32) -> Result<ShortCode, CodecError>;
}

impl CodeGenerator for Codec {
    fn candidate(&self, record_id: RecordId, attempt: u32) -> Result<ShortCode, CodecError> {
        // The attempt perturbs the pad-up offset, never the identifier.
        self.encode(record_id, std::num::NonZeroU32::new(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn attempt_zero_is_canonical_code() {
        let codec = Codec::default();
        let code = codec.candidate(RecordId::new(1), 0).unwrap();
        assert_eq!(code.as_str(), "b");
    }

    #[test]
    fn attempts_produce_distinct_candidates() {
        let codec = Codec::default();
        let candidates: HashSet<String> = (0..10)
            .map(|attempt| {
                codec
                    .candidate(RecordId::new(42), attempt)
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(candidates.len(), 10);
    }

    #[test]
    fn codec_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Codec>();
    }
}
