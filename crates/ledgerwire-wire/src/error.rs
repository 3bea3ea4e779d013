//! Error types for frame decoding and dispatch.

use thiserror::Error;

use ledgerwire_core::{Checksum, CodecError};
use ledgerwire_records::RecordError;

/// Errors raised while decoding or verifying a frame.
///
/// All of these are fatal to the frame: a frame that fails any of these
/// checks is discarded, never handed to a payload decoder.
#[derive(Debug, Error)]
pub enum WireError {
    #[error("foreign chain magic: {0:02x?}")]
    BadMagic([u8; 4]),

    #[error("checksum mismatch: declared {declared:02x?}, computed {computed:02x?}")]
    ChecksumMismatch {
        declared: Checksum,
        computed: Checksum,
    },

    #[error("declared payload length {declared} exceeds {remaining} remaining bytes")]
    TruncatedFrame { declared: u64, remaining: usize },

    #[error("payload of {size} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { size: u64, max: u64 },

    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Record(#[from] RecordError),
}
