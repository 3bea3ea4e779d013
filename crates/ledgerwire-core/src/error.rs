//! Error types for the Ledgerwire core codec.

use thiserror::Error;

/// Codec errors. Every variant is fatal to the single decode call that
/// raised it: a truncated or corrupted input cannot be partially trusted,
/// so callers must discard the buffer rather than guess.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("truncated input: needed {needed} bytes at offset {offset}, only {remaining} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("unknown type tag: 0x{0:02x}")]
    UnknownTag(u8),

    #[error("varint exceeds maximum encoded length")]
    VarintOverflow,

    #[error("invalid utf-8 in string body")]
    InvalidUtf8,

    #[error("invalid sign byte: 0x{0:02x}")]
    InvalidSign(u8),

    #[error("invalid boolean byte: 0x{0:02x}")]
    InvalidBool(u8),

    #[error("map keys out of canonical order")]
    NonCanonicalMap,

    #[error("bounded integer does not fit in 64 bits")]
    IntegerOutOfRange,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("signature verification failed")]
    InvalidSignature,
}

impl CodecError {
    /// Build a `Truncated` error for a read of `needed` bytes at `offset`
    /// into a buffer of `len` total bytes.
    pub fn truncated(offset: usize, needed: usize, len: usize) -> Self {
        CodecError::Truncated {
            offset,
            needed,
            remaining: len.saturating_sub(offset),
        }
    }
}
