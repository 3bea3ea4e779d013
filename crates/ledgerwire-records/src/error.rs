//! Error types for record serialization and the authorization lifecycle.

use thiserror::Error;

use ledgerwire_core::CodecError;

/// Errors raised while encoding, decoding, or mutating records.
///
/// These are caller/input errors and are always fatal to the single call.
/// Business-rule failures are reported through [`ValidationOutcome`]
/// instead, so batch validation never short-circuits.
#[derive(Debug, Error)]
pub enum RecordError {
    /// An authorization was attached without a signature.
    #[error("authorization is missing a signature")]
    MissingSignature,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("malformed record: {0}")]
    MalformedRecord(String),
}

/// Result of semantic validation.
///
/// `validate()` returns this rather than an `Err` so that validating a batch
/// of records collects every failure instead of stopping at the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub error: Option<String>,
}

impl ValidationOutcome {
    pub fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}
