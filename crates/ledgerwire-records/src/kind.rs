//! Kind registry: the bijective mapping between record-type names and
//! integer codes, plus kind-based dispatch to typed decoders.
//!
//! The table is append-only. A code, once published, is embedded in frames
//! on the wire and in storage forever and must never be reassigned. New
//! kinds may only take previously-unused codes.

use serde::{Deserialize, Serialize};

use ledgerwire_core::{decode_varint_u64, CodecError};

use crate::error::RecordError;
use crate::fee::StateActionFee;
use crate::identity::Identity;
use crate::quorum::QuorumDecision;
use crate::record::WireRecord;
use crate::transfer::Transfer;

/// Record kind discriminator.
///
/// `Unknown` (code 0) is the sentinel for codes this node does not
/// recognize; decoding an unrecognized code is never an error, preserving
/// forward compatibility with peers running newer software.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u64)]
pub enum RecordKind {
    Unknown = 0,
    Identity = 1,
    Transfer = 2,
    /// Reserved: decoder not yet registered, dispatches to `Unknown`.
    Voucher = 3,
    QuorumDecision = 4,
    StateActionFee = 5,
    /// Reserved: decoder not yet registered, dispatches to `Unknown`.
    Transaction = 6,
}

impl RecordKind {
    /// Every registered kind, in code order.
    pub const ALL: [RecordKind; 7] = [
        RecordKind::Unknown,
        RecordKind::Identity,
        RecordKind::Transfer,
        RecordKind::Voucher,
        RecordKind::QuorumDecision,
        RecordKind::StateActionFee,
        RecordKind::Transaction,
    ];

    /// The integer code embedded in wire encodings.
    pub const fn code(self) -> u64 {
        self as u64
    }

    /// The symbolic name.
    pub const fn name(self) -> &'static str {
        match self {
            RecordKind::Unknown => "UNKNOWN",
            RecordKind::Identity => "IDENTITY",
            RecordKind::Transfer => "TRANSFER",
            RecordKind::Voucher => "VOUCHER",
            RecordKind::QuorumDecision => "QUORUM_DECISION",
            RecordKind::StateActionFee => "STATE_ACTION_FEE",
            RecordKind::Transaction => "TRANSACTION",
        }
    }

    /// Look up a kind by code. Unrecognized codes map to `Unknown`.
    pub const fn from_code(code: u64) -> Self {
        match code {
            1 => RecordKind::Identity,
            2 => RecordKind::Transfer,
            3 => RecordKind::Voucher,
            4 => RecordKind::QuorumDecision,
            5 => RecordKind::StateActionFee,
            6 => RecordKind::Transaction,
            _ => RecordKind::Unknown,
        }
    }

    /// Look up a kind by name. Unrecognized names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "IDENTITY" => RecordKind::Identity,
            "TRANSFER" => RecordKind::Transfer,
            "VOUCHER" => RecordKind::Voucher,
            "QUORUM_DECISION" => RecordKind::QuorumDecision,
            "STATE_ACTION_FEE" => RecordKind::StateActionFee,
            "TRANSACTION" => RecordKind::Transaction,
            _ => RecordKind::Unknown,
        }
    }
}

/// A decoded record of any registered kind.
///
/// Kinds whose decoder is not registered (reserved codes, or codes from
/// newer peers) land in `Unknown` with their raw bytes preserved so the
/// message can be relayed or stored without loss.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    Identity(Identity),
    Transfer(Transfer),
    QuorumDecision(QuorumDecision),
    StateActionFee(StateActionFee),
    Unknown { code: u64, raw: Vec<u8> },
}

impl RecordBody {
    /// The kind of this body.
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordBody::Identity(_) => RecordKind::Identity,
            RecordBody::Transfer(_) => RecordKind::Transfer,
            RecordBody::QuorumDecision(_) => RecordKind::QuorumDecision,
            RecordBody::StateActionFee(_) => RecordKind::StateActionFee,
            RecordBody::Unknown { code, .. } => RecordKind::from_code(*code),
        }
    }
}

/// Probe the kind code embedded at the front of encoded record bytes.
pub fn peek_kind(bytes: &[u8]) -> Result<RecordKind, CodecError> {
    let (code, _) = decode_varint_u64(bytes)?;
    Ok(RecordKind::from_code(code))
}

/// Decode kind-prefixed record bytes into a typed body.
///
/// Unrecognized or reserved codes yield `RecordBody::Unknown` carrying the
/// raw bytes; malformed bytes for a recognized kind are an error.
pub fn decode_record(bytes: &[u8]) -> Result<RecordBody, RecordError> {
    let (code, _) = decode_varint_u64(bytes).map_err(RecordError::Codec)?;
    match RecordKind::from_code(code) {
        RecordKind::Identity => Ok(RecordBody::Identity(Identity::from_bytes(bytes)?)),
        RecordKind::Transfer => Ok(RecordBody::Transfer(Transfer::from_bytes(bytes)?)),
        RecordKind::QuorumDecision => {
            Ok(RecordBody::QuorumDecision(QuorumDecision::from_bytes(bytes)?))
        }
        RecordKind::StateActionFee => {
            Ok(RecordBody::StateActionFee(StateActionFee::from_bytes(bytes)?))
        }
        RecordKind::Unknown | RecordKind::Voucher | RecordKind::Transaction => {
            Ok(RecordBody::Unknown {
                code,
                raw: bytes.to_vec(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_name_bijection() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_code(kind.code()), kind);
            assert_eq!(RecordKind::from_name(kind.name()), kind);
        }
    }

    #[test]
    fn test_unrecognized_code_is_unknown() {
        assert_eq!(RecordKind::from_code(999), RecordKind::Unknown);
        assert_eq!(RecordKind::from_name("FUTURE_KIND"), RecordKind::Unknown);
    }

    #[test]
    fn test_codes_are_stable() {
        // Published codes; changing any of these breaks every frame already
        // on the wire or in storage.
        assert_eq!(RecordKind::Unknown.code(), 0);
        assert_eq!(RecordKind::Identity.code(), 1);
        assert_eq!(RecordKind::Transfer.code(), 2);
        assert_eq!(RecordKind::Voucher.code(), 3);
        assert_eq!(RecordKind::QuorumDecision.code(), 4);
        assert_eq!(RecordKind::StateActionFee.code(), 5);
        assert_eq!(RecordKind::Transaction.code(), 6);
    }

    #[test]
    fn test_dispatch_unknown_preserves_raw_bytes() {
        // Code 42 is unregistered; bytes must survive untouched.
        let bytes = vec![42u8, 0xde, 0xad, 0xbe, 0xef];
        match decode_record(&bytes).unwrap() {
            RecordBody::Unknown { code, raw } => {
                assert_eq!(code, 42);
                assert_eq!(raw, bytes);
            }
            other => panic!("expected Unknown, got {other:?}"),
        }
    }

    #[test]
    fn test_reserved_kind_dispatches_to_unknown() {
        let bytes = vec![RecordKind::Voucher.code() as u8, 0x01];
        assert!(matches!(
            decode_record(&bytes).unwrap(),
            RecordBody::Unknown { code: 3, .. }
        ));
    }
}
