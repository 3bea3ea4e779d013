//! Golden test vectors for deterministic verification.
//!
//! Every implementation of the Ledgerwire format must produce these exact
//! bytes for these inputs. The vectors cover unsigned records (an empty
//! trailing authorization list) so the expected bytes are stable across
//! signature schemes.

use ledgerwire_core::Value;
use ledgerwire_records::{
    EncodeOpts, Identity, QuorumDecision, StateActionFee, WireRecord,
};

/// A golden record-encoding vector.
#[derive(Debug, Clone)]
pub struct GoldenVector {
    /// Human-readable name for the vector.
    pub name: &'static str,
    /// Expected full encoding (kind prefix, empty authorization list), hex.
    pub expected_hex: &'static str,
}

/// Build the record for each vector and return its encoding.
pub fn encode_vector(vector: &GoldenVector) -> Vec<u8> {
    match vector.name {
        "identity-testuser" => {
            let mut identity = Identity::new("testuser");
            identity.set_parent("sct");
            identity.records = Value::empty_map();
            identity.to_bytes(EncodeOpts::default())
        }
        "quorum-rotate-keys" => {
            let decision = QuorumDecision::new("alice", "sct", "rotate-keys");
            decision.to_bytes(EncodeOpts::default())
        }
        "fee-register-identity" => {
            let fee = StateActionFee::new("sct", "register-identity", 250);
            fee.to_bytes(EncodeOpts::default())
        }
        other => panic!("unknown vector: {other}"),
    }
}

/// Get all golden vectors.
pub fn all_vectors() -> Vec<GoldenVector> {
    vec![
        // kind=1, version=0, "testuser", "sct", 0 members, empty map,
        // 0 authorizations
        GoldenVector {
            name: "identity-testuser",
            expected_hex: "01000874657374757365720373637400060000",
        },
        // kind=4, version=0, "alice", "sct", "rotate-keys", empty map,
        // timestamp 0, 0 authorizations
        GoldenVector {
            name: "quorum-rotate-keys",
            expected_hex: "040005616c696365037363740b726f746174652d6b65797306000000",
        },
        // kind=5, version=0, "sct", "register-identity", fee +250,
        // timestamp 0, 0 authorizations
        GoldenVector {
            name: "fee-register-identity",
            expected_hex: "0500037363741172656769737465722d6964656e7469747900fa010000",
        },
    ]
}
