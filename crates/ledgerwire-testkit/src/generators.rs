//! Proptest generators for property-based testing.

use proptest::prelude::*;

use ledgerwire_core::{Hash256, Keypair, PublicKey, RecordSigner, Value};
use ledgerwire_records::{Authorization, RecordKind};

/// Generate a deterministic keypair from an arbitrary seed.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random public key.
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a random hash.
pub fn hash256() -> impl Strategy<Value = Hash256> {
    any::<[u8; 32]>().prop_map(Hash256)
}

/// Generate a plausible moniker.
pub fn moniker() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

/// Generate a registered record kind.
pub fn record_kind() -> impl Strategy<Value = RecordKind> {
    prop::sample::select(RecordKind::ALL.to_vec())
}

/// Generate a reasonable timestamp (milliseconds).
pub fn timestamp() -> impl Strategy<Value = u64> {
    0u64..=u64::MAX / 2
}

/// Generate an arbitrary canonical value, nested up to three levels.
pub fn value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        "[a-z0-9 ]{0,16}".prop_map(Value::Str),
        any::<u64>().prop_map(Value::Uint),
        any::<i128>().prop_map(Value::Big),
        any::<bool>().prop_map(Value::Bool),
    ];
    leaf.prop_recursive(3, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Seq),
            prop::collection::btree_map("[a-z]{1,8}", inner, 0..8).prop_map(Value::Map),
        ]
    })
}

/// Generate a signed authorization over the given message.
pub fn authorization_over(message: Vec<u8>) -> impl Strategy<Value = Authorization> {
    (keypair(), moniker()).prop_map(move |(kp, moniker)| Authorization {
        signature: kp.sign(&message),
        public_key: Some(kp.public_key()),
        address: None,
        moniker: Some(moniker),
    })
}
