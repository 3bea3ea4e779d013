//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: deterministic keypairs and
//! ready-made signed records.

use ledgerwire_core::{Keypair, PublicKey, Value};
use ledgerwire_records::{
    Identity, QuorumDecision, StateActionFee, Transfer, WireRecord,
};
use std::collections::BTreeMap;

/// A fixed timestamp used across fixtures so encodings are reproducible.
pub const FIXTURE_TIMESTAMP: u64 = 1_736_870_400_000;

/// A test fixture holding a deterministic signer.
pub struct TestFixture {
    pub keypair: Keypair,
}

impl TestFixture {
    /// Create a fixture with a random keypair.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
        }
    }

    /// Create a fixture with a deterministic keypair and moniker.
    pub fn with_seed(seed: [u8; 32], moniker: &str) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed).with_moniker(moniker),
        }
    }

    pub fn public_key(&self) -> PublicKey {
        use ledgerwire_core::RecordSigner;
        self.keypair.public_key()
    }

    /// A signed identity under the given parent.
    pub fn make_identity(&self, moniker: &str, parent: &str) -> Identity {
        let mut identity = Identity::new(moniker);
        identity.set_parent(parent);
        identity.sign(&self.keypair);
        identity
    }

    /// A signed transfer with fixture timestamp and a small metadata map.
    pub fn make_transfer(&self, sender: &str, recipient: &str, amount: i128) -> Transfer {
        let mut transfer = Transfer::new(sender, recipient, amount);
        transfer.set_asset("SCT");
        transfer.set_timestamp(FIXTURE_TIMESTAMP);
        let mut metadata = BTreeMap::new();
        metadata.insert("memo".to_string(), Value::from("fixture"));
        transfer.metadata = Value::Map(metadata);
        transfer.sign(&self.keypair);
        transfer
    }

    /// A signed quorum decision with a threshold requirement.
    pub fn make_decision(&self, proposer: &str, cluster: &str, action: &str) -> QuorumDecision {
        let mut decision = QuorumDecision::new(proposer, cluster, action);
        let mut requirements = BTreeMap::new();
        requirements.insert("threshold".to_string(), Value::Uint(2));
        decision.set_requirements(Value::Map(requirements));
        decision.set_timestamp(FIXTURE_TIMESTAMP);
        decision.sign(&self.keypair);
        decision
    }

    /// A signed fee entry.
    pub fn make_fee(&self, cluster: &str, action: &str, fee: i128) -> StateActionFee {
        let mut entry = StateActionFee::new(cluster, action, fee);
        entry.set_timestamp(FIXTURE_TIMESTAMP);
        entry.sign(&self.keypair);
        entry
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// The three deterministic signers used across the test suite.
pub fn alice() -> TestFixture {
    TestFixture::with_seed([0x01; 32], "alice")
}

pub fn bob() -> TestFixture {
    TestFixture::with_seed([0x02; 32], "bob")
}

pub fn governor() -> TestFixture {
    TestFixture::with_seed([0x03; 32], "governor")
}
