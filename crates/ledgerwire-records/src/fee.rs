//! State action fee record: the fee charged for performing a named state
//! action within a cluster.

use serde::{Deserialize, Serialize};

use ledgerwire_core::{write_string, write_varint, ByteReader};

use crate::auth::Authorization;
use crate::codec::{read_big, write_big};
use crate::error::RecordError;
use crate::kind::RecordKind;
use crate::record::WireRecord;

/// A fee schedule entry.
///
/// Field order (part of the compatibility surface): cluster, action, fee,
/// timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateActionFee {
    /// Cluster the fee applies to.
    pub cluster: String,
    /// The state action being priced.
    pub action: String,
    /// Fee amount in the ledger's smallest unit. Validated positive.
    pub fee: i128,
    /// Logical timestamp the fee takes effect (milliseconds).
    pub timestamp: u64,
    /// Attached signatures.
    pub authorizations: Vec<Authorization>,
}

impl StateActionFee {
    pub fn new(cluster: impl Into<String>, action: impl Into<String>, fee: i128) -> Self {
        Self {
            cluster: cluster.into(),
            action: action.into(),
            fee,
            timestamp: 0,
            authorizations: Vec::new(),
        }
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }
}

impl WireRecord for StateActionFee {
    const KIND: RecordKind = RecordKind::StateActionFee;

    fn write_fields(&self, buf: &mut Vec<u8>) {
        write_string(buf, &self.cluster);
        write_string(buf, &self.action);
        write_big(buf, self.fee);
        write_varint(buf, self.timestamp as u128);
    }

    fn read_fields(reader: &mut ByteReader<'_>) -> Result<Self, RecordError> {
        Ok(Self {
            cluster: reader.read_string()?,
            action: reader.read_string()?,
            fee: read_big(reader)?,
            timestamp: reader.read_varint_u64()?,
            authorizations: Vec::new(),
        })
    }

    fn authorizations(&self) -> &[Authorization] {
        &self.authorizations
    }

    fn set_authorizations(&mut self, auths: Vec<Authorization>) {
        self.authorizations = auths;
    }

    fn check_required_fields(&self) -> Option<String> {
        if self.cluster.is_empty() {
            return Some("Cluster is required.".to_string());
        }
        if self.action.is_empty() {
            return Some("Action is required.".to_string());
        }
        if self.fee <= 0 {
            return Some("Fee must be positive.".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EncodeOpts;
    use ledgerwire_core::Keypair;

    #[test]
    fn test_roundtrip() {
        let mut fee = StateActionFee::new("sct", "register-identity", 250);
        fee.set_timestamp(1_736_870_400_000);
        let decoded = StateActionFee::from_bytes(&fee.to_bytes(EncodeOpts::default())).unwrap();
        assert_eq!(decoded, fee);
    }

    #[test]
    fn test_required_field_precedence() {
        let fee = StateActionFee::new("", "", 0);
        assert_eq!(fee.validate().error.as_deref(), Some("Cluster is required."));

        let fee = StateActionFee::new("sct", "", 0);
        assert_eq!(fee.validate().error.as_deref(), Some("Action is required."));

        let fee = StateActionFee::new("sct", "register-identity", 0);
        assert_eq!(
            fee.validate().error.as_deref(),
            Some("Fee must be positive.")
        );

        let fee = StateActionFee::new("sct", "register-identity", -5);
        assert_eq!(
            fee.validate().error.as_deref(),
            Some("Fee must be positive.")
        );
    }

    #[test]
    fn test_signed_fee_is_valid() {
        let mut fee = StateActionFee::new("sct", "register-identity", 250);
        fee.sign(&Keypair::from_seed(&[4; 32]).with_moniker("governor"));
        assert!(fee.is_valid());
    }
}
