//! Quorum decision record: a proposal that a named group of identities
//! collectively authorizes.

use serde::{Deserialize, Serialize};

use ledgerwire_core::{write_string, write_varint, ByteReader, Value};

use crate::auth::Authorization;
use crate::codec::{read_value, write_value};
use crate::error::RecordError;
use crate::kind::RecordKind;
use crate::record::WireRecord;

/// A decision put before a quorum.
///
/// Field order (part of the compatibility surface): proposer, cluster,
/// action, requirements, timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuorumDecision {
    /// Moniker of the proposing identity.
    pub proposer: String,
    /// Logical cluster the decision applies to.
    pub cluster: String,
    /// The action being decided.
    pub action: String,
    /// Free-form consensus requirements (thresholds, member weights).
    pub requirements: Value,
    /// Logical timestamp (milliseconds).
    pub timestamp: u64,
    /// Attached signatures; a quorum decision typically carries several.
    pub authorizations: Vec<Authorization>,
}

impl QuorumDecision {
    pub fn new(
        proposer: impl Into<String>,
        cluster: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            proposer: proposer.into(),
            cluster: cluster.into(),
            action: action.into(),
            requirements: Value::empty_map(),
            timestamp: 0,
            authorizations: Vec::new(),
        }
    }

    pub fn set_requirements(&mut self, requirements: Value) {
        self.requirements = requirements;
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }
}

impl WireRecord for QuorumDecision {
    const KIND: RecordKind = RecordKind::QuorumDecision;

    fn write_fields(&self, buf: &mut Vec<u8>) {
        write_string(buf, &self.proposer);
        write_string(buf, &self.cluster);
        write_string(buf, &self.action);
        write_value(buf, &self.requirements);
        write_varint(buf, self.timestamp as u128);
    }

    fn read_fields(reader: &mut ByteReader<'_>) -> Result<Self, RecordError> {
        Ok(Self {
            proposer: reader.read_string()?,
            cluster: reader.read_string()?,
            action: reader.read_string()?,
            requirements: read_value(reader)?,
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
        if self.proposer.is_empty() {
            return Some("Proposer is required.".to_string());
        }
        if self.cluster.is_empty() {
            return Some("Cluster is required.".to_string());
        }
        if self.action.is_empty() {
            return Some("Action is required.".to_string());
        }
        None
    }
}
