//! Identity record: a named participant in the ledger's identity
//! namespace, optionally nested under a parent identity.

use serde::{Deserialize, Serialize};

use ledgerwire_core::{write_string, ByteReader, Value};

use crate::auth::Authorization;
use crate::codec::{read_string_seq, read_value, write_string_seq, write_value};
use crate::error::RecordError;
use crate::kind::RecordKind;
use crate::record::WireRecord;

/// A ledger identity.
///
/// Field order (part of the compatibility surface): moniker, parent,
/// members, records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    /// Human-readable identity name.
    pub moniker: String,
    /// Parent identity namespace ("" for top-level identities).
    pub parent: String,
    /// Monikers of member identities (quorum groups).
    pub members: Vec<String>,
    /// Free-form attribute map; canonical value encoding keeps it
    /// deterministic regardless of insertion order.
    pub records: Value,
    /// Attached signatures.
    pub authorizations: Vec<Authorization>,
}

impl Identity {
    /// Create an identity with the given moniker and no other state.
    pub fn new(moniker: impl Into<String>) -> Self {
        Self {
            moniker: moniker.into(),
            parent: String::new(),
            members: Vec::new(),
            records: Value::empty_map(),
            authorizations: Vec::new(),
        }
    }

    pub fn set_parent(&mut self, parent: impl Into<String>) {
        self.parent = parent.into();
    }

    pub fn add_member(&mut self, moniker: impl Into<String>) {
        self.members.push(moniker.into());
    }
}

impl WireRecord for Identity {
    const KIND: RecordKind = RecordKind::Identity;

    fn write_fields(&self, buf: &mut Vec<u8>) {
        write_string(buf, &self.moniker);
        write_string(buf, &self.parent);
        write_string_seq(buf, &self.members);
        write_value(buf, &self.records);
    }

    fn read_fields(reader: &mut ByteReader<'_>) -> Result<Self, RecordError> {
        Ok(Self {
            moniker: reader.read_string()?,
            parent: reader.read_string()?,
            members: read_string_seq(reader)?,
            records: read_value(reader)?,
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
        if self.moniker.is_empty() {
            return Some("Moniker is required.".to_string());
        }
        None
    }
}
