//! Transfer record: moves an amount of an asset between two addresses.

use serde::{Deserialize, Serialize};

use ledgerwire_core::{write_string, write_varint, ByteReader, Value};

use crate::auth::Authorization;
use crate::codec::{read_big, read_value, write_big, write_value};
use crate::error::RecordError;
use crate::kind::RecordKind;
use crate::record::WireRecord;

/// An asset transfer.
///
/// Field order (part of the compatibility surface): sender, recipient,
/// asset, amount, nonce, timestamp, metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    /// Sending address.
    pub sender: String,
    /// Receiving address.
    pub recipient: String,
    /// Asset symbol.
    pub asset: String,
    /// Amount in the asset's smallest unit. Validated positive; the
    /// encoding itself carries a sign so adjustment entries round-trip.
    pub amount: i128,
    /// Sender-scoped replay counter.
    pub nonce: u64,
    /// Logical timestamp (milliseconds).
    pub timestamp: u64,
    /// Free-form metadata map.
    pub metadata: Value,
    /// Attached signatures.
    pub authorizations: Vec<Authorization>,
}

impl Transfer {
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: i128,
    ) -> Self {
        Self {
            sender: sender.into(),
            recipient: recipient.into(),
            asset: String::new(),
            amount,
            nonce: 0,
            timestamp: 0,
            metadata: Value::empty_map(),
            authorizations: Vec::new(),
        }
    }

    pub fn set_asset(&mut self, asset: impl Into<String>) {
        self.asset = asset.into();
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    pub fn set_timestamp(&mut self, timestamp: u64) {
        self.timestamp = timestamp;
    }
}

impl WireRecord for Transfer {
    const KIND: RecordKind = RecordKind::Transfer;

    fn write_fields(&self, buf: &mut Vec<u8>) {
        write_string(buf, &self.sender);
        write_string(buf, &self.recipient);
        write_string(buf, &self.asset);
        write_big(buf, self.amount);
        write_varint(buf, self.nonce as u128);
        write_varint(buf, self.timestamp as u128);
        write_value(buf, &self.metadata);
    }

    fn read_fields(reader: &mut ByteReader<'_>) -> Result<Self, RecordError> {
        Ok(Self {
            sender: reader.read_string()?,
            recipient: reader.read_string()?,
            asset: reader.read_string()?,
            amount: read_big(reader)?,
            nonce: reader.read_varint_u64()?,
            timestamp: reader.read_varint_u64()?,
            metadata: read_value(reader)?,
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
        if self.sender.is_empty() {
            return Some("Sender is required.".to_string());
        }
        if self.recipient.is_empty() {
            return Some("Recipient is required.".to_string());
        }
        if self.amount <= 0 {
            return Some("Amount must be positive.".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::EncodeOpts;
    use ledgerwire_core::Keypair;
    use std::collections::BTreeMap;

    fn test_transfer() -> Transfer {
        let mut transfer = Transfer::new("addr-sender", "addr-recipient", 1_500);
        transfer.set_asset("SCT");
        transfer.set_nonce(7);
        transfer.set_timestamp(1_736_870_400_000);
        transfer
    }

    #[test]
    fn test_roundtrip() {
        let transfer = test_transfer();
        let decoded = Transfer::from_bytes(&transfer.to_bytes(EncodeOpts::default())).unwrap();
        assert_eq!(decoded, transfer);
    }

    #[test]
    fn test_metadata_order_independence() {
        let mut a = test_transfer();
        let mut map_a = BTreeMap::new();
        map_a.insert("memo".to_string(), Value::from("rent"));
        map_a.insert("batch".to_string(), Value::Uint(3));
        a.metadata = Value::Map(map_a);

        let mut b = test_transfer();
        let mut map_b = BTreeMap::new();
        map_b.insert("batch".to_string(), Value::Uint(3));
        map_b.insert("memo".to_string(), Value::from("rent"));
        b.metadata = Value::Map(map_b);

        assert_eq!(
            a.to_bytes(EncodeOpts::default()),
            b.to_bytes(EncodeOpts::default())
        );
        assert_eq!(a.signable_hash(), b.signable_hash());
    }

    #[test]
    fn test_negative_amount_roundtrip() {
        // Negative amounts round-trip even though validation rejects them.
        let transfer = Transfer::new("a", "b", -42);
        let decoded = Transfer::from_bytes(&transfer.to_bytes(EncodeOpts::default())).unwrap();
        assert_eq!(decoded.amount, -42);
        assert_eq!(
            decoded.validate().error.as_deref(),
            Some("Amount must be positive.")
        );
    }

    #[test]
    fn test_required_field_precedence() {
        let transfer = Transfer::new("", "", 0);
        assert_eq!(
            transfer.validate().error.as_deref(),
            Some("Sender is required.")
        );

        let transfer = Transfer::new("a", "", 0);
        assert_eq!(
            transfer.validate().error.as_deref(),
            Some("Recipient is required.")
        );

        let transfer = Transfer::new("a", "b", 0);
        assert_eq!(
            transfer.validate().error.as_deref(),
            Some("Amount must be positive.")
        );
    }

    #[test]
    fn test_multisig_accumulates() {
        let alice = Keypair::from_seed(&[1; 32]).with_moniker("alice");
        let bob = Keypair::from_seed(&[2; 32]).with_moniker("bob");
        let mut transfer = test_transfer();
        transfer.sign(&alice);
        transfer.sign(&bob);
        assert_eq!(transfer.authorizations.len(), 2);
        assert!(transfer.is_valid());
    }
}
