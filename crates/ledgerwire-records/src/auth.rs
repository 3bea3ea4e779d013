//! Authorizations: attached signatures asserting a signer's approval of a
//! record's signable hash.

use serde::{Deserialize, Serialize};

use ledgerwire_core::{
    write_len_prefixed, write_string, ByteReader, PublicKey, SignatureBytes,
};

use crate::error::RecordError;

/// A single signature over a record's signable hash, with the signer's
/// stated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authorization {
    /// The Ed25519 signature. Always present once attached.
    pub signature: SignatureBytes,
    /// Public key to verify against.
    pub public_key: Option<PublicKey>,
    /// Ledger address of the signer.
    pub address: Option<String>,
    /// Human-readable identity name of the signer.
    pub moniker: Option<String>,
}

impl Authorization {
    /// True if a real (non-placeholder) signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_present()
    }

    /// Whether two authorizations come from the same signer.
    ///
    /// Moniker takes precedence; address is the fallback. Two
    /// authorizations with no stated identity at all are never considered
    /// the same signer.
    pub fn same_signer(&self, other: &Authorization) -> bool {
        match (&self.moniker, &other.moniker) {
            (Some(a), Some(b)) => return a == b,
            _ => {}
        }
        matches!((&self.address, &other.address), (Some(a), Some(b)) if a == b)
    }

    /// Append the wire encoding: length-prefixed signature, then the three
    /// optional identity fields, each length-prefixed with zero length
    /// meaning absent.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        write_len_prefixed(buf, &self.signature.0);
        match &self.public_key {
            Some(pk) => write_len_prefixed(buf, &pk.0),
            None => write_len_prefixed(buf, &[]),
        }
        write_string(buf, self.address.as_deref().unwrap_or(""));
        write_string(buf, self.moniker.as_deref().unwrap_or(""));
    }

    /// Read one authorization.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, RecordError> {
        let sig_bytes = reader.read_len_prefixed()?;
        let signature = SignatureBytes(
            <[u8; 64]>::try_from(sig_bytes).map_err(|_| {
                RecordError::MalformedRecord(format!(
                    "authorization signature must be 64 bytes, got {}",
                    sig_bytes.len()
                ))
            })?,
        );

        let pk_bytes = reader.read_len_prefixed()?;
        let public_key = match pk_bytes.len() {
            0 => None,
            32 => {
                let mut arr = [0u8; 32];
                arr.copy_from_slice(pk_bytes);
                Some(PublicKey(arr))
            }
            n => {
                return Err(RecordError::MalformedRecord(format!(
                    "authorization public key must be 32 bytes, got {n}"
                )))
            }
        };

        let address = reader.read_string()?;
        let moniker = reader.read_string()?;

        Ok(Authorization {
            signature,
            public_key,
            address: (!address.is_empty()).then_some(address),
            moniker: (!moniker.is_empty()).then_some(moniker),
        })
    }
}

/// Rebuild an authorization list with `new` attached, dropping any prior
/// authorization from the same signer. Re-signing therefore replaces
/// rather than duplicates; position of the new entry is always last.
pub fn replace_or_append(auths: &[Authorization], new: Authorization) -> Vec<Authorization> {
    let mut rebuilt: Vec<Authorization> = auths
        .iter()
        .filter(|existing| !existing.same_signer(&new))
        .cloned()
        .collect();
    rebuilt.push(new);
    rebuilt
}

/// Append the wire encoding of an authorization list: varint count, then
/// each authorization in order.
pub fn write_auth_list(buf: &mut Vec<u8>, auths: &[Authorization]) {
    ledgerwire_core::write_varint(buf, auths.len() as u128);
    for auth in auths {
        auth.write_to(buf);
    }
}

/// Read an authorization list.
pub fn read_auth_list(reader: &mut ByteReader<'_>) -> Result<Vec<Authorization>, RecordError> {
    let count = reader.read_varint_u64()?;
    if count > reader.remaining() as u64 {
        return Err(RecordError::MalformedRecord(format!(
            "authorization count {count} exceeds remaining input"
        )));
    }
    let mut auths = Vec::with_capacity(count as usize);
    for _ in 0..count {
        auths.push(Authorization::read_from(reader)?);
    }
    Ok(auths)
}
