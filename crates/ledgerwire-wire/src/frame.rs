//! The wire frame: the checksummed envelope carrying a typed payload
//! between peers.
//!
//! Layout, bit-exact:
//!
//! ```text
//! chain_magic(4) | kind varint | version varint |
//! cluster_len varint + cluster bytes | checksum(4) |
//! payload_len varint + payload bytes | signature(0 or 64)
//! ```
//!
//! The checksum is the first 4 bytes of `blake3(payload)`, all-zero when
//! the payload is absent. It is validated before the payload is exposed;
//! a mismatched frame is discarded, never dispatched.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use ledgerwire_core::{
    write_string, write_varint, ByteReader, Checksum, Hash256, PublicKey, RecordSigner,
    SignatureBytes,
};
use ledgerwire_records::{decode_record, peek_kind, RecordBody, RecordKind};

use crate::error::WireError;

/// The 4-byte constant identifying this network. Frames bearing a foreign
/// magic are rejected before any further parsing.
pub const CHAIN_MAGIC: [u8; 4] = *b"LGW1";

/// The current frame protocol version.
pub const FRAME_VERSION: u64 = 0;

/// Maximum accepted payload size. Checked before the payload is read so a
/// hostile length cannot drive allocation.
pub const MAX_FRAME_PAYLOAD: u64 = 4 * 1024 * 1024;

/// A wire frame. Constructed transiently to transport one record and
/// discarded after dispatch; it holds no state beyond the single message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// The frame's own kind tag. May legitimately differ from the kind
    /// embedded in the payload (a generic envelope carrying a typed
    /// record); dispatch uses the payload's tag.
    pub kind: RecordKind,
    /// Frame protocol version.
    pub version: u64,
    /// Logical cluster name.
    pub cluster: String,
    /// Payload bytes, usually a kind-prefixed record encoding.
    pub payload: Bytes,
    /// Optional Ed25519 signature over the unsigned frame bytes.
    pub signature: Option<SignatureBytes>,
}

impl Frame {
    /// Build an empty unsigned frame.
    pub fn new(kind: RecordKind, cluster: impl Into<String>) -> Self {
        Self {
            kind,
            version: FRAME_VERSION,
            cluster: cluster.into(),
            payload: Bytes::new(),
            signature: None,
        }
    }

    /// Set the payload.
    pub fn with_payload(mut self, payload: impl Into<Bytes>) -> Self {
        self.payload = payload.into();
        self
    }

    /// The checksum this frame's payload serializes with.
    pub fn checksum(&self) -> Checksum {
        Checksum::over(&self.payload)
    }

    /// Serialize without the signature: the message a frame signer signs.
    pub fn unsigned_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(16 + self.cluster.len() + self.payload.len());
        buf.extend_from_slice(&CHAIN_MAGIC);
        write_varint(&mut buf, self.kind.code() as u128);
        write_varint(&mut buf, self.version as u128);
        write_string(&mut buf, &self.cluster);
        buf.extend_from_slice(self.checksum().as_bytes());
        write_varint(&mut buf, self.payload.len() as u128);
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Serialize the full frame.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = self.unsigned_bytes();
        if let Some(signature) = &self.signature {
            buf.extend_from_slice(&signature.0);
        }
        buf
    }

    /// Hex rendering of the serialized frame, for fixtures and logs.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Blake3 hash of the serialized frame.
    pub fn hash(&self) -> Hash256 {
        Hash256::digest(&self.to_bytes())
    }

    /// Parse and verify a frame.
    ///
    /// The declared payload length is checked against the remaining buffer
    /// before any payload byte is read, and the checksum is recomputed and
    /// compared before the frame is returned.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        let mut reader = ByteReader::new(bytes);

        let magic: [u8; 4] = reader.take_array()?;
        if magic != CHAIN_MAGIC {
            return Err(WireError::BadMagic(magic));
        }

        let kind_code = reader.read_varint_u64()?;
        let kind = RecordKind::from_code(kind_code);
        if kind == RecordKind::Unknown && kind_code != 0 {
            // A newer peer's kind tag is not an error: the frame still
            // decodes under the Unknown sentinel and its payload can be
            // inspected. Only the numeric tag is collapsed; the raw code
            // survives here in the log.
            debug!(kind_code, "frame carries unrecognized kind tag");
        }
        let version = reader.read_varint_u64()?;
        let cluster = reader.read_string()?;
        let declared = Checksum::from_bytes(reader.take_array()?);

        let payload_len = reader.read_varint_u64()?;
        if payload_len > MAX_FRAME_PAYLOAD {
            return Err(WireError::PayloadTooLarge {
                size: payload_len,
                max: MAX_FRAME_PAYLOAD,
            });
        }
        if payload_len > reader.remaining() as u64 {
            return Err(WireError::TruncatedFrame {
                declared: payload_len,
                remaining: reader.remaining(),
            });
        }
        let payload = Bytes::copy_from_slice(reader.take(payload_len as usize)?);

        let signature = match reader.remaining() {
            0 => None,
            SignatureBytes::LEN => Some(SignatureBytes(reader.take_array()?)),
            n => {
                return Err(WireError::MalformedFrame(format!(
                    "{n} trailing bytes: signature must be 0 or 64 bytes"
                )))
            }
        };

        let computed = Checksum::over(&payload);
        if computed != declared {
            warn!(
                cluster = %cluster,
                declared = ?declared,
                computed = ?computed,
                "frame checksum mismatch, discarding"
            );
            return Err(WireError::ChecksumMismatch { declared, computed });
        }

        Ok(Self {
            kind,
            version,
            cluster,
            payload,
            signature,
        })
    }

    /// Sign the frame over its unsigned serialization.
    pub fn sign<S: RecordSigner + ?Sized>(&mut self, signer: &S) {
        let message = self.unsigned_bytes();
        self.signature = Some(signer.sign(&message));
    }

    /// Verify the attached signature against `public_key`.
    ///
    /// Returns false when no signature is attached.
    pub fn verify_signature(&self, public_key: &PublicKey) -> bool {
        match &self.signature {
            Some(signature) => public_key
                .verify(&self.unsigned_bytes(), signature)
                .is_ok(),
            None => false,
        }
    }

    /// The kind embedded in the payload itself, independent of the frame's
    /// own kind tag. Empty payloads report `Unknown`.
    pub fn payload_kind(&self) -> Result<RecordKind, WireError> {
        if self.payload.is_empty() {
            return Ok(RecordKind::Unknown);
        }
        Ok(peek_kind(&self.payload)?)
    }

    /// Dispatch the payload to the matching typed record decoder.
    pub fn decode_payload(&self) -> Result<RecordBody, WireError> {
        let kind = self.payload_kind()?;
        debug!(frame_kind = kind.name(), "dispatching frame payload");
        if self.payload.is_empty() {
            return Ok(RecordBody::Unknown {
                code: RecordKind::Unknown.code(),
                raw: Vec::new(),
            });
        }
        Ok(decode_record(&self.payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerwire_core::Keypair;
    use ledgerwire_records::{EncodeOpts, Identity, WireRecord};

    fn identity_frame() -> Frame {
        let mut identity = Identity::new("testuser");
        identity.set_parent("sct");
        Frame::new(RecordKind::Identity, "sct")
            .with_payload(identity.to_bytes(EncodeOpts::default()))
    }

    #[test]
    fn test_roundtrip() {
        let frame = identity_frame();
        let decoded = Frame::from_bytes(&frame.to_bytes()).unwrap();
        assert_eq!(decoded, frame);
    }

    #[test]
    fn test_roundtrip_signed() {
        let keypair = Keypair::from_seed(&[5; 32]);
        let mut frame = identity_frame();
        frame.sign(&keypair);
        let decoded = Frame::from_bytes(&frame.to_bytes()).unwrap();
        assert_eq!(decoded, frame);
        assert!(decoded.verify_signature(&keypair.public_key()));
    }

    #[test]
    fn test_signature_covers_payload() {
        let keypair = Keypair::from_seed(&[5; 32]);
        let mut frame = identity_frame();
        frame.sign(&keypair);
        frame.payload = Bytes::from_static(b"swapped");
        assert!(!frame.verify_signature(&keypair.public_key()));
    }

    #[test]
    fn test_foreign_magic_rejected() {
        let mut bytes = identity_frame().to_bytes();
        bytes[0] ^= 0xff;
        assert!(matches!(
            Frame::from_bytes(&bytes),
            Err(WireError::BadMagic(_))
        ));
    }

    #[test]
    fn test_bit_flip_anywhere_in_payload_detected() {
        let frame = identity_frame();
        let clean = frame.to_bytes();
        // The payload starts after magic, kind, version, cluster, checksum
        // and the payload length varint.
        let payload_start = clean.len() - frame.payload.len();
        for offset in payload_start..clean.len() {
            let mut corrupted = clean.clone();
            corrupted[offset] ^= 0x01;
            assert!(
                matches!(
                    Frame::from_bytes(&corrupted),
                    Err(WireError::ChecksumMismatch { .. })
                ),
                "flip at offset {offset} went undetected"
            );
        }
    }

    #[test]
    fn test_declared_length_past_buffer_rejected() {
        let frame = identity_frame();
        let mut bytes = frame.to_bytes();
        bytes.truncate(bytes.len() - frame.payload.len() / 2);
        assert!(matches!(
            Frame::from_bytes(&bytes),
            Err(WireError::TruncatedFrame { .. })
        ));
    }

    #[test]
    fn test_oversized_declared_length_rejected() {
        let mut frame = Frame::new(RecordKind::Unknown, "c");
        frame.payload = Bytes::new();
        let mut bytes = frame.to_bytes();
        // Replace the zero payload-length varint with one past the cap.
        bytes.pop();
        ledgerwire_core::write_varint(&mut bytes, (MAX_FRAME_PAYLOAD + 1) as u128);
        assert!(matches!(
            Frame::from_bytes(&bytes),
            Err(WireError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_unknown_frame_kind_is_not_an_error() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&CHAIN_MAGIC);
        write_varint(&mut bytes, 250); // unregistered kind code
        write_varint(&mut bytes, FRAME_VERSION as u128);
        write_string(&mut bytes, "sct");
        bytes.extend_from_slice(Checksum::ZERO.as_bytes());
        write_varint(&mut bytes, 0);
        let frame = Frame::from_bytes(&bytes).unwrap();
        assert_eq!(frame.kind, RecordKind::Unknown);
    }

    #[test]
    fn test_empty_payload_zero_checksum() {
        let frame = Frame::new(RecordKind::Unknown, "unknown");
        assert_eq!(frame.checksum(), Checksum::ZERO);
        let decoded = Frame::from_bytes(&frame.to_bytes()).unwrap();
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn test_dispatch_uses_payload_kind_not_frame_kind() {
        // Generic envelope (Unknown kind) carrying an Identity payload.
        let mut identity = Identity::new("testuser");
        identity.set_parent("sct");
        let frame = Frame::new(RecordKind::Unknown, "sct")
            .with_payload(identity.to_bytes(EncodeOpts::default()));
        assert_eq!(frame.payload_kind().unwrap(), RecordKind::Identity);
        match frame.decode_payload().unwrap() {
            RecordBody::Identity(decoded) => assert_eq!(decoded, identity),
            other => panic!("expected Identity, got {other:?}"),
        }
    }
}
