//! The shared contract every signable ledger record implements.
//!
//! Record encoding is `[kind varint, unless excluded] [version varint]
//! [field_1] ... [field_n] [authorization list, unless excluded]`. The
//! signable hash is the hash of the encoding with authorizations excluded,
//! so attaching a signature never changes the bytes being signed.

use ledgerwire_core::{write_varint, ByteReader, Hash256, RecordSigner};

use crate::auth::{read_auth_list, replace_or_append, write_auth_list, Authorization};
use crate::error::{RecordError, ValidationOutcome};
use crate::kind::RecordKind;

/// The current record schema version.
pub const RECORD_VERSION: u64 = 0;

/// Required-authorization failure message, shared by every record type.
pub const ERR_NO_AUTHORIZATION: &str =
    "At least one authorization with signature is required.";

/// Authorization-verification failure message.
pub const ERR_BAD_AUTHORIZATION: &str = "Authorization signature verification failed.";

/// Options controlling what `to_bytes` includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOpts {
    /// Omit the trailing authorization list (the signable form).
    pub exclude_authorizations: bool,
    /// Omit the leading kind tag.
    pub exclude_kind_prefix: bool,
}

impl EncodeOpts {
    /// The form a signer hashes before any signature exists.
    pub fn signable() -> Self {
        Self {
            exclude_authorizations: true,
            exclude_kind_prefix: false,
        }
    }
}

/// A typed ledger record with a fixed field order, a canonical encoding,
/// and the shared authorization lifecycle.
///
/// Implementors provide field encode/decode and the required-field check;
/// everything else (hashing, signing, verification, validation) is the
/// same for every record and lives in the provided methods.
pub trait WireRecord: Sized {
    /// The registry kind of this record.
    const KIND: RecordKind;

    /// Append the fixed-order fields (no kind tag, no version, no
    /// authorizations).
    fn write_fields(&self, buf: &mut Vec<u8>);

    /// Read the fixed-order fields, mirroring `write_fields`.
    fn read_fields(reader: &mut ByteReader<'_>) -> Result<Self, RecordError>;

    /// The attached authorizations.
    fn authorizations(&self) -> &[Authorization];

    /// Replace the authorization list wholesale.
    fn set_authorizations(&mut self, auths: Vec<Authorization>);

    /// First failing required-field message, if any, in the record's fixed
    /// precedence order.
    fn check_required_fields(&self) -> Option<String>;

    /// Canonical encoding. Identical field state always yields identical
    /// bytes.
    fn to_bytes(&self, opts: EncodeOpts) -> Vec<u8> {
        let mut buf = Vec::new();
        if !opts.exclude_kind_prefix {
            write_varint(&mut buf, Self::KIND.code() as u128);
        }
        write_varint(&mut buf, RECORD_VERSION as u128);
        self.write_fields(&mut buf);
        if !opts.exclude_authorizations {
            write_auth_list(&mut buf, self.authorizations());
        }
        buf
    }

    /// Strict inverse of `to_bytes`.
    ///
    /// Tolerates a missing kind prefix: if the leading varint is not this
    /// record's kind code, the input is assumed to start at the version.
    /// An absent trailing authorization list decodes as empty.
    fn from_bytes(bytes: &[u8]) -> Result<Self, RecordError> {
        let mut reader = ByteReader::new(bytes);
        let lead = reader.read_varint_u64()?;
        let version = if lead == Self::KIND.code() {
            reader.read_varint_u64()?
        } else {
            lead
        };
        if version != RECORD_VERSION {
            return Err(RecordError::MalformedRecord(format!(
                "unsupported record version: {version}"
            )));
        }
        let mut record = Self::read_fields(&mut reader)?;
        let auths = if reader.is_empty() {
            Vec::new()
        } else {
            read_auth_list(&mut reader)?
        };
        if !reader.is_empty() {
            return Err(RecordError::MalformedRecord(format!(
                "{} trailing bytes after record",
                reader.remaining()
            )));
        }
        record.set_authorizations(auths);
        Ok(record)
    }

    /// Hash of the canonical encoding under `opts`.
    ///
    /// The hash is a pure function of the current field values: mutate the
    /// record and the next call reflects it. Nothing is cached.
    fn hash(&self, opts: EncodeOpts) -> Hash256 {
        Hash256::digest(&self.to_bytes(opts))
    }

    /// The hash a signer commits to: authorizations excluded.
    fn signable_hash(&self) -> Hash256 {
        self.hash(EncodeOpts::signable())
    }

    /// Sign the record. A prior authorization from the same signer is
    /// replaced, never duplicated.
    fn sign<S: RecordSigner + ?Sized>(&mut self, signer: &S) {
        let digest = self.signable_hash();
        let auth = Authorization {
            signature: signer.sign(digest.as_bytes()),
            public_key: Some(signer.public_key()),
            address: signer.address().map(str::to_string),
            moniker: signer.moniker().map(str::to_string),
        };
        let rebuilt = replace_or_append(self.authorizations(), auth);
        self.set_authorizations(rebuilt);
    }

    /// Append an externally-produced authorization.
    fn add_authorization(&mut self, auth: Authorization) -> Result<(), RecordError> {
        if !auth.is_signed() {
            return Err(RecordError::MissingSignature);
        }
        let mut auths = self.authorizations().to_vec();
        auths.push(auth);
        self.set_authorizations(auths);
        Ok(())
    }

    /// True iff every attached authorization verifies against the signable
    /// hash and its stated key. Vacuously true for an empty list.
    fn verify_authorizations(&self) -> bool {
        let digest = self.signable_hash();
        self.authorizations().iter().all(|auth| {
            let Some(public_key) = &auth.public_key else {
                return false;
            };
            public_key
                .verify(digest.as_bytes(), &auth.signature)
                .is_ok()
        })
    }

    /// Full semantic validation: required fields in precedence order, then
    /// at least one signed authorization, then signature verification.
    fn validate(&self) -> ValidationOutcome {
        if let Some(message) = self.check_required_fields() {
            return ValidationOutcome::fail(message);
        }
        if !self.authorizations().iter().any(Authorization::is_signed) {
            return ValidationOutcome::fail(ERR_NO_AUTHORIZATION);
        }
        if !self.verify_authorizations() {
            return ValidationOutcome::fail(ERR_BAD_AUTHORIZATION);
        }
        ValidationOutcome::ok()
    }

    /// Convenience wrapper around [`WireRecord::validate`].
    fn is_valid(&self) -> bool {
        self.validate().valid
    }
}
