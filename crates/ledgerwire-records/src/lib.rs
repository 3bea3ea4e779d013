//! # Ledgerwire Records
//!
//! Typed ledger records and the lifecycle shared by all of them: fixed
//! field-order serialization, signable hashing, and the authorization
//! (multi-signature) contract.
//!
//! ## Key Types
//!
//! - [`WireRecord`] - The contract every signable record implements
//! - [`RecordKind`] / [`RecordBody`] - Kind registry and typed dispatch
//! - [`Authorization`] - A signature plus the signer's stated identity
//! - [`Identity`], [`Transfer`], [`QuorumDecision`], [`StateActionFee`]
//!
//! ## Hashing contract
//!
//! A record's signable hash is the hash of its encoding with
//! authorizations excluded, so attaching a signature never changes the
//! bytes that were signed. Hashes are recomputed from current field state
//! on every call; mutate a record and its hash follows.

pub mod auth;
pub mod codec;
pub mod error;
pub mod fee;
pub mod identity;
pub mod kind;
pub mod quorum;
pub mod record;
pub mod transfer;

pub use auth::{replace_or_append, Authorization};
pub use error::{RecordError, ValidationOutcome};
pub use fee::StateActionFee;
pub use identity::Identity;
pub use kind::{decode_record, peek_kind, RecordBody, RecordKind};
pub use quorum::QuorumDecision;
pub use record::{EncodeOpts, WireRecord, ERR_BAD_AUTHORIZATION, ERR_NO_AUTHORIZATION};
pub use transfer::Transfer;
