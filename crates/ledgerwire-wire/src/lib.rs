//! # Ledgerwire Wire
//!
//! The transport-facing half of the Ledgerwire format: the checksummed
//! [`Frame`] envelope that carries typed record payloads between peers,
//! and the [`BatchPayload`] Merkle structure that orders, hashes, and
//! proves membership of a batch of timestamped elements.
//!
//! Frames are transient: built to carry one message, verified on receipt
//! (magic, length bounds, checksum, in that order), dispatched via the
//! kind registry, and discarded.

pub mod error;
pub mod frame;
pub mod merkle;

pub use error::WireError;
pub use frame::{Frame, CHAIN_MAGIC, FRAME_VERSION, MAX_FRAME_PAYLOAD};
pub use merkle::{
    verify_proof, BatchPayload, BatchStats, MerkleElement, MerkleProof, MerkleRoot, ProofStep,
    Side, MAX_BATCH_BYTES,
};
