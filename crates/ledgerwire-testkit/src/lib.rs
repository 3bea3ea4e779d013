//! # Ledgerwire Testkit
//!
//! Testing utilities for the Ledgerwire format.
//!
//! This crate provides:
//!
//! - **Golden vectors**: known inputs with expected encodings, for
//!   cross-implementation verification
//! - **Generators**: proptest strategies for property-based testing
//! - **Fixtures**: deterministic signers and ready-made signed records
//!
//! ```rust
//! use ledgerwire_testkit::fixtures::alice;
//! use ledgerwire_records::WireRecord;
//!
//! let identity = alice().make_identity("testuser", "sct");
//! assert!(identity.is_valid());
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{alice, bob, governor, TestFixture, FIXTURE_TIMESTAMP};
pub use vectors::{all_vectors, encode_vector, GoldenVector};
