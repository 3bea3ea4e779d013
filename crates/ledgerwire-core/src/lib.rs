//! # Ledgerwire Core
//!
//! Leaf primitives for the Ledgerwire format: the varint, the canonical
//! value codec, and strongly-typed crypto wrappers.
//!
//! This crate contains no I/O and no logging. Every operation is a pure,
//! thread-safe transform of its inputs: encoding, decoding, and hashing may
//! be invoked concurrently with no shared state.
//!
//! ## Key Types
//!
//! - [`Value`] - Closed recursive value model with a canonical encoding
//! - [`Hash256`] / [`Checksum`] - Blake3 digests, full and truncated
//! - [`PublicKey`] / [`SignatureBytes`] / [`Keypair`] - Ed25519 wrappers
//! - [`ByteReader`] - Bounds-checked cursor every decode path goes through

pub mod crypto;
pub mod cursor;
pub mod error;
pub mod value;
pub mod varint;

pub use crypto::{Checksum, Hash256, Keypair, PublicKey, RecordSigner, SignatureBytes};
pub use cursor::{write_len_prefixed, write_string, ByteReader};
pub use error::CodecError;
pub use value::Value;
pub use varint::{decode_varint, decode_varint_u64, encode_varint, write_varint};
