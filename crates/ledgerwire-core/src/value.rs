//! Canonical self-describing value codec.
//!
//! Encodes heterogeneous structured values (strings, integers, booleans,
//! sequences, key-value maps) into a single tagged byte sequence. The
//! encoding is canonical: map keys are always emitted in sorted order, so
//! logically equal values produce byte-identical, hash-identical encodings
//! regardless of the order fields were inserted.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cursor::{write_string, ByteReader};
use crate::error::CodecError;
use crate::varint::write_varint;

/// Type tag bytes. The tag uniquely determines how the body is parsed;
/// an unrecognized tag is a hard decode error.
pub mod tags {
    pub const STRING: u8 = 0x01;
    pub const UINT: u8 = 0x02;
    pub const BIG: u8 = 0x03;
    pub const BOOL: u8 = 0x04;
    pub const SEQ: u8 = 0x05;
    pub const MAP: u8 = 0x06;
}

/// Sign-flag bytes for the big-integer body.
const SIGN_NONNEG: u8 = 0x00;
const SIGN_NEG: u8 = 0x01;

/// A structured value with a canonical byte encoding.
///
/// The enum is closed: every encodable shape is a variant, so tag dispatch
/// in the codec is exhaustive and checked at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// UTF-8 string.
    Str(String),
    /// Bounded non-negative integer (64-bit).
    Uint(u64),
    /// Signed integer of larger magnitude (fee amounts, balances).
    Big(i128),
    /// Boolean.
    Bool(bool),
    /// Ordered sequence of nested values.
    Seq(Vec<Value>),
    /// Key-value record. `BTreeMap` keeps keys sorted, which is what makes
    /// the encoding independent of insertion order.
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// An empty map.
    pub fn empty_map() -> Self {
        Value::Map(BTreeMap::new())
    }

    /// An empty sequence.
    pub fn empty_seq() -> Self {
        Value::Seq(Vec::new())
    }

    /// Encode to canonical bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        buf
    }

    /// Append the canonical encoding to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            Value::Str(s) => {
                buf.push(tags::STRING);
                write_string(buf, s);
            }
            Value::Uint(n) => {
                buf.push(tags::UINT);
                write_varint(buf, *n as u128);
            }
            Value::Big(n) => {
                buf.push(tags::BIG);
                if *n < 0 {
                    buf.push(SIGN_NEG);
                    write_varint(buf, n.unsigned_abs());
                } else {
                    buf.push(SIGN_NONNEG);
                    write_varint(buf, *n as u128);
                }
            }
            Value::Bool(b) => {
                buf.push(tags::BOOL);
                buf.push(u8::from(*b));
            }
            Value::Seq(items) => {
                buf.push(tags::SEQ);
                write_varint(buf, items.len() as u128);
                for item in items {
                    item.write_to(buf);
                }
            }
            Value::Map(entries) => {
                buf.push(tags::MAP);
                write_varint(buf, entries.len() as u128);
                // BTreeMap iterates in ascending key order.
                for (key, value) in entries {
                    write_string(buf, key);
                    value.write_to(buf);
                }
            }
        }
    }

    /// Decode a value from the front of `input`.
    ///
    /// Returns the value and the number of bytes consumed.
    pub fn decode(input: &[u8]) -> Result<(Value, usize), CodecError> {
        let mut reader = ByteReader::new(input);
        let value = Self::read_from(&mut reader)?;
        Ok((value, reader.position()))
    }

    /// Decode, requiring the whole input to be consumed.
    pub fn decode_exact(input: &[u8]) -> Result<Value, CodecError> {
        let (value, consumed) = Self::decode(input)?;
        if consumed != input.len() {
            return Err(CodecError::truncated(consumed, 0, input.len()));
        }
        Ok(value)
    }

    /// Read one tagged value from `reader`.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Value, CodecError> {
        let tag = reader.take_byte()?;
        match tag {
            tags::STRING => Ok(Value::Str(reader.read_string()?)),
            tags::UINT => Ok(Value::Uint(reader.read_varint_u64()?)),
            tags::BIG => {
                let sign = reader.take_byte()?;
                let magnitude = reader.read_varint()?;
                match sign {
                    SIGN_NONNEG => {
                        let n = i128::try_from(magnitude)
                            .map_err(|_| CodecError::IntegerOutOfRange)?;
                        Ok(Value::Big(n))
                    }
                    SIGN_NEG => {
                        if magnitude > i128::MIN.unsigned_abs() {
                            return Err(CodecError::IntegerOutOfRange);
                        }
                        Ok(Value::Big((magnitude as i128).wrapping_neg()))
                    }
                    other => Err(CodecError::InvalidSign(other)),
                }
            }
            tags::BOOL => match reader.take_byte()? {
                0 => Ok(Value::Bool(false)),
                1 => Ok(Value::Bool(true)),
                other => Err(CodecError::InvalidBool(other)),
            },
            tags::SEQ => {
                let count = reader.read_varint_u64()?;
                // Each element is at least one tag byte, so `count` cannot
                // exceed what remains. Rejecting here bounds allocation.
                if count > reader.remaining() as u64 {
                    return Err(CodecError::truncated(
                        reader.position(),
                        count as usize,
                        reader.position() + reader.remaining(),
                    ));
                }
                let mut items = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    items.push(Self::read_from(reader)?);
                }
                Ok(Value::Seq(items))
            }
            tags::MAP => {
                let count = reader.read_varint_u64()?;
                if count > reader.remaining() as u64 {
                    return Err(CodecError::truncated(
                        reader.position(),
                        count as usize,
                        reader.position() + reader.remaining(),
                    ));
                }
                let mut entries = BTreeMap::new();
                let mut last_key: Option<String> = None;
                for _ in 0..count {
                    let key = reader.read_string()?;
                    // Keys must arrive strictly ascending: decode accepts
                    // only the canonical encoding, so duplicate or
                    // reordered keys cannot alias to the same value.
                    if last_key.as_deref().is_some_and(|prev| prev >= key.as_str()) {
                        return Err(CodecError::NonCanonicalMap);
                    }
                    let value = Self::read_from(reader)?;
                    last_key = Some(key.clone());
                    entries.insert(key, value);
                }
                Ok(Value::Map(entries))
            }
            other => Err(CodecError::UnknownTag(other)),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Uint(n)
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::Big(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Seq(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn roundtrip(v: &Value) -> Value {
        let bytes = v.encode();
        let (decoded, consumed) = Value::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        decoded
    }

    #[test]
    fn test_scalar_roundtrips() {
        for v in [
            Value::Str("testuser".into()),
            Value::Str(String::new()),
            Value::Uint(0),
            Value::Uint(u64::MAX),
            Value::Bool(true),
            Value::Bool(false),
            Value::Big(0),
            Value::Big(1_000_000_000_000_000_000_000),
        ] {
            assert_eq!(roundtrip(&v), v);
        }
    }

    #[test]
    fn test_negative_big_roundtrip() {
        for n in [-1i128, -255, -1_000_000_000_000_000_000_000, i128::MIN] {
            assert_eq!(roundtrip(&Value::Big(n)), Value::Big(n));
        }
    }

    #[test]
    fn test_negative_zero_normalized() {
        // There is no encodable -0: sign byte is part of the encoder output
        // only, and 0 always encodes with the non-negative flag.
        let bytes = Value::Big(0).encode();
        assert_eq!(bytes, vec![tags::BIG, 0x00, 0x00]);
    }

    #[test]
    fn test_map_key_order_independence() {
        let mut a = BTreeMap::new();
        a.insert("moniker".to_string(), Value::from("testuser"));
        a.insert("parent".to_string(), Value::from("sct"));
        a.insert("balance".to_string(), Value::Big(42));

        let mut b = BTreeMap::new();
        b.insert("balance".to_string(), Value::Big(42));
        b.insert("parent".to_string(), Value::from("sct"));
        b.insert("moniker".to_string(), Value::from("testuser"));

        assert_eq!(Value::Map(a).encode(), Value::Map(b).encode());
    }

    #[test]
    fn test_nested_roundtrip() {
        let mut inner = BTreeMap::new();
        inner.insert("threshold".to_string(), Value::Uint(2));
        inner.insert(
            "members".to_string(),
            Value::Seq(vec![Value::from("alice"), Value::from("bob")]),
        );
        let v = Value::Seq(vec![
            Value::Map(inner),
            Value::Bool(true),
            Value::Big(-7),
        ]);
        assert_eq!(roundtrip(&v), v);
    }

    #[test]
    fn test_unknown_tag_rejected() {
        assert_eq!(Value::decode(&[0x7e]), Err(CodecError::UnknownTag(0x7e)));
    }

    #[test]
    fn test_truncated_string_rejected() {
        let mut bytes = Value::from("testuser").encode();
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            Value::decode(&bytes),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn test_corrupt_count_cannot_overrun() {
        // SEQ claiming 2^32 elements with nothing behind it.
        let mut bytes = vec![tags::SEQ];
        crate::varint::write_varint(&mut bytes, 1 << 32);
        assert!(matches!(
            Value::decode(&bytes),
            Err(CodecError::Truncated { .. })
        ));
    }

    #[test]
    fn test_invalid_bool_rejected() {
        assert_eq!(
            Value::decode(&[tags::BOOL, 0x02]),
            Err(CodecError::InvalidBool(0x02))
        );
    }

    #[test]
    fn test_duplicate_map_keys_rejected() {
        // MAP claiming two entries under the same key: two distinct byte
        // strings must never decode to the same value.
        let mut bytes = vec![tags::MAP];
        crate::varint::write_varint(&mut bytes, 2);
        write_string(&mut bytes, "memo");
        Value::Bool(true).write_to(&mut bytes);
        write_string(&mut bytes, "memo");
        Value::Bool(false).write_to(&mut bytes);
        assert_eq!(Value::decode(&bytes), Err(CodecError::NonCanonicalMap));
    }

    #[test]
    fn test_unsorted_map_keys_rejected() {
        let mut bytes = vec![tags::MAP];
        crate::varint::write_varint(&mut bytes, 2);
        write_string(&mut bytes, "parent");
        Value::Bool(true).write_to(&mut bytes);
        write_string(&mut bytes, "moniker");
        Value::Bool(false).write_to(&mut bytes);
        assert_eq!(Value::decode(&bytes), Err(CodecError::NonCanonicalMap));
    }

    #[test]
    fn test_decode_exact_rejects_trailing_bytes() {
        let mut bytes = Value::Bool(true).encode();
        bytes.push(0x00);
        assert!(Value::decode_exact(&bytes).is_err());
    }

    fn value_strategy() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            "[a-z0-9]{0,12}".prop_map(Value::Str),
            any::<u64>().prop_map(Value::Uint),
            any::<i128>().prop_map(Value::Big),
            any::<bool>().prop_map(Value::Bool),
        ];
        leaf.prop_recursive(3, 24, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Seq),
                prop::collection::btree_map("[a-z]{1,8}", inner, 0..6).prop_map(Value::Map),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_roundtrip(v in value_strategy()) {
            prop_assert_eq!(roundtrip(&v), v);
        }

        #[test]
        fn prop_encoding_deterministic(v in value_strategy()) {
            prop_assert_eq!(v.encode(), v.encode());
        }
    }
}
