//! Field-level encoding helpers shared by every record type.
//!
//! Record fields use the same primitives as the canonical value codec
//! (length-prefixed strings, varints, sign-flagged big integers), but in a
//! fixed per-record order with no tag bytes: the field order is part of
//! each record's definition, not discovered from the bytes.

use ledgerwire_core::{write_string, write_varint, ByteReader, CodecError, Value};

use crate::error::RecordError;

const SIGN_NONNEG: u8 = 0x00;
const SIGN_NEG: u8 = 0x01;

/// Append a signed big-integer field: sign-flag byte, then varint magnitude.
pub fn write_big(buf: &mut Vec<u8>, value: i128) {
    if value < 0 {
        buf.push(SIGN_NEG);
        write_varint(buf, value.unsigned_abs());
    } else {
        buf.push(SIGN_NONNEG);
        write_varint(buf, value as u128);
    }
}

/// Read a signed big-integer field.
pub fn read_big(reader: &mut ByteReader<'_>) -> Result<i128, CodecError> {
    let sign = reader.take_byte()?;
    let magnitude = reader.read_varint()?;
    match sign {
        SIGN_NONNEG => i128::try_from(magnitude).map_err(|_| CodecError::IntegerOutOfRange),
        SIGN_NEG => {
            if magnitude > i128::MIN.unsigned_abs() {
                return Err(CodecError::IntegerOutOfRange);
            }
            Ok((magnitude as i128).wrapping_neg())
        }
        other => Err(CodecError::InvalidSign(other)),
    }
}

/// Append a sequence-of-strings field: varint count, then each string.
pub fn write_string_seq(buf: &mut Vec<u8>, items: &[String]) {
    write_varint(buf, items.len() as u128);
    for item in items {
        write_string(buf, item);
    }
}

/// Read a sequence-of-strings field.
pub fn read_string_seq(reader: &mut ByteReader<'_>) -> Result<Vec<String>, RecordError> {
    let count = reader.read_varint_u64()?;
    if count > reader.remaining() as u64 {
        return Err(RecordError::MalformedRecord(format!(
            "string count {count} exceeds remaining input"
        )));
    }
    let mut items = Vec::with_capacity(count as usize);
    for _ in 0..count {
        items.push(reader.read_string()?);
    }
    Ok(items)
}

/// Append a free-form nested value field.
///
/// Delegated to the canonical value codec so nested maps are key-sorted
/// and the record's bytes stay deterministic.
pub fn write_value(buf: &mut Vec<u8>, value: &Value) {
    value.write_to(buf);
}

/// Read a free-form nested value field.
pub fn read_value(reader: &mut ByteReader<'_>) -> Result<Value, RecordError> {
    Ok(Value::read_from(reader)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_big_roundtrip() {
        for n in [0i128, 1, -1, 10_000, -10_000, i128::MAX, i128::MIN] {
            let mut buf = Vec::new();
            write_big(&mut buf, n);
            let mut reader = ByteReader::new(&buf);
            assert_eq!(read_big(&mut reader).unwrap(), n);
            assert!(reader.is_empty());
        }
    }

    #[test]
    fn test_big_bad_sign_rejected() {
        let mut reader = ByteReader::new(&[0x02, 0x01]);
        assert_eq!(read_big(&mut reader), Err(CodecError::InvalidSign(0x02)));
    }

    #[test]
    fn test_string_seq_roundtrip() {
        let items = vec!["alice".to_string(), "bob".to_string(), String::new()];
        let mut buf = Vec::new();
        write_string_seq(&mut buf, &items);
        let mut reader = ByteReader::new(&buf);
        assert_eq!(read_string_seq(&mut reader).unwrap(), items);
    }

    #[test]
    fn test_string_seq_corrupt_count_rejected() {
        let mut buf = Vec::new();
        write_varint(&mut buf, 1 << 40);
        let mut reader = ByteReader::new(&buf);
        assert!(read_string_seq(&mut reader).is_err());
    }
}
