//! Variable-length integer encoding.
//!
//! LEB128: seven value bits per byte, little-endian groups, high bit set on
//! every byte except the last. The primitive is implemented over `u128` so
//! the big-integer magnitude path in the value codec can reuse it; bounded
//! integers pass through the same routines as `u64`.

use crate::error::CodecError;

/// Maximum encoded length of a `u128` varint (ceil(128 / 7)).
pub const MAX_VARINT_LEN: usize = 19;

/// Append the varint encoding of `value` to `buf`.
pub fn write_varint(buf: &mut Vec<u8>, mut value: u128) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            return;
        }
        buf.push(byte | 0x80);
    }
}

/// Encode `value` as a standalone varint.
pub fn encode_varint(value: u128) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MAX_VARINT_LEN);
    write_varint(&mut buf, value);
    buf
}

/// Decode a varint from the front of `input`.
///
/// Returns the value and the number of bytes consumed so the caller can
/// advance its cursor. Runs of more than [`MAX_VARINT_LEN`] continuation
/// bytes are rejected, which also caps decode work on hostile input.
pub fn decode_varint(input: &[u8]) -> Result<(u128, usize), CodecError> {
    let mut value: u128 = 0;
    for (i, &byte) in input.iter().enumerate() {
        if i >= MAX_VARINT_LEN {
            return Err(CodecError::VarintOverflow);
        }
        let group = (byte & 0x7f) as u128;
        // The final byte of a 19-byte encoding may only carry 2 bits.
        if i == MAX_VARINT_LEN - 1 && group > 0x03 {
            return Err(CodecError::VarintOverflow);
        }
        value |= group << (7 * i);
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
    }
    Err(CodecError::truncated(0, input.len() + 1, input.len()))
}

/// Decode a varint that must fit in `u64`, as used for lengths and counts.
pub fn decode_varint_u64(input: &[u8]) -> Result<(u64, usize), CodecError> {
    let (value, consumed) = decode_varint(input)?;
    let value = u64::try_from(value).map_err(|_| CodecError::IntegerOutOfRange)?;
    Ok((value, consumed))
}
