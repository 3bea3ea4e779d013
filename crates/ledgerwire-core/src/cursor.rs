//! Bounds-checked reader over untrusted input.
//!
//! Every decode path in the workspace goes through [`ByteReader`]: each read
//! is checked against the remaining buffer before any slice is taken, so a
//! corrupted length surfaces as [`CodecError::Truncated`] instead of a panic.

use crate::error::CodecError;
use crate::varint;

/// A cursor over a byte slice with explicit bounds checks.
#[derive(Debug)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take the next `n` bytes, or fail without reading past the end.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        if n > self.remaining() {
            return Err(CodecError::truncated(self.pos, n, self.buf.len()));
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn take_byte(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    /// Take a fixed-size array.
    pub fn take_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let slice = self.take(N)?;
        let mut arr = [0u8; N];
        arr.copy_from_slice(slice);
        Ok(arr)
    }

    /// Read a varint and advance.
    pub fn read_varint(&mut self) -> Result<u128, CodecError> {
        let (value, consumed) = varint::decode_varint(&self.buf[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// Read a varint that must fit in `u64` (lengths, counts, codes).
    pub fn read_varint_u64(&mut self) -> Result<u64, CodecError> {
        let (value, consumed) = varint::decode_varint_u64(&self.buf[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    /// Read a varint length prefix followed by that many bytes.
    pub fn read_len_prefixed(&mut self) -> Result<&'a [u8], CodecError> {
        let len = self.read_varint_u64()?;
        let len = usize::try_from(len).map_err(|_| CodecError::IntegerOutOfRange)?;
        self.take(len)
    }

    /// Read a length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let bytes = self.read_len_prefixed()?;
        String::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }
}

/// Append a varint length prefix followed by `bytes`.
pub fn write_len_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    varint::write_varint(buf, bytes.len() as u128);
    buf.extend_from_slice(bytes);
}

/// Append a length-prefixed UTF-8 string.
pub fn write_string(buf: &mut Vec<u8>, s: &str) {
    write_len_prefixed(buf, s.as_bytes());
}
